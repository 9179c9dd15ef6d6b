pub mod action;
pub mod address;
pub mod error;
pub mod units;

pub use action::{AllowanceAction, BalanceAction, OwnershipAction, TransferAction};
pub use address::{parse_address, require_address, validate_address_format};
pub use error::{ChainError, Result, WalletError};
pub use units::{to_display_unit, to_smallest_unit, WEI_PER_ETHER};
