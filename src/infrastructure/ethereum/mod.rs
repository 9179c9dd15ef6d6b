//! Ethereum infrastructure - Alloy provider, contract bindings, signing

mod contract;
mod gateway;
mod provider;
mod signer;

pub use contract::{creation_code, ContractMethod, SharedWallet};
pub use gateway::{validate_contract_address, ContractGateway, ContractHandle};
pub use provider::{connect, AlloyChainClient, ChainClient, LogSubscription, ProviderConfig};
pub use signer::{build_signer, parse_private_key, GasSettings, SignedTransaction, Signer};
