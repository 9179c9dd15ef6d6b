//! Domain models: contract events and transaction receipts

pub mod events;
pub mod receipt;

pub use events::{EventKind, EventRecord};
pub use receipt::{LogTransactionSink, TransactionInfo, TransactionReceipt, TransactionSink};
