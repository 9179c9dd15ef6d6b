//! Command modules
//!
//! Modules:
//! - runners: allowance, balance, ownership and transfer actions
//! - monitor: concurrent event watchers
//! - deploy: contract deployment

pub mod deploy;
pub mod monitor;
pub mod runners;

pub use deploy::Deployer;
pub use monitor::{EventMonitor, EventSink, StdoutSink};
pub use runners::{ActionOutcome, AllowanceRunner, BalanceRunner, OwnershipRunner, TransfersRunner};
