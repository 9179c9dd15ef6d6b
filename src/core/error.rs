//! Error taxonomy shared by the runners, gateway and monitor

use alloy::primitives::B256;
use thiserror::Error;

/// Failures reaching or reading from the chain node.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("subscription failed: {0}")]
    Subscription(String),
}

/// Errors surfaced by wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid {runner} action: {action}")]
    InvalidAction {
        runner: &'static str,
        action: String,
    },
    #[error("amount should be a positive value")]
    InvalidAmount,
    #[error("{0} address is required")]
    MissingAddress(&'static str),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid contract address: {0}")]
    InvalidContractAddress(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("network error: {0}")]
    Network(#[from] ChainError),
    #[error("transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: B256 },
    #[error("subscription error: {0}")]
    Subscription(String),
}

impl WalletError {
    /// True for errors raised before any network access.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidAction { .. }
                | WalletError::InvalidAmount
                | WalletError::MissingAddress(_)
                | WalletError::InvalidAddress(_)
                | WalletError::InvalidKey(_)
        )
    }
}

/// Result alias for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;
