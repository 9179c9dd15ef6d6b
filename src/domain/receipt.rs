//! Mined transaction outcomes and the accounting sink

use std::fmt;

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

use crate::core::units::serialize_decimal;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: B256,
    /// `true` when the receipt reports success
    pub status: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Effective gas price in wei
    pub gas_price: u128,
    /// Set for contract-creation transactions
    pub contract_address: Option<Address>,
}

impl TransactionReceipt {
    /// Total fee paid, in wei.
    pub fn cost(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.gas_price)
    }
}

impl From<alloy::rpc::types::TransactionReceipt> for TransactionReceipt {
    fn from(receipt: alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            status: receipt.status(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            gas_price: receipt.effective_gas_price,
            contract_address: receipt.contract_address,
        }
    }
}

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction {} mined (gas used {}, cost {} wei)",
            self.tx_hash,
            self.gas_used,
            self.cost()
        )
    }
}

/// Cost metadata for a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    pub operation: String,
    pub tx_hash: B256,
    pub gas: u64,
    pub gas_price: u128,
    #[serde(serialize_with = "serialize_decimal")]
    pub cost: U256,
}

impl TransactionInfo {
    pub fn new(operation: &str, receipt: &TransactionReceipt) -> Self {
        Self {
            operation: operation.to_string(),
            tx_hash: receipt.tx_hash,
            gas: receipt.gas_used,
            gas_price: receipt.gas_price,
            cost: receipt.cost(),
        }
    }
}

/// Receives metadata of every confirmed transaction.
///
/// Hook for transaction statistics; the default sink only logs.
pub trait TransactionSink: Send + Sync {
    fn record(&self, info: TransactionInfo);
}

/// Sink that logs each transaction at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransactionSink;

impl TransactionSink for LogTransactionSink {
    fn record(&self, info: TransactionInfo) {
        tracing::debug!(
            operation = %info.operation,
            tx_hash = %info.tx_hash,
            gas = info.gas,
            gas_price = info.gas_price,
            cost = %info.cost,
            "transaction confirmed"
        );
    }
}
