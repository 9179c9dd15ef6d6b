//! Per-transaction signing context
//!
//! A `Signer` carries the nonce fetched at build time, so it is consumed by the
//! transaction it signs. Every transaction builds a fresh one.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use tracing::debug;

use crate::core::{Result, WalletError};
use crate::infrastructure::ethereum::ChainClient;

/// Gas and value parameters stamped on every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub gas_limit: u64,
    /// Legacy gas price in wei
    pub gas_price: u128,
    /// Wei attached to write calls unless overridden
    pub value: U256,
}

/// Signing context for exactly one transaction.
pub struct Signer {
    wallet: EthereumWallet,
    pub address: Address,
    pub nonce: u64,
    pub chain_id: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub value: U256,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address)
            .field("nonce", &self.nonce)
            .field("chain_id", &self.chain_id)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .field("value", &self.value)
            .finish()
    }
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Bytes,
    pub from: Address,
    pub nonce: u64,
}

/// Decode a hex private key (with or without `0x`).
pub fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner> {
    let trimmed = private_key.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidKey("private key is empty".into()));
    }
    trimmed
        .parse::<PrivateKeySigner>()
        .map_err(|e| WalletError::InvalidKey(e.to_string()))
}

/// Build a signer for the account behind `private_key`.
///
/// Fetches the pending nonce and chain id from the node.
pub async fn build_signer(
    client: &dyn ChainClient,
    private_key: &str,
    gas: GasSettings,
) -> Result<Signer> {
    let key = parse_private_key(private_key)?;
    let address = key.address();
    let nonce = client.pending_nonce(address).await?;
    let chain_id = client.chain_id().await?;
    debug!(%address, nonce, chain_id, "signer ready");

    Ok(Signer {
        wallet: EthereumWallet::from(key),
        address,
        nonce,
        chain_id,
        gas_limit: gas.gas_limit,
        gas_price: gas.gas_price,
        value: gas.value,
    })
}

impl Signer {
    /// Replace the value attached to the transaction.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sign a legacy transaction to `to` carrying `input`.
    pub async fn sign(self, to: TxKind, input: Bytes) -> Result<SignedTransaction> {
        let mut request = TransactionRequest::default()
            .with_from(self.address)
            .with_nonce(self.nonce)
            .with_chain_id(self.chain_id)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_value(self.value)
            .with_input(input);
        request.set_kind(to);

        let envelope = request
            .build(&self.wallet)
            .await
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        Ok(SignedTransaction {
            raw: Bytes::from(envelope.encoded_2718()),
            from: self.address,
            nonce: self.nonce,
        })
    }
}
