//! Contract gateway: validated binding, read calls and confirmed writes

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxKind};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use tracing::{debug, info, warn};

use crate::core::{parse_address, ChainError, Result, WalletError};
use crate::domain::{LogTransactionSink, TransactionInfo, TransactionReceipt, TransactionSink};
use crate::infrastructure::ethereum::signer::{SignedTransaction, Signer};
use crate::infrastructure::ethereum::{creation_code, ChainClient, ContractMethod};

/// Check the address format, then require deployed bytecode at it.
pub async fn validate_contract_address(client: &dyn ChainClient, address: &str) -> Result<Address> {
    let parsed = parse_address(address)?;
    let code = client.code_at(parsed).await?;
    if code.is_empty() {
        return Err(WalletError::InvalidContractAddress(address.to_string()));
    }
    Ok(parsed)
}

fn selector_of(input: &[u8]) -> String {
    if input.len() >= 4 {
        format!("0x{}", hex::encode(&input[..4]))
    } else {
        "0x".to_string()
    }
}

/// A contract address that was verified to hold code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractHandle {
    address: Address,
}

impl ContractHandle {
    pub fn address(&self) -> Address {
        self.address
    }
}

/// Entry point for every interaction with the shared wallet contract.
pub struct ContractGateway<'a> {
    client: &'a dyn ChainClient,
    sink: Arc<dyn TransactionSink>,
}

impl<'a> ContractGateway<'a> {
    pub fn new(client: &'a dyn ChainClient) -> Self {
        Self {
            client,
            sink: Arc::new(LogTransactionSink),
        }
    }

    /// Replace the sink receiving confirmed transaction metadata.
    pub fn with_sink(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub async fn bind(&self, contract: &str) -> Result<ContractHandle> {
        let address = validate_contract_address(self.client, contract).await?;
        debug!(%address, "contract bound");
        Ok(ContractHandle { address })
    }

    /// Read-only call; no signer involved.
    pub async fn call<C: SolCall + Send>(
        &self,
        handle: &ContractHandle,
        call: C,
    ) -> Result<C::Return> {
        let request = TransactionRequest::default()
            .with_to(handle.address)
            .with_input(call.abi_encode());
        let output = self.client.call(request).await?;
        C::abi_decode_returns(&output).map_err(|e| {
            WalletError::from(ChainError::Rpc(format!("decoding {} output: {e}", C::SIGNATURE)))
        })
    }

    /// Submit a state-changing call and block until it is mined.
    ///
    /// A mined receipt with failed status is always `TransactionReverted`.
    pub async fn transact_and_confirm(
        &self,
        handle: &ContractHandle,
        signer: Signer,
        method: ContractMethod,
    ) -> Result<TransactionReceipt> {
        let operation = method.operation();
        let calldata = method.calldata();
        debug!(operation, selector = %selector_of(&calldata), contract = %handle.address, "signing call");
        let signed = signer.sign(TxKind::Call(handle.address), calldata).await?;
        self.submit_and_confirm(operation, signed).await
    }

    /// Deploy a fresh shared wallet and return its address.
    pub async fn deploy(&self, signer: Signer) -> Result<Address> {
        let signed = signer.sign(TxKind::Create, creation_code()).await?;
        let receipt = self.submit_and_confirm("deploy", signed).await?;
        let address = receipt.contract_address.ok_or_else(|| {
            WalletError::InvalidContractAddress(format!(
                "receipt of {} carries no contract address",
                receipt.tx_hash
            ))
        })?;
        validate_contract_address(self.client, &address.to_string()).await
    }

    async fn submit_and_confirm(
        &self,
        operation: &'static str,
        signed: SignedTransaction,
    ) -> Result<TransactionReceipt> {
        let tx_hash = self.client.send_raw_transaction(signed.raw).await?;
        info!(operation, %tx_hash, from = %signed.from, nonce = signed.nonce, "transaction submitted");

        let receipt = self.client.wait_mined(tx_hash).await?;
        if !receipt.status {
            warn!(operation, %tx_hash, block = ?receipt.block_number, "transaction reverted");
            return Err(WalletError::TransactionReverted {
                tx_hash: receipt.tx_hash,
            });
        }

        info!(operation, %tx_hash, gas_used = receipt.gas_used, "transaction confirmed");
        self.sink.record(TransactionInfo::new(operation, &receipt));
        Ok(receipt)
    }
}
