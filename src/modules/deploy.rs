//! Shared wallet deployment

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::config::TxSettings;
use crate::core::Result;
use crate::domain::{LogTransactionSink, TransactionSink};
use crate::infrastructure::ethereum::{build_signer, ChainClient, ContractGateway};

pub struct Deployer {
    settings: TxSettings,
    sink: Arc<dyn TransactionSink>,
}

impl Deployer {
    pub fn new(settings: TxSettings) -> Self {
        Self {
            settings,
            sink: Arc::new(LogTransactionSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Deploy a new contract owned by the configured account.
    pub async fn deploy(&self, client: &dyn ChainClient) -> Result<Address> {
        info!(endpoint = %client.endpoint_name(), "deploying contract");
        // the constructor is not payable
        let signer = build_signer(client, &self.settings.private_key, self.settings.gas)
            .await?
            .with_value(U256::ZERO);
        let address = ContractGateway::new(client)
            .with_sink(self.sink.clone())
            .deploy(signer)
            .await?;
        info!(%address, "contract deployed");
        Ok(address)
    }
}
