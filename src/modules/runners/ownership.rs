//! Ownership command (get, transfer)

use std::sync::Arc;

use tracing::info;

use super::{ActionOutcome, RunnerContext};
use crate::config::TxSettings;
use crate::core::{require_address, OwnershipAction, Result};
use crate::domain::TransactionSink;
use crate::infrastructure::ethereum::{ChainClient, ContractMethod, SharedWallet};

/// Reads or hands over contract ownership.
#[derive(Clone)]
pub struct OwnershipRunner {
    ctx: RunnerContext,
}

impl OwnershipRunner {
    pub fn new(settings: TxSettings) -> Self {
        Self {
            ctx: RunnerContext::new(settings),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.ctx.set_sink(sink);
        self
    }

    pub async fn run(
        &self,
        client: &dyn ChainClient,
        action: &str,
        target: &str,
    ) -> Result<ActionOutcome> {
        match action.parse::<OwnershipAction>()? {
            OwnershipAction::Get => {
                let owner = self.ctx.call(client, SharedWallet::ownerCall {}).await?;
                Ok(ActionOutcome::Owner(owner))
            }
            OwnershipAction::Transfer => {
                let new_owner = require_address(target, "new owner")?;
                info!(%new_owner, "transferring ownership");
                let receipt = self
                    .ctx
                    .transact(client, ContractMethod::TransferOwnership { new_owner }, None)
                    .await?;
                Ok(ActionOutcome::Confirmed(receipt))
            }
        }
    }
}
