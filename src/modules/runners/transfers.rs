//! Transfer command (send, receive)

use std::sync::Arc;

use tracing::info;

use super::{positive_amount, ActionOutcome, RunnerContext};
use crate::config::TxSettings;
use crate::core::{require_address, Result, TransferAction};
use crate::domain::TransactionSink;
use crate::infrastructure::ethereum::{ChainClient, ContractMethod};

/// Moves funds into the contract or out to a beneficiary.
#[derive(Clone)]
pub struct TransfersRunner {
    ctx: RunnerContext,
}

impl TransfersRunner {
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
        amount: i64,
    ) -> Result<ActionOutcome> {
        let action: TransferAction = action.parse()?;
        let amount = positive_amount(amount)?;

        let receipt = match action {
            TransferAction::Send => {
                let to = require_address(target, "recipient")?;
                info!(%to, %amount, "sending funds");
                self.ctx
                    .transact(client, ContractMethod::SendMoney { to, amount }, None)
                    .await?
            }
            TransferAction::Receive => {
                info!(%amount, "funding contract");
                self.ctx
                    .transact(client, ContractMethod::Receive, Some(amount))
                    .await?
            }
        };
        Ok(ActionOutcome::Confirmed(receipt))
    }
}
