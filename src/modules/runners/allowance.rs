//! Allowance command (set, get, increase, reduce)

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::info;

use super::{positive_amount, ActionOutcome, RunnerContext};
use crate::config::TxSettings;
use crate::core::{require_address, to_display_unit, AllowanceAction, Result};
use crate::domain::TransactionSink;
use crate::infrastructure::ethereum::{ChainClient, ContractMethod, SharedWallet};

/// Reads and changes per-beneficiary allowances.
#[derive(Clone)]
pub struct AllowanceRunner {
    ctx: RunnerContext,
}

impl AllowanceRunner {
    pub fn new(settings: TxSettings) -> Self {
        Self {
            ctx: RunnerContext::new(settings),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.ctx.set_sink(sink);
        self
    }

    /// `get` ignores `amount`; every other action needs it positive.
    pub async fn run(
        &self,
        client: &dyn ChainClient,
        action: &str,
        target: &str,
        amount: i64,
    ) -> Result<ActionOutcome> {
        let action: AllowanceAction = action.parse()?;
        let amount = match action {
            AllowanceAction::Get => U256::ZERO,
            _ => positive_amount(amount)?,
        };
        let beneficiary = require_address(target, "beneficiary")?;

        let method = match action {
            AllowanceAction::Get => return self.get(client, beneficiary).await,
            AllowanceAction::Set => ContractMethod::SetAllowance {
                beneficiary,
                amount,
            },
            AllowanceAction::Increase => ContractMethod::IncreaseAllowance {
                beneficiary,
                amount,
            },
            AllowanceAction::Reduce => ContractMethod::ReduceAllowance {
                beneficiary,
                amount,
            },
        };
        info!(%action, %beneficiary, "changing allowance");
        let receipt = self.ctx.transact(client, method, None).await?;
        Ok(ActionOutcome::Confirmed(receipt))
    }

    async fn get(&self, client: &dyn ChainClient, beneficiary: Address) -> Result<ActionOutcome> {
        let allowance = self
            .ctx
            .call(
                client,
                SharedWallet::allowanceCall {
                    _beneficiary: beneficiary,
                },
            )
            .await?;
        Ok(ActionOutcome::Allowance {
            beneficiary,
            amount: to_display_unit(allowance),
        })
    }
}
