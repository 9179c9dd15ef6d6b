//! Balance command (read-only)

use tracing::debug;

use super::{ActionOutcome, RunnerContext};
use crate::config::TxSettings;
use crate::core::{require_address, to_display_unit, BalanceAction, Result};
use crate::infrastructure::ethereum::{validate_contract_address, ChainClient};

/// Native balances of the contract or of an arbitrary account.
#[derive(Clone)]
pub struct BalanceRunner {
    ctx: RunnerContext,
}

impl BalanceRunner {
    pub fn new(settings: TxSettings) -> Self {
        Self {
            ctx: RunnerContext::new(settings),
        }
    }

    pub async fn run(
        &self,
        client: &dyn ChainClient,
        action: &str,
        target: &str,
    ) -> Result<ActionOutcome> {
        let action: BalanceAction = action.parse()?;
        let address = match action {
            BalanceAction::Address => require_address(target, "balance")?,
            BalanceAction::Contract => validate_contract_address(client, self.ctx.contract()).await?,
        };

        let wei = client.balance_at(address).await?;
        debug!(%action, %address, %wei, "balance fetched");
        Ok(ActionOutcome::Balance {
            address,
            amount: to_display_unit(wei),
        })
    }
}
