//! Action runners
//!
//! Each runner parses its action against a fixed allow-set, checks the
//! action's amount and target preconditions, and only then reaches the node.
//!
//! Runners:
//! - allowance: set, get, increase, reduce
//! - balance: address, contract
//! - ownership: get, transfer
//! - transfers: send, receive

mod allowance;
mod balance;
mod ownership;
mod transfers;

pub use allowance::AllowanceRunner;
pub use balance::BalanceRunner;
pub use ownership::OwnershipRunner;
pub use transfers::TransfersRunner;

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::config::TxSettings;
use crate::core::{to_smallest_unit, Result, WalletError};
use crate::domain::{LogTransactionSink, TransactionReceipt, TransactionSink};
use crate::infrastructure::ethereum::{build_signer, ChainClient, ContractGateway, ContractMethod};

/// What a runner produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Allowance of `beneficiary`, in ether
    Allowance { beneficiary: Address, amount: U256 },
    /// Native balance of `address`, in ether
    Balance { address: Address, amount: U256 },
    Owner(Address),
    Confirmed(TransactionReceipt),
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Allowance {
                beneficiary,
                amount,
            } => write!(f, "Current allowance for address {beneficiary} is {amount}"),
            ActionOutcome::Balance { address, amount } => {
                write!(f, "The balance of {address} is {amount}")
            }
            ActionOutcome::Owner(owner) => write!(f, "Current owner address is {owner}"),
            ActionOutcome::Confirmed(receipt) => write!(f, "{receipt}"),
        }
    }
}

/// Key material, contract address and the accounting sink shared by a runner.
#[derive(Clone)]
pub(crate) struct RunnerContext {
    settings: TxSettings,
    sink: Arc<dyn TransactionSink>,
}

impl RunnerContext {
    pub(crate) fn new(settings: TxSettings) -> Self {
        Self {
            settings,
            sink: Arc::new(LogTransactionSink),
        }
    }

    pub(crate) fn set_sink(&mut self, sink: Arc<dyn TransactionSink>) {
        self.sink = sink;
    }

    pub(crate) fn contract(&self) -> &str {
        &self.settings.contract
    }

    fn gateway<'a>(&self, client: &'a dyn ChainClient) -> ContractGateway<'a> {
        ContractGateway::new(client).with_sink(self.sink.clone())
    }

    pub(crate) async fn call<C: SolCall + Send>(
        &self,
        client: &dyn ChainClient,
        call: C,
    ) -> Result<C::Return> {
        let gateway = self.gateway(client);
        let handle = gateway.bind(&self.settings.contract).await?;
        gateway.call(&handle, call).await
    }

    /// Bind, build a fresh signer and submit `method`.
    ///
    /// `value` replaces the configured value when set.
    pub(crate) async fn transact(
        &self,
        client: &dyn ChainClient,
        method: ContractMethod,
        value: Option<U256>,
    ) -> Result<TransactionReceipt> {
        let gateway = self.gateway(client);
        let handle = gateway.bind(&self.settings.contract).await?;
        let mut signer = build_signer(client, &self.settings.private_key, self.settings.gas).await?;
        if let Some(value) = value {
            signer = signer.with_value(value);
        }
        gateway.transact_and_confirm(&handle, signer, method).await
    }
}

/// Require a strictly positive ether amount and convert it to wei.
pub(crate) fn positive_amount(amount: i64) -> Result<U256> {
    if amount <= 0 {
        return Err(WalletError::InvalidAmount);
    }
    Ok(to_smallest_unit(amount.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amount_rejects_zero_and_negative() {
        assert!(matches!(positive_amount(0), Err(WalletError::InvalidAmount)));
        assert!(matches!(positive_amount(-3), Err(WalletError::InvalidAmount)));
        assert!(matches!(positive_amount(i64::MIN), Err(WalletError::InvalidAmount)));
        assert_eq!(positive_amount(2).unwrap(), to_smallest_unit(2));
    }

    #[test]
    fn outcome_display() {
        let owner = Address::repeat_byte(0x01);
        assert_eq!(
            ActionOutcome::Owner(owner).to_string(),
            format!("Current owner address is {owner}")
        );
        let outcome = ActionOutcome::Allowance {
            beneficiary: owner,
            amount: U256::from(5u8),
        };
        assert!(outcome.to_string().ends_with(" is 5"));
    }
}
