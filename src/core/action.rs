//! Actions accepted by each runner
//!
//! Every runner has a fixed allow-set. Parsing an action string outside that
//! set yields `WalletError::InvalidAction` without touching the network.

use std::fmt;
use std::str::FromStr;

use crate::core::error::WalletError;

/// Allowance runner actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceAction {
    Set,
    Get,
    Increase,
    Reduce,
}

/// Balance runner actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceAction {
    Address,
    Contract,
}

/// Ownership runner actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipAction {
    Get,
    Transfer,
}

/// Transfers runner actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    Send,
    Receive,
}

macro_rules! impl_action {
    ($ty:ident, $runner:literal, { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            /// Every action in the allow-set.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = WalletError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(WalletError::InvalidAction {
                        runner: $runner,
                        action: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_action!(AllowanceAction, "allowance", {
    "set" => Set,
    "get" => Get,
    "increase" => Increase,
    "reduce" => Reduce,
});

impl_action!(BalanceAction, "balance", {
    "address" => Address,
    "contract" => Contract,
});

impl_action!(OwnershipAction, "ownership", {
    "get" => Get,
    "transfer" => Transfer,
});

impl_action!(TransferAction, "transfer", {
    "send" => Send,
    "receive" => Receive,
});
