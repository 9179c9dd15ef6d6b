//! Contract event kinds and their decoded records

use std::fmt;

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::address::serialize_checksum;
use crate::core::units::{serialize_decimal, to_display_unit};
use crate::infrastructure::ethereum::SharedWallet;

/// Every event the shared wallet emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AllowanceChanged,
    MoneyReceived,
    MoneySent,
    OwnershipTransferred,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::AllowanceChanged,
        EventKind::MoneyReceived,
        EventKind::MoneySent,
        EventKind::OwnershipTransferred,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::AllowanceChanged => "AllowanceChanged",
            EventKind::MoneyReceived => "MoneyReceived",
            EventKind::MoneySent => "MoneySent",
            EventKind::OwnershipTransferred => "OwnershipTransferred",
        }
    }

    /// Topic0 of the event.
    pub fn signature_hash(&self) -> B256 {
        match self {
            EventKind::AllowanceChanged => SharedWallet::AllowanceChanged::SIGNATURE_HASH,
            EventKind::MoneyReceived => SharedWallet::MoneyReceived::SIGNATURE_HASH,
            EventKind::MoneySent => SharedWallet::MoneySent::SIGNATURE_HASH,
            EventKind::OwnershipTransferred => SharedWallet::OwnershipTransferred::SIGNATURE_HASH,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded event, amounts already in ether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type")]
pub enum EventRecord {
    AllowanceChanged {
        #[serde(serialize_with = "serialize_checksum")]
        sender: Address,
        #[serde(serialize_with = "serialize_checksum")]
        beneficiary: Address,
        #[serde(serialize_with = "serialize_decimal")]
        prev_amount: U256,
        #[serde(serialize_with = "serialize_decimal")]
        new_amount: U256,
        timestamp: DateTime<Utc>,
    },
    MoneyReceived {
        #[serde(serialize_with = "serialize_checksum")]
        sender: Address,
        block_number: Option<u64>,
        #[serde(serialize_with = "serialize_decimal")]
        amount: U256,
        timestamp: DateTime<Utc>,
    },
    MoneySent {
        #[serde(serialize_with = "serialize_checksum")]
        beneficiary: Address,
        block_number: Option<u64>,
        #[serde(serialize_with = "serialize_decimal")]
        amount: U256,
        timestamp: DateTime<Utc>,
    },
    OwnershipTransferred {
        #[serde(serialize_with = "serialize_checksum")]
        previous_owner: Address,
        #[serde(serialize_with = "serialize_checksum")]
        new_owner: Address,
        block_number: Option<u64>,
        timestamp: DateTime<Utc>,
    },
}

impl EventRecord {
    /// Decode a raw log of the given kind, stamping it with `observed_at`.
    pub fn decode(
        kind: EventKind,
        log: &Log,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, alloy::sol_types::Error> {
        let block_number = log.block_number;
        let record = match kind {
            EventKind::AllowanceChanged => {
                let event = SharedWallet::AllowanceChanged::decode_log(&log.inner)?.data;
                EventRecord::AllowanceChanged {
                    sender: event.sender,
                    beneficiary: event.beneficiary,
                    prev_amount: to_display_unit(event.prevAmount),
                    new_amount: to_display_unit(event.newAmount),
                    timestamp: observed_at,
                }
            }
            EventKind::MoneyReceived => {
                let event = SharedWallet::MoneyReceived::decode_log(&log.inner)?.data;
                EventRecord::MoneyReceived {
                    sender: event.from,
                    block_number,
                    amount: to_display_unit(event.amount),
                    timestamp: observed_at,
                }
            }
            EventKind::MoneySent => {
                let event = SharedWallet::MoneySent::decode_log(&log.inner)?.data;
                EventRecord::MoneySent {
                    beneficiary: event.beneficiary,
                    block_number,
                    amount: to_display_unit(event.amount),
                    timestamp: observed_at,
                }
            }
            EventKind::OwnershipTransferred => {
                let event = SharedWallet::OwnershipTransferred::decode_log(&log.inner)?.data;
                EventRecord::OwnershipTransferred {
                    previous_owner: event.previousOwner,
                    new_owner: event.newOwner,
                    block_number,
                    timestamp: observed_at,
                }
            }
        };
        Ok(record)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EventRecord::AllowanceChanged { .. } => EventKind::AllowanceChanged,
            EventRecord::MoneyReceived { .. } => EventKind::MoneyReceived,
            EventRecord::MoneySent { .. } => EventKind::MoneySent,
            EventRecord::OwnershipTransferred { .. } => EventKind::OwnershipTransferred,
        }
    }
}
