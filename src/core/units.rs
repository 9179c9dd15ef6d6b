//! Unit conversion between wei and whole ether
//!
//! Integer arithmetic only. Converting back to ether truncates toward zero,
//! so balances carrying a sub-ether remainder lose that remainder.

use alloy::primitives::U256;
use serde::Serializer;

/// Wei per ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Ether to wei.
pub fn to_smallest_unit(ether: u64) -> U256 {
    U256::from(ether) * U256::from(WEI_PER_ETHER)
}

/// Wei to ether, truncating any remainder.
pub fn to_display_unit(wei: U256) -> U256 {
    wei / U256::from(WEI_PER_ETHER)
}

/// Serialize a `U256` as a decimal string.
pub fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
