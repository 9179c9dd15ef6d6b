//! Address format validation

use alloy::primitives::Address;
use serde::Serializer;

use crate::core::error::{Result, WalletError};

/// Check that `address` is `0x` followed by exactly 40 hex characters.
pub fn validate_address_format(address: &str) -> Result<()> {
    let Some(payload) = address.strip_prefix("0x") else {
        return Err(WalletError::InvalidAddress(address.to_string()));
    };
    if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

/// Validate and parse an address in canonical textual form.
pub fn parse_address(address: &str) -> Result<Address> {
    validate_address_format(address)?;
    address
        .parse::<Address>()
        .map_err(|_| WalletError::InvalidAddress(address.to_string()))
}

/// Parse a required target address, rejecting empty input with `MissingAddress`.
pub fn require_address(address: &str, role: &'static str) -> Result<Address> {
    if address.trim().is_empty() {
        return Err(WalletError::MissingAddress(role));
    }
    parse_address(address)
}

/// Serialize an address in EIP-55 checksummed form.
pub fn serialize_checksum<S: Serializer>(
    address: &Address,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    #[test]
    fn accepts_canonical_addresses() {
        assert!(validate_address_format(VALID).is_ok());
        assert!(validate_address_format(&VALID.to_lowercase()).is_ok());
        assert!(validate_address_format("0x0000000000000000000000000000000000000000").is_ok());
        assert!(validate_address_format("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        let cases = [
            "",
            "0x",
            "fB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0XfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d35",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d3599",
            "0xgB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            " 0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d35é",
        ];
        for case in cases {
            assert!(
                matches!(validate_address_format(case), Err(WalletError::InvalidAddress(_))),
                "{case:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_matches_alloy() {
        let parsed = parse_address(VALID).unwrap();
        assert_eq!(parsed, VALID.parse::<Address>().unwrap());
    }

    #[test]
    fn require_address_distinguishes_missing_from_invalid() {
        assert!(matches!(
            require_address("", "target"),
            Err(WalletError::MissingAddress("target"))
        ));
        assert!(matches!(
            require_address("0x1234", "target"),
            Err(WalletError::InvalidAddress(_))
        ));
        assert!(require_address(VALID, "target").is_ok());
    }
}
