use std::str::FromStr;

use alloy_primitives::Address;
use lazy_static::lazy_static;
use regex::Regex;

/// The reserved all-zero address. A proposal targeting it is a contract deployment.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

lazy_static! {
    static ref ADDRESS_SHAPE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address format: {0}")]
    /// Not `0x` followed by exactly 40 hex digits
    InvalidFormat(String),
    #[error("Invalid address checksum: {0}")]
    /// Mixed-case address whose casing is not a valid EIP-55 checksum
    InvalidChecksum(String),
}

/// Returns `true` if `value` has the exact shape of an account address.
///
/// Mixed-case input is treated as checksummed and must pass EIP-55 verification.
pub fn is_address(value: &str) -> bool {
    parse_address(value).is_ok()
}

/// Parses an address string, enforcing the checksum when the input is mixed-case.
pub fn parse_address(value: &str) -> Result<Address, AddressError> {
    if !ADDRESS_SHAPE.is_match(value) {
        return Err(AddressError::InvalidFormat(value.to_string()));
    }

    let digits = &value[2..];
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(value, None)
            .map_err(|_| AddressError::InvalidChecksum(value.to_string()))
    } else {
        Address::from_str(value).map_err(|_| AddressError::InvalidFormat(value.to_string()))
    }
}

/// Renders an address in canonical EIP-55 checksum case.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Returns `true` for any casing of the reserved zero address.
pub fn is_zero_address(value: &str) -> bool {
    matches!(parse_address(value), Ok(address) if address == Address::ZERO)
}
