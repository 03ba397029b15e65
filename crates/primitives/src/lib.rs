pub use alloy_primitives;

/// Validation and normalization of 160-bit account addresses.
pub mod address;

/// Content hashing and the canonical JSON encoding used as hash input.
pub mod hash;

/// Static table of the public networks proposals may target.
pub mod chains;

pub mod fs;

pub use address::{is_address, is_zero_address, parse_address, to_checksum, AddressError, ZERO_ADDRESS};
pub use hash::{canonical_json, keccak_hex, parse_salt};
