/// Signature used for upgrade proposals when the request does not name one.
pub const DEFAULT_UPGRADE_SIGNATURE: &str = "upgradeToAndCall(address,bytes)";

/// ABI type assigned to constructor arguments whose JSON kind has no better match.
pub const FALLBACK_ARG_TYPE: &str = "bytes32";
