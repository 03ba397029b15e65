use std::str::FromStr;

use alloy_primitives::{hex, keccak256, B256};
use serde_json::Value;

/// Keccak-256 of `bytes`, rendered as `0x`-prefixed lowercase hex.
pub fn keccak_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_prefixed(keccak256(bytes.as_ref()))
}

/// Encodes a JSON value with object keys sorted at every depth and no whitespace.
///
/// The output depends only on the structure of `value`, never on the key order or
/// formatting of whatever text it was parsed from, which makes it suitable as hash input.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // scalars already have a single compact rendering
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Interprets a user-supplied CREATE2 salt.
///
/// A `0x`-prefixed 32-byte hex string is taken verbatim; any other text is hashed.
pub fn parse_salt(salt: &str) -> B256 {
    if salt.len() == 66 && salt.starts_with("0x") {
        if let Ok(raw) = B256::from_str(salt) {
            return raw;
        }
    }
    keccak256(salt.as_bytes())
}
