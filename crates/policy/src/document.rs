use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A loosely typed view of a serialized proposal.
///
/// Every field is optional so that incomplete or hand-edited documents can still be
/// evaluated and reported on, rather than rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDocument {
    #[serde(default)]
    pub proposal: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub safe_address: Option<Value>,
    #[serde(default)]
    pub chain_id: Option<Value>,
    #[serde(default)]
    pub validation_hash: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl FromStr for ProposalDocument {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl ProposalDocument {
    /// The transactions carried by the proposal: the members of a batch, or the single
    /// transaction object itself. Non-object entries are skipped.
    pub fn transactions(&self) -> Vec<&Map<String, Value>> {
        match &self.proposal {
            Some(Value::Object(tx)) => match tx.get("transactions") {
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
                _ => vec![tx],
            },
            _ => vec![],
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(&self.proposal, Some(Value::Object(tx)) if tx.contains_key("transactions"))
    }

    pub fn has_proposal(&self) -> bool {
        present(self.proposal.as_ref())
    }

    pub fn has_safe_address(&self) -> bool {
        present(self.safe_address.as_ref())
    }

    pub fn has_validation_hash(&self) -> bool {
        present(self.validation_hash.as_ref())
    }

    pub fn has_timestamp(&self) -> bool {
        present(self.metadata.as_ref().and_then(|m| m.get("timestamp")))
    }
}

/// `null`, `false`, `0` and empty strings count as absent.
pub fn present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Renders a scalar as plain text, without JSON quoting for strings.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads an unsigned integer given either as a JSON number or a decimal string.
pub fn as_unsigned(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}
