use std::collections::BTreeMap;

use proposer_primitives::{canonical_json, keccak_hex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::DEFAULT_UPGRADE_SIGNATURE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Call = 0,
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(operation: OperationType) -> Self {
        operation as u8
    }
}

impl TryFrom<u8> for OperationType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(other),
        }
    }
}

/// Caller-supplied gas fields merged into every built transaction.
///
/// These are opaque to the builder and passed through exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_tx_gas: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_gas: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_token: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_receiver: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Value>,
}

/// An unsigned Safe transaction.
///
/// Fields keep their wire representation so that malformed documents can be
/// inspected by [`crate::ProposalBuilder::validate_proposal`] instead of failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionProposal {
    pub to: String,
    /// Decimal amount in wei.
    pub value: String,
    pub data: String,
    pub operation: u8,
    #[serde(flatten)]
    pub gas: GasSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Ordered transactions meant to be executed together.
///
/// Order is preserved as given; all-or-nothing execution is up to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProposal {
    pub transactions: Vec<TransactionProposal>,
    #[serde(default)]
    pub metadata: ProposalMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Proposal {
    Single(TransactionProposal),
    Batch(BatchProposal),
}

impl From<TransactionProposal> for Proposal {
    fn from(tx: TransactionProposal) -> Self {
        Self::Single(tx)
    }
}

impl From<BatchProposal> for Proposal {
    fn from(batch: BatchProposal) -> Self {
        Self::Batch(batch)
    }
}

impl Proposal {
    pub fn transactions(&self) -> Vec<&TransactionProposal> {
        match self {
            Self::Single(tx) => vec![tx],
            Self::Batch(batch) => batch.transactions.iter().collect(),
        }
    }

    /// Content hash binding a stored proposal to its transaction intent.
    ///
    /// Computed over the canonical JSON encoding of the proposal alone, so envelope
    /// bookkeeping and pretty-printing never affect it.
    pub fn validation_hash(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        Ok(keccak_hex(canonical_json(&value)))
    }
}

/// The document handed to downstream signing tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedProposal {
    pub proposal: Proposal,
    pub metadata: ProposalMetadata,
    pub safe_address: String,
    pub chain_id: u64,
    pub validation_hash: String,
    pub timestamp: String,
}

impl SerializedProposal {
    /// Returns `true` if the stored hash still matches the stored proposal.
    pub fn verify_hash(&self) -> Result<bool, serde_json::Error> {
        Ok(self.proposal.validation_hash()?.eq_ignore_ascii_case(&self.validation_hash))
    }
}

/// A constructor or call argument.
///
/// Plain JSON values have their ABI type inferred. The `{ "type": ..., "value": ... }`
/// form pins the type explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbiArg {
    Typed {
        #[serde(rename = "type")]
        ty: String,
        value: Value,
    },
    Inferred(Value),
}

impl AbiArg {
    pub fn typed(ty: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Typed { ty: ty.into(), value: value.into() }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Typed { value, .. } | Self::Inferred(value) => value,
        }
    }
}

impl From<Value> for AbiArg {
    fn from(value: Value) -> Self {
        Self::Inferred(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub contract_name: String,
    pub bytecode: String,
    #[serde(default)]
    pub constructor_args: Vec<AbiArg>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub proxy_address: String,
    pub new_implementation: String,
    #[serde(default = "default_upgrade_signature")]
    pub function_selector: String,
    #[serde(default)]
    pub upgrade_args: Vec<AbiArg>,
}

fn default_upgrade_signature() -> String {
    DEFAULT_UPGRADE_SIGNATURE.to_string()
}

/// A built proposal together with the metadata describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProposal {
    pub proposal: TransactionProposal,
    pub metadata: ProposalMetadata,
}
