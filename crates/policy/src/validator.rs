use std::path::Path;

use proposer_primitives::{
    chains::{is_known_chain, network_name_for},
    fs::read_file,
    is_zero_address,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    document::{as_unsigned, present, scalar_text, ProposalDocument},
    error::PolicyError,
    lint::TextualLint,
    rules::{parse_policy, PolicyRuleSet},
};

/// Gas ceiling applied when the policy document sets none.
pub const DEFAULT_MAX_GAS_LIMIT: u64 = 10_000_000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
pub enum Rule {
    #[serde(rename = "safe.required")]
    #[strum(serialize = "safe.required")]
    SafeRequired,
    #[serde(rename = "proposal.structure")]
    #[strum(serialize = "proposal.structure")]
    ProposalStructure,
    #[serde(rename = "deployment.bytecode")]
    #[strum(serialize = "deployment.bytecode")]
    DeploymentBytecode,
    #[serde(rename = "network.gasLimit")]
    #[strum(serialize = "network.gasLimit")]
    GasLimit,
    #[serde(rename = "network.allowed")]
    #[strum(serialize = "network.allowed")]
    NetworkAllowed,
    #[serde(rename = "security.hash")]
    #[strum(serialize = "security.hash")]
    ValidationHash,
    #[serde(rename = "security.pattern")]
    #[strum(serialize = "security.pattern")]
    SuspiciousPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub rule: Rule,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff no violation has [`Severity::Error`].
    pub valid: bool,
    pub violations: Vec<PolicyViolation>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &PolicyViolation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    fn error(&mut self, rule: Rule, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "proposer::policy", %rule, "{message}");
        self.violations.push(PolicyViolation { rule, message, severity: Severity::Error });
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Checks one serialized proposal against one rule set.
///
/// A missing proposal is fatal at construction, while a missing policy document falls
/// back to an empty rule set and the built-in defaults.
#[derive(Debug, Clone)]
pub struct PolicyValidator {
    document: ProposalDocument,
    rules: PolicyRuleSet,
    lint: TextualLint,
}

impl PolicyValidator {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        proposal_path: P,
        policy_path: Q,
    ) -> Result<Self, PolicyError> {
        let proposal_path = proposal_path.as_ref();
        let text = read_file(proposal_path).map_err(PolicyError::UnableToReadProposal)?;
        let document: ProposalDocument = text
            .parse()
            .map_err(|e| PolicyError::UnableToParseProposal(proposal_path.to_path_buf(), e))?;

        let rules = match read_file(policy_path.as_ref()) {
            Ok(policy) => parse_policy(&policy),
            Err(e) => {
                warn!(target: "proposer::policy", "{e}; validating with default rules");
                PolicyRuleSet::default()
            }
        };

        Ok(Self::from_parts(document, rules))
    }

    pub fn from_parts(document: ProposalDocument, rules: PolicyRuleSet) -> Self {
        Self { document, rules, lint: TextualLint::default() }
    }

    pub fn with_lint(self, lint: TextualLint) -> Self {
        Self { lint, ..self }
    }

    pub fn rules(&self) -> &PolicyRuleSet {
        &self.rules
    }

    pub fn document(&self) -> &ProposalDocument {
        &self.document
    }

    /// Runs every check and collects all findings; no check short-circuits another.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let doc = &self.document;

        if !doc.has_safe_address() {
            result.error(Rule::SafeRequired, "Safe address is required");
        }

        if !doc.has_proposal() {
            result.error(Rule::ProposalStructure, "Proposal structure is missing");
        }

        let batch = doc.is_batch();
        let transactions: Vec<_> = doc
            .transactions()
            .into_iter()
            .enumerate()
            .map(|(index, tx)| {
                let label = if batch { format!("Transaction #{index}: ") } else { String::new() };
                (label, tx)
            })
            .collect();

        for (label, tx) in &transactions {
            self.check_transaction(tx, label, &mut result);
        }

        if let Some(chain_id) = doc.chain_id.as_ref().filter(|c| present(Some(*c))) {
            self.check_network(chain_id, &mut result);
        }

        if !doc.has_timestamp() {
            result.warn("Proposal metadata carries no timestamp");
        }

        if !doc.has_validation_hash() {
            result.error(Rule::ValidationHash, "Validation hash is required");
        }

        for (label, tx) in &transactions {
            self.lint_transaction(tx, label, &mut result);
        }

        let valid = result.errors().next().is_none();
        result.valid = valid;
        result
    }

    fn check_transaction(
        &self,
        tx: &Map<String, Value>,
        label: &str,
        result: &mut ValidationResult,
    ) {
        let is_deployment = tx.get("to").and_then(Value::as_str).is_some_and(is_zero_address)
            && tx.get("operation").and_then(Value::as_u64) == Some(0);
        let data = tx.get("data").and_then(Value::as_str);

        if is_deployment && matches!(data, None | Some("0x")) {
            result.error(
                Rule::DeploymentBytecode,
                format!("{label}Deployment transaction must include contract bytecode"),
            );
        }

        if let Some(value) = tx.get("value").filter(|v| !v.is_null()) {
            let amount = scalar_text(value);
            if !amount.is_empty() && amount != "0" {
                result.warn(format!("{label}Proposal transfers {amount} wei"));
            }
        }

        if let Some(gas_limit) = tx.get("gasLimit").filter(|v| !v.is_null()) {
            let max = self.rules.network.max_gas_limit.unwrap_or(DEFAULT_MAX_GAS_LIMIT);
            match as_unsigned(gas_limit) {
                Some(limit) if limit > u128::from(max) => result.error(
                    Rule::GasLimit,
                    format!("{label}Gas limit {limit} exceeds maximum of {max}"),
                ),
                Some(_) => {}
                None => result.error(
                    Rule::GasLimit,
                    format!(
                        "{label}Gas limit {} is not an unsigned integer",
                        scalar_text(gas_limit)
                    ),
                ),
            }
        }
    }

    /// Heuristic textual lint stage; see [`crate::lint`] for its limits.
    fn lint_transaction(
        &self,
        tx: &Map<String, Value>,
        label: &str,
        result: &mut ValidationResult,
    ) {
        let Some(data) = tx.get("data").and_then(Value::as_str) else {
            return;
        };

        for finding in self.lint.scan(data) {
            result.error(
                Rule::SuspiciousPattern,
                format!(
                    "{label}Transaction data matches suspicious pattern {} ({})",
                    finding.pattern, finding.description
                ),
            );
        }
    }

    /// A chain must be one of the built-in public networks and, when the policy lists
    /// allowed networks, also appear in that list.
    fn check_network(&self, chain_id: &Value, result: &mut ValidationResult) {
        let known = as_unsigned(chain_id)
            .and_then(|id| u64::try_from(id).ok())
            .filter(|id| is_known_chain(*id))
            .and_then(|id| network_name_for(id).map(|name| (id, name)));

        let Some((id, name)) = known else {
            result.error(
                Rule::NetworkAllowed,
                format!("Chain ID {} is not an allowed network", scalar_text(chain_id)),
            );
            return;
        };

        if let Some(allowed) = &self.rules.network.allowed {
            if !allowed.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                result.error(
                    Rule::NetworkAllowed,
                    format!("Network {name} (chain ID {id}) is not in the policy's allowed networks"),
                );
            }
        }
    }
}
