use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

lazy_static! {
    static ref MIN_SIGNERS: Regex = Regex::new(r"\bmin_signers\s*:?=\s*([0-9_]+)").unwrap();
    static ref ALLOWED_NETWORKS: Regex =
        Regex::new(r"\ballowed_networks\s*:?=\s*\[([^\]]*)\]").unwrap();
    static ref MAX_GAS_LIMIT: Regex = Regex::new(r"\bmax_gas_limit\s*:?=\s*([0-9_]+)").unwrap();
    static ref QUOTED: Regex = Regex::new(r#"["']([^"']+)["']"#).unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerRules {
    pub min_threshold: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRules {
    pub allowed: Option<Vec<String>>,
    pub max_gas_limit: Option<u64>,
}

/// Reserved for security rules; no document key populates it yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRules {}

/// Rules extracted from a policy document. Unset fields fall back to the
/// validator's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRuleSet {
    pub signers: SignerRules,
    pub network: NetworkRules,
    pub security: SecurityRules,
}

/// Extracts the recognised assignments from free-form rule text.
///
/// Only `min_signers`, `allowed_networks` and `max_gas_limit` are read; everything else
/// in the document is ignored, as is anything after a `#` on a line.
pub fn parse_policy(text: &str) -> PolicyRuleSet {
    let text = strip_comments(text);
    let mut rules = PolicyRuleSet::default();

    rules.signers.min_threshold = capture_number(&MIN_SIGNERS, &text, "min_signers");
    rules.network.max_gas_limit = capture_number(&MAX_GAS_LIMIT, &text, "max_gas_limit");
    rules.network.allowed = ALLOWED_NETWORKS.captures(&text).map(|caps| {
        QUOTED
            .captures_iter(&caps[1])
            .map(|name| name[1].trim().to_lowercase())
            .collect()
    });

    trace!(target: "proposer::policy", ?rules, "parsed policy document");

    rules
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capture_number<T: std::str::FromStr>(re: &Regex, text: &str, key: &str) -> Option<T> {
    let raw = re.captures(text)?[1].replace('_', "");
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(target: "proposer::policy", "ignoring out-of-range {key} value {raw}");
            None
        }
    }
}
