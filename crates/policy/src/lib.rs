//! Evaluation of serialized proposals against a declarative deployment policy.
//!
//! Findings are returned as data, never raised: a [`ValidationResult`] lists every
//! violated rule at once so a pipeline can report them together.

pub mod document;
pub mod error;
pub mod lint;
pub mod rules;
pub mod validator;

pub use document::ProposalDocument;
pub use error::PolicyError;
pub use lint::{LintFinding, TextualLint};
pub use rules::{parse_policy, PolicyRuleSet};
pub use validator::{
    PolicyValidator, PolicyViolation, Rule, Severity, ValidationResult, DEFAULT_MAX_GAS_LIMIT,
};
