use std::path::PathBuf;

use clap::Parser;
use proposal_policy::{PolicyValidator, ValidationResult};
use tracing::info;

use crate::{
    common::consts::DEFAULT_POLICY_PATH,
    utils::{print_error_message, print_success_message, print_warning_message},
};

/// Runs the policy checks against a serialized proposal.
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    #[arg(long, value_name = "FILE", help = "The serialized proposal.")]
    pub proposal: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_POLICY_PATH,
        help = "Policy rule document. Built-in defaults apply if it is missing."
    )]
    pub policy: PathBuf,

    #[arg(long, help = "Print the verdict as JSON.")]
    pub json: bool,
}

impl ValidateCommand {
    /// Returns the verdict. Unreadable or malformed proposals are errors, not verdicts.
    pub fn execute(self) -> eyre::Result<bool> {
        let validator = PolicyValidator::new(&self.proposal, &self.policy)?;
        let result = validator.validate();

        info!(
            target: "proposer::cli::validate",
            valid = result.valid,
            violations = result.violations.len(),
            warnings = result.warnings.len(),
            "validated {:?}",
            self.proposal
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            report(&result);
        }

        Ok(result.valid)
    }
}

fn report(result: &ValidationResult) {
    for violation in &result.violations {
        print_error_message(&format!("❌ [{}] {}", violation.rule, violation.message));
    }
    for warning in &result.warnings {
        print_warning_message(&format!("⚠️  {warning}"));
    }

    if result.valid {
        print_success_message("✅ Proposal satisfies the deployment policy");
    } else {
        print_error_message(&format!(
            "Proposal violates the deployment policy ({} errors)",
            result.errors().count()
        ));
    }
}
