use std::path::PathBuf;

use clap::Parser;
use safe_multisig::SerializedProposal;

use crate::utils::{load_config, print_error_message, print_success_message};

/// Checks that a stored proposal still matches its validation hash.
#[derive(Debug, Parser)]
pub struct VerifyCommand {
    #[arg(long, value_name = "FILE", help = "The serialized proposal.")]
    pub proposal: PathBuf,
}

impl VerifyCommand {
    /// Returns `false` if the proposal was modified after it was serialized.
    pub fn execute(self) -> eyre::Result<bool> {
        let envelope: SerializedProposal = load_config(&self.proposal)?;
        let matches = envelope.verify_hash()?;

        if matches {
            print_success_message(&format!("✅ Validation hash {} matches", envelope.validation_hash));
        } else {
            print_error_message(&format!(
                "❌ Proposal {} does not match validation hash {}",
                self.proposal.display(),
                envelope.validation_hash
            ));
        }

        Ok(matches)
    }
}
