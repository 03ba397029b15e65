use std::path::PathBuf;

use proposer_primitives::fs::FsError;

/// Configuration failures raised while constructing a validator.
///
/// Policy findings are never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Unable to read proposal: {0}")]
    UnableToReadProposal(#[source] FsError),
    #[error("Proposal {0:?} is not a valid proposal document: {1}")]
    UnableToParseProposal(PathBuf, #[source] serde_json::Error),
}
