#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Invalid Safe address: {0}")]
    InvalidSafeAddress(String),
    #[error("Invalid chain ID: {0}. Chain ID must be a positive integer")]
    InvalidChainId(u64),
    #[error("Invalid proxy address: {0}")]
    InvalidProxyAddress(String),
    #[error("Invalid implementation address: {0}")]
    InvalidImplementationAddress(String),
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),
    #[error("Invalid function signature {signature:?}: {reason}")]
    InvalidFunctionSignature { signature: String, reason: String },
    #[error("Invalid argument #{index}: {reason}")]
    InvalidArgument { index: usize, reason: String },
    #[error("ABI encoding failed: {0}")]
    Encoding(String),
    #[error("Failed to serialize proposal: {0}")]
    Serialization(#[from] serde_json::Error),
}
