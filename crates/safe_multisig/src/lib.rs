//! Unsigned Safe transaction proposals for contract deployments and upgrades.
//!
//! Nothing in this crate signs or broadcasts. A [`ProposalBuilder`] turns compiled
//! bytecode and call descriptions into canonical transaction payloads, predicts CREATE2
//! deployment addresses and wraps proposals in a hash-bound envelope for signers.

pub mod abi;
pub mod builder;
pub mod error;
pub mod transaction_data;

mod consts;

pub use builder::{now_timestamp, BuilderConfig, ProposalBuilder};
pub use consts::DEFAULT_UPGRADE_SIGNATURE;
pub use error::BuilderError;
pub use transaction_data::{
    AbiArg, BatchProposal, BuiltProposal, DeploymentRequest, GasSettings, OperationType,
    Proposal, ProposalMetadata, SerializedProposal, TransactionProposal, UpgradeRequest,
};
