use std::path::PathBuf;

use clap::Parser;
use proposer_primitives::{parse_salt, to_checksum};
use safe_multisig::{BuilderConfig, ProposalBuilder};

use crate::utils::load_artifact_bytecode;

/// Predicts where the Safe would place a contract via CREATE2.
#[derive(Debug, Parser)]
pub struct AddressCommand {
    #[arg(long = "safe", value_name = "ADDRESS", env = "SAFE_ADDRESS", help = "The deploying Safe.")]
    pub safe_address: String,

    #[arg(
        long,
        value_name = "HEX",
        required_unless_present = "artifact",
        help = "Init code, including any encoded constructor arguments."
    )]
    pub bytecode: Option<String>,

    #[arg(long, value_name = "FILE", conflicts_with = "bytecode", help = "Compiled artifact.")]
    pub artifact: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SALT",
        help = "A 32-byte hex salt, or any text to be hashed into one."
    )]
    pub salt: String,
}

impl AddressCommand {
    pub fn execute(self) -> eyre::Result<()> {
        let Self { safe_address, bytecode, artifact, salt } = self;

        let bytecode = match (bytecode, artifact) {
            (Some(bytecode), _) => bytecode,
            (None, Some(artifact)) => load_artifact_bytecode(artifact)?,
            (None, None) => eyre::bail!("Either --bytecode or --artifact is required"),
        };

        // the chain plays no part in CREATE2
        let builder = ProposalBuilder::new(BuilderConfig {
            safe_address,
            chain_id: 1,
            default_gas_settings: None,
        })?;
        let address = builder.calculate_deployment_address(&bytecode, parse_salt(&salt))?;

        println!("{}", to_checksum(&address));
        Ok(())
    }
}
