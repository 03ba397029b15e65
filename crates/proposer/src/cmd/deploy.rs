use std::{collections::BTreeMap, path::PathBuf};

use clap::Parser;
use proposer_primitives::{parse_salt, to_checksum};
use safe_multisig::{AbiArg, DeploymentRequest, GasSettings, Proposal};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    common::{with_generator, TargetCliArgs, TargetConfig},
    utils::{load_artifact_bytecode, load_config, print_success_message, write_proposal},
};

/// A deployment as described in the repository's config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    #[serde(flatten)]
    pub target: TargetConfig,
    pub contract_name: String,
    #[serde(default)]
    pub bytecode: Option<String>,
    #[serde(default)]
    pub constructor_args: Vec<AbiArg>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub gas: Option<GasSettings>,
}

#[derive(Debug, Parser)]
pub struct DeployCommand {
    #[arg(long, value_name = "FILE", help = "Deployment config (JSON or YAML).")]
    pub config: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Compiled artifact to take the bytecode from. Overrides the config file."
    )]
    pub artifact: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Where to write the serialized proposal.")]
    pub out: PathBuf,

    #[clap(flatten)]
    pub target: TargetCliArgs,
}

impl DeployCommand {
    pub fn execute(self) -> eyre::Result<()> {
        let Self { config, artifact, out, target } = self;

        let config: DeployConfig = load_config(&config)?;
        let bytecode = match artifact {
            Some(artifact) => load_artifact_bytecode(artifact)?,
            None => config
                .bytecode
                .clone()
                .ok_or_else(|| eyre::eyre!("No bytecode in config and no --artifact given"))?,
        };

        let builder = target.builder(&config.target, config.gas.clone())?;
        let built = builder.create_deployment_proposal(DeploymentRequest {
            contract_name: config.contract_name.clone(),
            bytecode,
            constructor_args: config.constructor_args.clone(),
            value: config.value.clone(),
            metadata: with_generator(config.metadata.clone()),
        })?;

        if !builder.validate_proposal(&built.proposal) {
            eyre::bail!("Built deployment proposal is structurally invalid");
        }

        let mut metadata = built.metadata;
        if let Some(salt) = &config.salt {
            let address =
                builder.calculate_deployment_address(&built.proposal.data, parse_salt(salt))?;
            let address = to_checksum(&address);
            println!("Predicted CREATE2 address: {address}");
            metadata.extra.insert("predictedAddress".to_string(), Value::String(address));
        }

        let proposal = Proposal::Single(built.proposal);
        let envelope = builder.envelope(proposal, metadata)?;
        write_proposal(&out, &serde_json::to_string_pretty(&envelope)?)?;

        info!(target: "proposer::cli::deploy", "wrote {:?}", out);
        print_success_message(&format!(
            "✅ Deployment proposal for {} written to {} (hash {})",
            config.contract_name,
            out.display(),
            envelope.validation_hash
        ));

        Ok(())
    }
}
