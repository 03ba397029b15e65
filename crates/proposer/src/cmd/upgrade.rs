use std::{collections::BTreeMap, path::PathBuf};

use clap::Parser;
use safe_multisig::{now_timestamp, GasSettings, Proposal, ProposalMetadata, UpgradeRequest};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    common::{with_generator, TargetCliArgs, TargetConfig},
    utils::{load_config, print_success_message, write_proposal},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeConfig {
    #[serde(flatten)]
    pub target: TargetConfig,
    #[serde(flatten)]
    pub request: UpgradeRequest,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    #[serde(default)]
    pub gas: Option<GasSettings>,
}

#[derive(Debug, Parser)]
pub struct UpgradeCommand {
    #[arg(long, value_name = "FILE", help = "Upgrade config (JSON or YAML).")]
    pub config: PathBuf,

    #[arg(long, value_name = "FILE", help = "Where to write the serialized proposal.")]
    pub out: PathBuf,

    #[clap(flatten)]
    pub target: TargetCliArgs,
}

impl UpgradeCommand {
    pub fn execute(self) -> eyre::Result<()> {
        let Self { config, out, target } = self;

        let config: UpgradeConfig = load_config(&config)?;
        let builder = target.builder(&config.target, config.gas.clone())?;

        let proposal = builder.create_upgrade_proposal(config.request.clone())?;
        if !builder.validate_proposal(&proposal) {
            eyre::bail!("Built upgrade proposal is structurally invalid");
        }

        let metadata = ProposalMetadata {
            contract_name: config.contract_name.clone(),
            timestamp: Some(now_timestamp()),
            extra: with_generator(config.metadata.clone()),
        };

        let envelope = builder.envelope(Proposal::Single(proposal), metadata)?;
        write_proposal(&out, &serde_json::to_string_pretty(&envelope)?)?;

        info!(target: "proposer::cli::upgrade", "wrote {:?}", out);
        print_success_message(&format!(
            "✅ Upgrade proposal for proxy {} written to {} (hash {})",
            config.request.proxy_address,
            out.display(),
            envelope.validation_hash
        ));

        Ok(())
    }
}
