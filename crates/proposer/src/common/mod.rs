use std::collections::BTreeMap;

use clap::Args;
use proposer_primitives::chains::chain_id_for;
use proposer_version::VERSION;
use safe_multisig::{BuilderConfig, GasSettings, ProposalBuilder};
use serde::Deserialize;
use serde_json::Value;

pub mod consts;

/// Safe and chain selection shared by every command that builds proposals.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetCliArgs {
    #[arg(
        long = "safe",
        value_name = "ADDRESS",
        env = "SAFE_ADDRESS",
        help = "The Safe proposing the transaction. Overrides the config file."
    )]
    pub safe_address: Option<String>,

    #[arg(long, env = "CHAIN_ID", help = "Chain ID of the target network.")]
    pub chain_id: Option<u64>,

    #[arg(long, env = "NETWORK", help = "Name of the target network, e.g. sepolia.")]
    pub network: Option<String>,
}

/// The target section of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub safe_address: Option<String>,
}

impl TargetCliArgs {
    /// Merges flags over the config file. An explicit chain ID wins over a network name.
    pub fn resolve(&self, config: &TargetConfig) -> eyre::Result<(String, u64)> {
        let safe_address = self
            .safe_address
            .clone()
            .or_else(|| config.safe_address.clone())
            .ok_or_else(|| eyre::eyre!("Safe address is required!"))?;

        let chain_id = match self.chain_id.or(config.chain_id) {
            Some(chain_id) => chain_id,
            None => {
                let network = self
                    .network
                    .as_deref()
                    .or(config.network.as_deref())
                    .ok_or_else(|| eyre::eyre!("ChainID or network is required!"))?;
                chain_id_for(network)
                    .ok_or_else(|| eyre::eyre!("Unknown network {network:?}"))?
            }
        };

        Ok((safe_address, chain_id))
    }

    pub fn builder(
        &self,
        config: &TargetConfig,
        gas: Option<GasSettings>,
    ) -> eyre::Result<ProposalBuilder> {
        let (safe_address, chain_id) = self.resolve(config)?;
        let builder = ProposalBuilder::new(BuilderConfig {
            safe_address,
            chain_id,
            default_gas_settings: gas,
        })?;
        Ok(builder)
    }
}

/// Stamps the proposer version into caller metadata unless the caller set one.
pub fn with_generator(mut metadata: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    metadata
        .entry("generator".to_string())
        .or_insert_with(|| Value::String(VERSION.to_string()));
    metadata
}
