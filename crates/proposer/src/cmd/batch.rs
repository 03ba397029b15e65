use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use safe_multisig::{
    now_timestamp, BuilderConfig, Proposal, ProposalBuilder, ProposalMetadata, SerializedProposal,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    common::with_generator,
    utils::{load_config, print_success_message, write_proposal},
};

/// Combines single-transaction proposals into one batch, in the order given.
#[derive(Debug, Parser)]
pub struct BatchCommand {
    #[arg(value_name = "PROPOSALS", required = true, help = "Proposal files to combine.")]
    pub proposals: Vec<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Where to write the batch proposal.")]
    pub out: PathBuf,
}

impl BatchCommand {
    pub fn execute(self) -> eyre::Result<()> {
        let Self { proposals, out } = self;

        let mut target: Option<(String, u64)> = None;
        let mut transactions = Vec::with_capacity(proposals.len());
        let mut sources = Vec::with_capacity(proposals.len());

        for path in &proposals {
            let envelope: SerializedProposal =
                load_config(path).wrap_err_with(|| format!("Failed to load proposal {path:?}"))?;

            if !envelope.verify_hash()? {
                eyre::bail!("Proposal {path:?} does not match its validation hash");
            }

            let envelope_target = (envelope.safe_address.to_lowercase(), envelope.chain_id);
            match &target {
                None => target = Some(envelope_target),
                Some(expected) if *expected != envelope_target => {
                    eyre::bail!("Proposal {path:?} targets a different Safe or chain");
                }
                Some(_) => {}
            }

            match envelope.proposal {
                Proposal::Single(tx) => transactions.push(tx),
                Proposal::Batch(_) => eyre::bail!("Proposal {path:?} is already a batch"),
            }
            sources.push(Value::String(path.display().to_string()));
            debug!(target: "proposer::cli::batch", "added {:?}", path);
        }

        let (safe_address, chain_id) =
            target.ok_or_else(|| eyre::eyre!("At least one proposal is required"))?;
        let builder = ProposalBuilder::new(BuilderConfig {
            safe_address,
            chain_id,
            default_gas_settings: None,
        })?;

        let mut extra = with_generator(Default::default());
        extra.insert("sources".to_string(), Value::Array(sources));
        let metadata = ProposalMetadata {
            contract_name: None,
            timestamp: Some(now_timestamp()),
            extra,
        };

        let batch = builder.create_batch_proposal(transactions, metadata.clone());
        if !builder.validate_batch(&batch) {
            eyre::bail!("Batch contains a structurally invalid transaction");
        }

        let count = batch.transactions.len();
        let envelope = builder.envelope(Proposal::Batch(batch), metadata)?;
        write_proposal(&out, &serde_json::to_string_pretty(&envelope)?)?;

        info!(target: "proposer::cli::batch", "wrote {:?}", out);
        print_success_message(&format!(
            "✅ Batch of {count} transactions written to {} (hash {})",
            out.display(),
            envelope.validation_hash
        ));

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use safe_multisig::{GasSettings, TransactionProposal};
    use std::fs;
    use tempfile::tempdir;

    const SAFE: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn write_single(dir: &std::path::Path, name: &str, chain_id: u64, data: &str) -> PathBuf {
        let builder = ProposalBuilder::new(BuilderConfig {
            safe_address: SAFE.to_string(),
            chain_id,
            default_gas_settings: None,
        })
        .unwrap();
        let tx = TransactionProposal {
            to: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            value: "0".to_string(),
            data: data.to_string(),
            operation: 0,
            gas: GasSettings::default(),
        };
        let path = dir.join(name);
        fs::write(&path, builder.serialize_proposal(tx, ProposalMetadata::default()).unwrap())
            .unwrap();
        path
    }

    #[test]
    fn batches_in_argument_order() {
        let temp_dir = tempdir().unwrap();
        let first = write_single(temp_dir.path(), "a.json", 1, "0x01");
        let second = write_single(temp_dir.path(), "b.json", 1, "0x02");
        let out = temp_dir.path().join("batch.json");

        BatchCommand { proposals: vec![second, first], out: out.clone() }.execute().unwrap();

        let envelope: SerializedProposal =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let Proposal::Batch(batch) = envelope.proposal else {
            panic!("expected a batch");
        };
        let data: Vec<_> = batch.transactions.iter().map(|tx| tx.data.as_str()).collect();
        assert_eq!(data, vec!["0x02", "0x01"]);
    }

    #[test]
    fn rejects_mixed_chains() {
        let temp_dir = tempdir().unwrap();
        let first = write_single(temp_dir.path(), "a.json", 1, "0x01");
        let second = write_single(temp_dir.path(), "b.json", 137, "0x02");

        let result = BatchCommand {
            proposals: vec![first, second],
            out: temp_dir.path().join("batch.json"),
        }
        .execute();
        assert!(result.is_err());
    }
}
