use alloy_primitives::{hex, Address, B256, U256};
use chrono::{SecondsFormat, Utc};
use proposer_primitives::{is_address, is_zero_address, parse_address, to_checksum, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    abi::{encode_call, encode_constructor_args},
    error::BuilderError,
    transaction_data::{
        AbiArg, BatchProposal, BuiltProposal, DeploymentRequest, GasSettings, OperationType,
        Proposal, ProposalMetadata, SerializedProposal, TransactionProposal, UpgradeRequest,
    },
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    pub safe_address: String,
    pub chain_id: u64,
    #[serde(default)]
    pub default_gas_settings: Option<GasSettings>,
}

/// Builds unsigned proposals for a single Safe on a single chain.
///
/// The Safe is modelled as the deploying account, which is what makes deployment
/// addresses predictable before anyone signs.
#[derive(Debug, Clone)]
pub struct ProposalBuilder {
    safe_address: Address,
    chain_id: u64,
    default_gas_settings: GasSettings,
}

impl ProposalBuilder {
    pub fn new(config: BuilderConfig) -> Result<Self, BuilderError> {
        let safe_address = parse_address(&config.safe_address)
            .map_err(|_| BuilderError::InvalidSafeAddress(config.safe_address.clone()))?;

        if config.chain_id == 0 {
            return Err(BuilderError::InvalidChainId(config.chain_id));
        }

        Ok(Self {
            safe_address,
            chain_id: config.chain_id,
            default_gas_settings: config.default_gas_settings.unwrap_or_default(),
        })
    }

    pub fn safe_address(&self) -> Address {
        self.safe_address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Builds a CREATE deployment: the zero address as target and the constructor
    /// arguments appended to the bytecode.
    pub fn create_deployment_proposal(
        &self,
        request: DeploymentRequest,
    ) -> Result<BuiltProposal, BuilderError> {
        let mut code = decode_bytecode(&request.bytecode)?;

        if !request.constructor_args.is_empty() {
            code.extend(encode_constructor_args(&request.constructor_args)?);
        }

        let proposal = TransactionProposal {
            to: ZERO_ADDRESS.to_string(),
            value: request.value.unwrap_or_else(|| "0".to_string()),
            data: hex::encode_prefixed(&code),
            operation: OperationType::Call.into(),
            gas: self.default_gas_settings.clone(),
        };

        let mut extra = request.metadata;
        extra.remove("timestamp");
        extra.remove("contractName");
        let metadata = ProposalMetadata {
            contract_name: Some(request.contract_name),
            timestamp: Some(now_timestamp()),
            extra,
        };

        debug!(
            target: "proposer::builder",
            contract = ?metadata.contract_name,
            args = request.constructor_args.len(),
            "built deployment proposal ({} bytes of init code)",
            code.len()
        );

        Ok(BuiltProposal { proposal, metadata })
    }

    /// Builds a call to the proxy's upgrade function with the new implementation as
    /// its first argument.
    pub fn create_upgrade_proposal(
        &self,
        request: UpgradeRequest,
    ) -> Result<TransactionProposal, BuilderError> {
        let proxy = parse_address(&request.proxy_address)
            .map_err(|_| BuilderError::InvalidProxyAddress(request.proxy_address.clone()))?;
        let implementation = parse_address(&request.new_implementation).map_err(|_| {
            BuilderError::InvalidImplementationAddress(request.new_implementation.clone())
        })?;

        let mut args = Vec::with_capacity(request.upgrade_args.len() + 1);
        args.push(AbiArg::Inferred(to_checksum(&implementation).into()));
        args.extend(request.upgrade_args);

        let calldata = encode_call(&request.function_selector, &args)?;

        debug!(
            target: "proposer::builder",
            proxy = %proxy,
            implementation = %implementation,
            "built upgrade proposal via {}",
            request.function_selector
        );

        Ok(TransactionProposal {
            to: to_checksum(&proxy),
            value: "0".to_string(),
            data: hex::encode_prefixed(calldata),
            operation: OperationType::Call.into(),
            gas: self.default_gas_settings.clone(),
        })
    }

    /// Aggregates transactions in the given order.
    pub fn create_batch_proposal(
        &self,
        transactions: Vec<TransactionProposal>,
        metadata: ProposalMetadata,
    ) -> BatchProposal {
        BatchProposal { transactions, metadata }
    }

    /// Predicts the CREATE2 address of `bytecode` deployed by the Safe with `salt`.
    ///
    /// `keccak256(0xff ++ safe ++ salt ++ keccak256(bytecode))[12..]`
    pub fn calculate_deployment_address(
        &self,
        bytecode: &str,
        salt: B256,
    ) -> Result<Address, BuilderError> {
        let code = decode_bytecode(bytecode)?;
        Ok(self.safe_address.create2_from_code(salt.0, code))
    }

    /// Structural sanity check of a single transaction. Never fails; malformed input
    /// is reported as `false`.
    pub fn validate_proposal(&self, proposal: &TransactionProposal) -> bool {
        let to_ok = is_zero_address(&proposal.to) || is_address(&proposal.to);
        let value_ok = is_decimal_amount(&proposal.value);
        let operation_ok = OperationType::try_from(proposal.operation).is_ok();
        let data_ok = proposal.data.starts_with("0x");

        to_ok && value_ok && operation_ok && data_ok
    }

    /// A batch is valid if it is non-empty and every member is valid.
    pub fn validate_batch(&self, batch: &BatchProposal) -> bool {
        !batch.transactions.is_empty()
            && batch.transactions.iter().all(|tx| self.validate_proposal(tx))
    }

    /// Wraps `proposal` in the envelope persisted for signers.
    pub fn envelope(
        &self,
        proposal: Proposal,
        metadata: ProposalMetadata,
    ) -> Result<SerializedProposal, BuilderError> {
        let validation_hash = proposal.validation_hash()?;

        Ok(SerializedProposal {
            proposal,
            metadata,
            safe_address: to_checksum(&self.safe_address),
            chain_id: self.chain_id,
            validation_hash,
            timestamp: now_timestamp(),
        })
    }

    pub fn serialize_proposal(
        &self,
        proposal: impl Into<Proposal>,
        metadata: ProposalMetadata,
    ) -> Result<String, BuilderError> {
        let envelope = self.envelope(proposal.into(), metadata)?;
        Ok(serde_json::to_string_pretty(&envelope)?)
    }
}

fn decode_bytecode(bytecode: &str) -> Result<Vec<u8>, BuilderError> {
    hex::decode(bytecode.trim()).map_err(|e| BuilderError::InvalidBytecode(e.to_string()))
}

// the radix parser skips `_` and reads "" as zero, so digits are checked first;
// values above 2^256 - 1 are rejected by the parse
fn is_decimal_amount(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && U256::from_str_radix(value, 10).is_ok()
}

/// Current UTC time in RFC 3339 with millisecond precision, as stamped on proposals.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    const SAFE: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const PROXY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const IMPL: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
    const BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";

    fn builder() -> ProposalBuilder {
        ProposalBuilder::new(BuilderConfig {
            safe_address: SAFE.to_string(),
            chain_id: 11155111,
            default_gas_settings: None,
        })
        .unwrap()
    }

    fn deployment(args: Vec<AbiArg>) -> DeploymentRequest {
        DeploymentRequest {
            contract_name: "Vault".to_string(),
            bytecode: BYTECODE.to_string(),
            constructor_args: args,
            ..Default::default()
        }
    }

    fn tx(to: &str, value: &str, data: &str, operation: u8) -> TransactionProposal {
        TransactionProposal {
            to: to.to_string(),
            value: value.to_string(),
            data: data.to_string(),
            operation,
            gas: GasSettings::default(),
        }
    }

    #[test]
    fn construction_fails_fast() {
        let err = ProposalBuilder::new(BuilderConfig {
            safe_address: "0x1234".to_string(),
            chain_id: 1,
            default_gas_settings: None,
        })
        .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidSafeAddress(_)));

        let err = ProposalBuilder::new(BuilderConfig {
            safe_address: SAFE.to_string(),
            chain_id: 0,
            default_gas_settings: None,
        })
        .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidChainId(0)));
    }

    #[test]
    fn deployment_without_args_keeps_bytecode() {
        let built = builder().create_deployment_proposal(deployment(vec![])).unwrap();

        assert_eq!(built.proposal.to, ZERO_ADDRESS);
        assert_eq!(built.proposal.value, "0");
        assert_eq!(built.proposal.data, BYTECODE);
        assert_eq!(built.proposal.operation, 0);
        assert_eq!(built.metadata.contract_name.as_deref(), Some("Vault"));
        assert!(built.metadata.timestamp.is_some());
    }

    #[test]
    fn deployment_appends_encoded_args() {
        let built = builder().create_deployment_proposal(deployment(vec![json!(7).into()])).unwrap();

        assert_eq!(built.proposal.data, format!("{BYTECODE}{:0>64}", "7"));
    }

    #[test]
    fn deployment_merges_gas_defaults_and_metadata() {
        let builder = ProposalBuilder::new(BuilderConfig {
            safe_address: SAFE.to_string(),
            chain_id: 1,
            default_gas_settings: Some(GasSettings {
                gas_limit: Some(json!("3000000")),
                nonce: Some(json!(4)),
                ..Default::default()
            }),
        })
        .unwrap();

        let mut request = deployment(vec![]);
        request.value = Some("5".to_string());
        request.metadata.insert("commit".to_string(), json!("abc123"));
        request.metadata.insert("contractName".to_string(), json!("Spoofed"));

        let built = builder.create_deployment_proposal(request).unwrap();
        assert_eq!(built.proposal.value, "5");
        assert_eq!(built.proposal.gas.gas_limit, Some(json!("3000000")));
        assert_eq!(built.proposal.gas.nonce, Some(json!(4)));
        assert_eq!(built.metadata.contract_name.as_deref(), Some("Vault"));
        assert_eq!(built.metadata.extra.get("commit"), Some(&json!("abc123")));
        assert!(!built.metadata.extra.contains_key("contractName"));
    }

    #[test]
    fn deployment_rejects_non_hex_bytecode() {
        let mut request = deployment(vec![]);
        request.bytecode = "0xnothex".to_string();

        let err = builder().create_deployment_proposal(request).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidBytecode(_)));
    }

    #[test]
    fn upgrade_targets_proxy() {
        let proposal = builder()
            .create_upgrade_proposal(UpgradeRequest {
                proxy_address: PROXY.to_string(),
                new_implementation: IMPL.to_string(),
                function_selector: "upgradeToAndCall(address,bytes)".to_string(),
                upgrade_args: vec![json!("0x").into()],
            })
            .unwrap();

        assert_eq!(proposal.to, PROXY);
        assert_eq!(proposal.value, "0");
        assert_eq!(proposal.operation, 0);
        assert!(proposal.data.starts_with("0x4f1ef286"));
        assert!(proposal.data.contains("e7f1725e7734ce288f8367e1bb143e90bb3f0512"));
    }

    #[test]
    fn upgrade_errors_name_the_bad_field() {
        let request = |proxy: &str, implementation: &str| UpgradeRequest {
            proxy_address: proxy.to_string(),
            new_implementation: implementation.to_string(),
            function_selector: "upgradeTo(address)".to_string(),
            upgrade_args: vec![],
        };

        let err = builder().create_upgrade_proposal(request("0xbad", IMPL)).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidProxyAddress(_)));
        assert!(err.to_string().contains("proxy"));

        let err = builder().create_upgrade_proposal(request(PROXY, "0xbad")).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidImplementationAddress(_)));
        assert!(err.to_string().contains("implementation"));
    }

    #[test]
    fn batch_preserves_order() {
        let first = tx(PROXY, "0", "0x01", 0);
        let second = tx(IMPL, "0", "0x02", 0);

        let batch = builder()
            .create_batch_proposal(vec![first.clone(), second.clone()], ProposalMetadata::default());
        assert_eq!(batch.transactions, vec![first, second]);
    }

    #[test]
    fn create2_matches_eip1014_vectors() {
        let zero = ProposalBuilder::new(BuilderConfig {
            safe_address: ZERO_ADDRESS.to_string(),
            chain_id: 1,
            default_gas_settings: None,
        })
        .unwrap();
        let address = zero.calculate_deployment_address("0x00", B256::ZERO).unwrap();
        assert_eq!(
            to_checksum(&address).to_lowercase(),
            "0x4d1a2e2bb4f88f0250f26ffff098b0b30b26bf38"
        );

        let deadbeef = ProposalBuilder::new(BuilderConfig {
            safe_address: "0xdeadbeef00000000000000000000000000000000".to_string(),
            chain_id: 1,
            default_gas_settings: None,
        })
        .unwrap();
        let address = deadbeef.calculate_deployment_address("0x00", B256::ZERO).unwrap();
        assert_eq!(
            to_checksum(&address).to_lowercase(),
            "0xb928f69bb1d91cd65274e3c79d8986362984fda3"
        );
    }

    #[test]
    fn create2_is_deterministic_and_input_sensitive() {
        let builder = builder();
        let salt = B256::with_last_byte(1);

        let first = builder.calculate_deployment_address(BYTECODE, salt).unwrap();
        let again = builder.calculate_deployment_address(BYTECODE, salt).unwrap();
        assert_eq!(first, again);

        let other_code = builder.calculate_deployment_address("0x6080", salt).unwrap();
        assert_ne!(first, other_code);

        let other_salt =
            builder.calculate_deployment_address(BYTECODE, B256::with_last_byte(2)).unwrap();
        assert_ne!(first, other_salt);
    }

    #[test]
    fn validate_proposal_structure() {
        let builder = builder();

        let deployment = builder.create_deployment_proposal(deployment(vec![])).unwrap();
        assert!(builder.validate_proposal(&deployment.proposal));

        let upgrade = builder
            .create_upgrade_proposal(UpgradeRequest {
                proxy_address: PROXY.to_string(),
                new_implementation: IMPL.to_string(),
                function_selector: "upgradeTo(address)".to_string(),
                upgrade_args: vec![],
            })
            .unwrap();
        assert!(builder.validate_proposal(&upgrade));

        assert!(!builder.validate_proposal(&tx("0x1234", "0", "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "-1", "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "1.5", "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "", "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "0", "0x", 2)));
        assert!(!builder.validate_proposal(&tx(PROXY, "0", "6080", 0)));
        assert!(builder.validate_proposal(&tx(PROXY, "0", "0x", 1)));
    }

    #[test]
    fn value_must_be_plain_uint256_decimal() {
        let builder = builder();
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let overflow =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";

        assert!(builder.validate_proposal(&tx(PROXY, max, "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, overflow, "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "1_000", "0x", 0)));
        assert!(!builder.validate_proposal(&tx(PROXY, "0x10", "0x", 0)));
    }

    #[test]
    fn timestamps_are_rfc3339_millis_utc() {
        let stamp = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn validate_batch_requires_members() {
        let builder = builder();
        let good = tx(PROXY, "0", "0x", 0);
        let bad = tx(PROXY, "0", "0x", 9);

        assert!(builder.validate_batch(&BatchProposal {
            transactions: vec![good.clone()],
            metadata: ProposalMetadata::default(),
        }));
        assert!(!builder.validate_batch(&BatchProposal {
            transactions: vec![good, bad],
            metadata: ProposalMetadata::default(),
        }));
        assert!(!builder.validate_batch(&BatchProposal {
            transactions: vec![],
            metadata: ProposalMetadata::default(),
        }));
    }

    #[test]
    fn serialization_round_trip() {
        let builder = builder();
        let built = builder.create_deployment_proposal(deployment(vec![json!("hi").into()])).unwrap();

        let text = builder.serialize_proposal(built.proposal.clone(), built.metadata.clone()).unwrap();
        let envelope: SerializedProposal = serde_json::from_str(&text).unwrap();

        assert_eq!(envelope.proposal, Proposal::Single(built.proposal.clone()));
        assert_eq!(envelope.metadata, built.metadata);
        assert_eq!(envelope.safe_address, SAFE);
        assert_eq!(envelope.chain_id, 11155111);
        assert_eq!(
            envelope.validation_hash,
            Proposal::Single(built.proposal).validation_hash().unwrap()
        );
        assert!(envelope.verify_hash().unwrap());

        let raw: Value = serde_json::from_str(&text).unwrap();
        for key in ["proposal", "metadata", "safeAddress", "chainId", "validationHash", "timestamp"] {
            assert!(raw.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn hash_ignores_envelope_and_detects_tampering() {
        let builder = builder();
        let proposal = tx(PROXY, "0", "0x01", 0);

        let first = builder.envelope(proposal.clone().into(), ProposalMetadata::default()).unwrap();
        let mut metadata = ProposalMetadata::default();
        metadata.extra.insert("note".to_string(), json!("different"));
        let second = builder.envelope(proposal.into(), metadata).unwrap();
        assert_eq!(first.validation_hash, second.validation_hash);

        let mut tampered = first;
        if let Proposal::Single(tx) = &mut tampered.proposal {
            tx.value = "1".to_string();
        }
        assert!(!tampered.verify_hash().unwrap());
    }

    #[test]
    fn batch_serializes_as_transactions_list() {
        let builder = builder();
        let batch = builder.create_batch_proposal(
            vec![tx(PROXY, "0", "0x01", 0), tx(IMPL, "0", "0x02", 0)],
            ProposalMetadata::default(),
        );

        let text = builder.serialize_proposal(batch.clone(), ProposalMetadata::default()).unwrap();
        let envelope: SerializedProposal = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope.proposal, Proposal::Batch(batch));
    }
}
