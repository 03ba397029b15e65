use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::{hex, B256};
use proposer_primitives::{is_address, parse_address};
use serde_json::Value;

use crate::{consts::FALLBACK_ARG_TYPE, error::BuilderError, transaction_data::AbiArg};

/// Guesses an ABI type from the JSON kind of `value`.
///
/// Address-shaped strings become `address`, other strings `string`, numbers `uint256`
/// and booleans `bool`. Everything else falls back to `bytes32`, which only encodes if
/// the caller pins a type explicitly.
pub fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::String(s) if is_address(s) => "address",
        Value::String(_) => "string",
        Value::Number(_) => "uint256",
        Value::Bool(_) => "bool",
        _ => FALLBACK_ARG_TYPE,
    }
}

/// Resolves the ABI type of an argument, preferring an explicit annotation.
pub fn arg_type(arg: &AbiArg) -> &str {
    match arg {
        AbiArg::Typed { ty, .. } => ty.as_str(),
        AbiArg::Inferred(value) => infer_type(value),
    }
}

/// ABI-encodes constructor arguments as a parameter tuple, without a selector.
pub fn encode_constructor_args(args: &[AbiArg]) -> Result<Vec<u8>, BuilderError> {
    let values = args
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            let ty = DynSolType::parse(arg_type(arg))
                .map_err(|e| BuilderError::InvalidArgument { index, reason: e.to_string() })?;
            coerce(&ty, arg.value())
                .map_err(|reason| BuilderError::InvalidArgument { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DynSolValue::Tuple(values).abi_encode_params())
}

/// Encodes a call to `signature` with `args`, typed by the signature's parameters.
///
/// Annotations on the arguments are ignored; the declared parameter types win.
pub fn encode_call(signature: &str, args: &[AbiArg]) -> Result<Vec<u8>, BuilderError> {
    let function = Function::parse(signature).map_err(|e| {
        BuilderError::InvalidFunctionSignature {
            signature: signature.to_string(),
            reason: e.to_string(),
        }
    })?;

    if function.inputs.len() != args.len() {
        return Err(BuilderError::InvalidArgument {
            index: args.len().min(function.inputs.len()),
            reason: format!(
                "{} takes {} arguments but {} were supplied",
                function.signature(),
                function.inputs.len(),
                args.len()
            ),
        });
    }

    let values = function
        .inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| BuilderError::InvalidArgument { index, reason: e.to_string() })?;
            coerce(&ty, arg.value())
                .map_err(|reason| BuilderError::InvalidArgument { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    function.abi_encode_input(&values).map_err(|e| BuilderError::Encoding(e.to_string()))
}

/// Converts a JSON value into a value of the given ABI type.
fn coerce(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Address, Value::String(s)) => {
            parse_address(s).map(DynSolValue::Address).map_err(|e| e.to_string())
        }
        (DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (DynSolType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::Bytes, Value::String(s)) => hex::decode(s)
            .map(DynSolValue::Bytes)
            .map_err(|e| format!("{s:?} is not hex: {e}")),
        (DynSolType::FixedBytes(size), Value::String(s)) => {
            let bytes = hex::decode(s).map_err(|e| format!("{s:?} is not hex: {e}"))?;
            if bytes.len() != *size {
                return Err(format!("expected {size} bytes, got {}", bytes.len()));
            }
            Ok(DynSolValue::FixedBytes(B256::right_padding_from(&bytes), *size))
        }
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) if items.len() == *len => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::FixedArray),
        (DynSolType::Tuple(types), Value::Array(items)) if items.len() == types.len() => types
            .iter()
            .zip(items)
            .map(|(ty, item)| coerce(ty, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Tuple),
        // numeric strings and literals go through the range-checked parser
        (DynSolType::Uint(_) | DynSolType::Int(_), Value::String(s)) => {
            ty.coerce_str(s).map_err(|e| e.to_string())
        }
        // integers past u64/i64 arrive as f64 and have already lost digits
        (DynSolType::Uint(_) | DynSolType::Int(_), Value::Number(n)) => {
            let literal = match (n.as_u64(), n.as_i64()) {
                (Some(u), _) => u.to_string(),
                (None, Some(i)) => i.to_string(),
                (None, None) => {
                    return Err(format!(
                        "{n} exceeds JSON integer precision; pass it as a decimal string"
                    ))
                }
            };
            ty.coerce_str(&literal).map_err(|e| e.to_string())
        }
        (ty, other) => Err(format!("cannot encode {other} as {}", ty.sol_type_name())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    const IMPL: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn word(hex_tail: &str) -> String {
        format!("{hex_tail:0>64}")
    }

    #[test]
    fn inference_precedence() {
        assert_eq!(infer_type(&json!(IMPL)), "address");
        assert_eq!(infer_type(&json!("hello")), "string");
        assert_eq!(infer_type(&json!(42)), "uint256");
        assert_eq!(infer_type(&json!(false)), "bool");
        assert_eq!(infer_type(&json!(null)), "bytes32");
        assert_eq!(infer_type(&json!([1, 2])), "bytes32");
    }

    #[test]
    fn encodes_static_constructor_args() {
        let args = vec![json!(42).into(), json!(true).into(), json!(IMPL).into()];
        let encoded = hex::encode(encode_constructor_args(&args).unwrap());

        let expected = [
            word("2a"),
            word("1"),
            word("d8da6bf26964af9d7eed9e03e53415d37aa96045"),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encodes_dynamic_string_arg() {
        let encoded = hex::encode(encode_constructor_args(&[json!("hello").into()]).unwrap());

        let expected = [word("20"), word("5"), format!("{:0<64}", "68656c6c6f")].concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn annotation_overrides_inference() {
        // a numeric string would otherwise be encoded as text
        let inferred = encode_constructor_args(&[json!("1000").into()]).unwrap();
        let pinned = encode_constructor_args(&[AbiArg::typed("uint256", "1000")]).unwrap();

        assert_eq!(inferred.len(), 96);
        assert_eq!(hex::encode(pinned), word("3e8"));
    }

    #[test]
    fn annotated_arrays_and_small_ints() {
        let args = vec![AbiArg::typed("uint8", 255), AbiArg::typed("address[]", json!([IMPL]))];
        let encoded = hex::encode(encode_constructor_args(&args).unwrap());

        let expected = [
            word("ff"),
            word("40"),
            word("1"),
            word("d8da6bf26964af9d7eed9e03e53415d37aa96045"),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn rejects_out_of_range_and_fallback_values() {
        let err = encode_constructor_args(&[AbiArg::typed("uint8", 256)]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { index: 0, .. }));

        let err = encode_constructor_args(&[json!(1).into(), json!(null).into()]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { index: 1, .. }));

        let err = encode_constructor_args(&[json!(-1).into()]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn large_integers_need_decimal_strings() {
        let literal: Value = serde_json::from_str("123456789012345678901").unwrap();
        let err = encode_constructor_args(&[literal.into()]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { index: 0, .. }));
        assert!(err.to_string().contains("decimal string"));

        let fractional: Value = serde_json::from_str("1.5").unwrap();
        assert!(encode_constructor_args(&[fractional.into()]).is_err());

        let exact =
            encode_constructor_args(&[AbiArg::typed("uint256", "123456789012345678901")]).unwrap();
        assert_eq!(hex::encode(exact), word("6b14e9f812f366c35"));
    }

    #[test]
    fn large_integers_rejected_in_calls() {
        let literal: Value = serde_json::from_str("123456789012345678901").unwrap();
        let err = encode_call("mint(uint256)", &[literal.into()]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn encodes_upgrade_to_and_call() {
        let encoded = hex::encode(
            encode_call("upgradeToAndCall(address,bytes)", &[json!(IMPL).into(), json!("0x").into()])
                .unwrap(),
        );

        let expected = [
            "4f1ef286".to_string(),
            word("d8da6bf26964af9d7eed9e03e53415d37aa96045"),
            word("40"),
            word("0"),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn call_arity_and_signature_errors() {
        let err = encode_call("upgradeTo(address)", &[]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { .. }));

        let err = encode_call("not a signature", &[]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidFunctionSignature { .. }));
    }
}
