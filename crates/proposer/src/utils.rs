use std::path::Path;

use colored::Colorize;
use eyre::WrapErr;
use proposer_primitives::fs::{read_file, write_atomic};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Loads a config file, as YAML for `.yaml`/`.yml` and as JSON otherwise.
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> eyre::Result<T> {
    let path = path.as_ref();
    let text = read_file(path)?;
    debug!(target: "proposer::cli", "loading config {:?}", path);

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&text).wrap_err_with(|| format!("Failed to parse YAML {path:?}"))
    } else {
        serde_json::from_str(&text).wrap_err_with(|| format!("Failed to parse JSON {path:?}"))
    }
}

/// Reads the creation bytecode out of a compiled artifact.
///
/// Accepts both `"bytecode": "0x..."` and `"bytecode": { "object": "0x..." }` layouts.
pub fn load_artifact_bytecode<P: AsRef<Path>>(path: P) -> eyre::Result<String> {
    let path = path.as_ref();
    let artifact: Value = load_config(path)?;

    let bytecode = match artifact.get("bytecode") {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Object(obj)) => obj.get("object").and_then(Value::as_str).map(String::from),
        _ => None,
    };

    bytecode.ok_or_else(|| eyre::eyre!("Artifact {path:?} has no bytecode"))
}

/// Writes a serialized proposal, replacing any previous file atomically.
pub fn write_proposal<P: AsRef<Path>>(path: P, contents: &str) -> eyre::Result<()> {
    write_atomic(path.as_ref(), contents.as_bytes())?;
    Ok(())
}

pub fn print_success_message(message: &str) {
    println!("{}", message.bright_green());
}

pub fn print_error_message(message: &str) {
    println!("{}", message.bright_red());
}

pub fn print_warning_message(message: &str) {
    println!("{}", message.bright_yellow());
}
