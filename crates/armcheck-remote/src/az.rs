// crates/armcheck-remote/src/az.rs
// ============================================================================
// Module: Azure CLI Client
// Description: Resource group client backed by the `az` command-line tool.
// Purpose: Run create/validate/delete as child processes and parse results.
// Dependencies: async-trait, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`AzCliClient`] runs one child process per lifecycle call. Each process is
//! bounded by a timeout (the child is killed on expiry) and by a per-stream
//! output cap; output past the cap is drained and discarded so the child
//! never blocks on a full pipe.
//!
//! Invocations:
//! - `az group create --name N --location L --query name --output tsv`
//! - `az deployment group validate --resource-group N --template-file T
//!   --parameters @P --mode M --output json`
//! - `az group delete --name N --yes --no-wait`
//!
//! Prior authentication (`az login`) is assumed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::client::DeploymentValidation;
use crate::client::RemoteError;
use crate::client::ResourceGroupClient;
use crate::client::ValidationVerdict;
use crate::group::ResourceGroupName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default program name.
pub const DEFAULT_PROGRAM: &str = "az";
/// Default per-command timeout in milliseconds.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 600_000;
/// Default cap on captured bytes per output stream.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;
/// Maximum characters of stderr carried into error messages.
const STDERR_EXCERPT_CHARS: usize = 1024;
/// Read buffer size for child output.
const READ_CHUNK_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Settings for [`AzCliClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzCliConfig {
    /// Program to execute (name on `PATH` or absolute path).
    pub program: String,
    /// Per-command timeout.
    pub timeout: Duration,
    /// Cap on captured bytes per output stream.
    pub max_output_bytes: usize,
}

impl Default for AzCliConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout: Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Resource group client that shells out to `az`.
pub struct AzCliClient {
    /// Client settings.
    config: AzCliConfig,
}

impl AzCliClient {
    /// Creates a client with the given settings.
    #[must_use]
    pub const fn new(config: AzCliConfig) -> Self {
        Self {
            config,
        }
    }

    /// Runs the program with `args`, capturing bounded output.
    async fn run(&self, args: Vec<OsString>) -> Result<CommandOutput, RemoteError> {
        let program = self.config.program.as_str();
        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| launch_error(program, &err.to_string()))?;
        let stdout =
            child.stdout.take().ok_or_else(|| launch_error(program, "stdout unavailable"))?;
        let stderr =
            child.stderr.take().ok_or_else(|| launch_error(program, "stderr unavailable"))?;
        let max_bytes = self.config.max_output_bytes;

        let collected = tokio::time::timeout(self.config.timeout, async {
            tokio::try_join!(
                read_limited(stdout, max_bytes),
                read_limited(stderr, max_bytes),
                child.wait()
            )
        })
        .await;

        match collected {
            Err(_) => {
                let _ = child.start_kill();
                Err(RemoteError::Timeout {
                    program: program.to_string(),
                    timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
            Ok(Err(err)) => Err(launch_error(program, &format!("io error: {err}"))),
            Ok(Ok((stdout, stderr, status))) => Ok(CommandOutput {
                success: status.success(),
                status: status.to_string(),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }),
        }
    }
}

#[async_trait]
impl ResourceGroupClient for AzCliClient {
    async fn create_group(
        &self,
        name: &ResourceGroupName,
        location: &str,
    ) -> Result<(), RemoteError> {
        let output = self.run(create_group_args(name, location)).await?;
        parse_create_output(&self.config.program, name, &output)
    }

    async fn validate_deployment(
        &self,
        request: &DeploymentValidation,
    ) -> Result<ValidationVerdict, RemoteError> {
        let output = self.run(validate_args(request)).await?;
        parse_validate_output(&self.config.program, &output)
    }

    async fn delete_group(&self, name: &ResourceGroupName) -> Result<(), RemoteError> {
        let output = self.run(delete_group_args(name)).await?;
        parse_delete_output(&self.config.program, &output)
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Captured result of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandOutput {
    /// Whether the process exited with status zero.
    pub(crate) success: bool,
    /// Exit status description.
    pub(crate) status: String,
    /// Captured stdout (lossy UTF-8).
    pub(crate) stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub(crate) stderr: String,
}

/// Arguments for `az group create`.
pub(crate) fn create_group_args(name: &ResourceGroupName, location: &str) -> Vec<OsString> {
    [
        "group",
        "create",
        "--name",
        name.as_str(),
        "--location",
        location,
        "--query",
        "name",
        "--output",
        "tsv",
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

/// Arguments for `az deployment group validate`.
pub(crate) fn validate_args(request: &DeploymentValidation) -> Vec<OsString> {
    let mut parameters = OsString::from("@");
    parameters.push(&request.parameters_path);
    vec![
        OsString::from("deployment"),
        OsString::from("group"),
        OsString::from("validate"),
        OsString::from("--resource-group"),
        OsString::from(request.resource_group.as_str()),
        OsString::from("--template-file"),
        request.template_path.clone().into_os_string(),
        OsString::from("--parameters"),
        parameters,
        OsString::from("--mode"),
        OsString::from(request.mode.as_cli_arg()),
        OsString::from("--output"),
        OsString::from("json"),
    ]
}

/// Arguments for `az group delete`.
pub(crate) fn delete_group_args(name: &ResourceGroupName) -> Vec<OsString> {
    ["group", "delete", "--name", name.as_str(), "--yes", "--no-wait"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

// ============================================================================
// SECTION: Output Parsing
// ============================================================================

/// Group creation succeeds when the tool exits cleanly and echoes the name.
pub(crate) fn parse_create_output(
    program: &str,
    name: &ResourceGroupName,
    output: &CommandOutput,
) -> Result<(), RemoteError> {
    if !output.success {
        return Err(command_failed(program, output));
    }
    let reported = output.stdout.trim();
    if reported.eq_ignore_ascii_case(name.as_str()) {
        Ok(())
    } else {
        Err(RemoteError::InvalidOutput {
            program: program.to_string(),
            message: format!("expected group name {name}, got '{reported}'"),
        })
    }
}

/// Classifies validation output into a verdict or a tooling failure.
pub(crate) fn parse_validate_output(
    program: &str,
    output: &CommandOutput,
) -> Result<ValidationVerdict, RemoteError> {
    if output.success {
        let value: Value =
            serde_json::from_str(output.stdout.trim()).map_err(|err| RemoteError::InvalidOutput {
                program: program.to_string(),
                message: format!("validation output is not json: {err}"),
            })?;
        if let Some(error) = value.get("error").filter(|error| !error.is_null()) {
            return Ok(rejection(error));
        }
        let provisioning_state = value
            .pointer("/properties/provisioningState")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        return Ok(ValidationVerdict::Accepted {
            provisioning_state,
        });
    }
    if let Some(error) = stderr_error(&output.stderr) {
        return Ok(rejection(&error));
    }
    Err(command_failed(program, output))
}

/// Deletion succeeds when the tool exits cleanly.
pub(crate) fn parse_delete_output(program: &str, output: &CommandOutput) -> Result<(), RemoteError> {
    if output.success { Ok(()) } else { Err(command_failed(program, output)) }
}

/// Builds a rejection from a provider error object, folding in detail messages.
fn rejection(error: &Value) -> ValidationVerdict {
    let code = error.get("code").and_then(Value::as_str).unwrap_or("UnknownError").to_string();
    let message = error.get("message").and_then(Value::as_str).unwrap_or_default();
    let details: Vec<&str> = error
        .get("details")
        .and_then(Value::as_array)
        .map(|details| {
            details.iter().filter_map(|detail| detail.get("message").and_then(Value::as_str)).collect()
        })
        .unwrap_or_default();
    let message = match (message.is_empty(), details.is_empty()) {
        (_, true) => message.to_string(),
        (true, false) => details.join("; "),
        (false, false) => format!("{message} ({})", details.join("; ")),
    };
    ValidationVerdict::Rejected {
        code,
        message,
    }
}

/// Extracts a provider error object printed to stderr (`ERROR: {...}`).
///
/// Warnings printed ahead of the error may contain braces, so every `{` is
/// tried in order until one starts an error object carrying a `code`.
fn stderr_error(stderr: &str) -> Option<Value> {
    stderr.match_indices('{').find_map(|(start, _)| error_object_at(&stderr[start..]))
}

/// Parses a leading JSON value and unwraps an `error` wrapper when present.
fn error_object_at(text: &str) -> Option<Value> {
    let value = serde_json::Deserializer::from_str(text).into_iter::<Value>().next()?.ok()?;
    let error = match value.get("error") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => value,
    };
    if error.get("code").and_then(Value::as_str).is_some() { Some(error) } else { None }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a stream to the end, keeping at most `max_bytes`.
async fn read_limited<R: AsyncRead + Unpin>(
    mut reader: R,
    max_bytes: usize,
) -> std::io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK_BYTES];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return Ok(kept);
        }
        let room = max_bytes.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..read.min(room)]);
    }
}

/// Builds a launch error.
fn launch_error(program: &str, message: &str) -> RemoteError {
    RemoteError::Launch {
        program: program.to_string(),
        message: message.to_string(),
    }
}

/// Builds a command failure carrying a stderr excerpt.
fn command_failed(program: &str, output: &CommandOutput) -> RemoteError {
    RemoteError::CommandFailed {
        program: program.to_string(),
        status: output.status.clone(),
        stderr: excerpt(&output.stderr),
    }
}

/// Keeps the trailing part of long stderr output.
fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count <= STDERR_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - STDERR_EXCERPT_CHARS).collect()
}
