// crates/armcheck-remote/src/client.rs
// ============================================================================
// Module: Resource Group Client
// Description: Lifecycle interface for disposable cloud resource groups.
// Purpose: Decouple the smoke runner from the concrete cloud tooling.
// Dependencies: async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! [`ResourceGroupClient`] exposes the three calls the smoke test needs.
//! Implementations return structured results: a validation the provider
//! rejects is a [`ValidationVerdict::Rejected`], not an error, while
//! [`RemoteError`] is reserved for failures of the tooling itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::group::ResourceGroupName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Deployment mode submitted with the validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Resources absent from the template are deleted on deploy.
    #[default]
    Complete,
    /// Resources absent from the template are left untouched.
    Incremental,
}

impl DeploymentMode {
    /// Returns the value expected by the `--mode` flag.
    #[must_use]
    pub const fn as_cli_arg(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Incremental => "Incremental",
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = String;

    /// Accepts both the config spelling (`complete`) and the flag spelling
    /// (`Complete`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "incremental" => Ok(Self::Incremental),
            other => Err(format!("unknown deployment mode: {other}")),
        }
    }
}

/// A request to validate a template deployment against a resource group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentValidation {
    /// Target resource group.
    pub resource_group: ResourceGroupName,
    /// Template file path.
    pub template_path: PathBuf,
    /// Parameters file path.
    pub parameters_path: PathBuf,
    /// Deployment mode.
    pub mode: DeploymentMode,
}

/// Provider verdict on a deployment validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ValidationVerdict {
    /// The provider accepted the template.
    Accepted {
        /// Reported provisioning state, when present.
        provisioning_state: Option<String>,
    },
    /// The provider rejected the template.
    Rejected {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures of the external tooling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The process could not be started.
    #[error("failed to launch {program}: {message}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Launch error text.
        message: String,
    },
    /// The process did not finish in time and was killed.
    #[error("{program} timed out after {timeout_ms} ms")]
    Timeout {
        /// Program that timed out.
        program: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },
    /// The process exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        /// Program that failed.
        program: String,
        /// Exit status description.
        status: String,
        /// Trimmed stderr excerpt.
        stderr: String,
    },
    /// The process succeeded but its output was not understood.
    #[error("unexpected output from {program}: {message}")]
    InvalidOutput {
        /// Program that produced the output.
        program: String,
        /// Description of the problem.
        message: String,
    },
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Lifecycle operations on a disposable resource group.
#[async_trait]
pub trait ResourceGroupClient: Send + Sync {
    /// Creates `name` in `location`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the group could not be created.
    async fn create_group(
        &self,
        name: &ResourceGroupName,
        location: &str,
    ) -> Result<(), RemoteError>;

    /// Submits a deployment for provider-side validation.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when no verdict could be obtained.
    async fn validate_deployment(
        &self,
        request: &DeploymentValidation,
    ) -> Result<ValidationVerdict, RemoteError>;

    /// Requests deletion of `name` without waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the request could not be submitted.
    async fn delete_group(&self, name: &ResourceGroupName) -> Result<(), RemoteError>;
}
