// crates/armcheck-remote/tests/common/mod.rs
// ============================================================================
// Module: Remote Test Helpers
// Description: Scripted resource group client and plan builders.
// Purpose: Drive the smoke runner without a cloud account.
// ============================================================================

//! Shared helpers for remote integration tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

use std::path::PathBuf;
use std::sync::Mutex;

use armcheck_remote::DeploymentMode;
use armcheck_remote::DeploymentValidation;
use armcheck_remote::FailurePolicy;
use armcheck_remote::RemoteError;
use armcheck_remote::ResourceGroupClient;
use armcheck_remote::ResourceGroupName;
use armcheck_remote::SmokePlan;
use armcheck_remote::ValidationVerdict;
use async_trait::async_trait;

/// Client returning scripted results and recording each call.
pub struct ScriptedClient {
    /// Result returned by `create_group`.
    pub create: Result<(), RemoteError>,
    /// Result returned by `validate_deployment`.
    pub validate: Result<ValidationVerdict, RemoteError>,
    /// Result returned by `delete_group`.
    pub delete: Result<(), RemoteError>,
    /// Call log in arrival order.
    pub calls: Mutex<Vec<String>>,
    /// Validation requests received.
    pub requests: Mutex<Vec<DeploymentValidation>>,
}

impl ScriptedClient {
    /// Client whose three calls all succeed.
    pub fn healthy() -> Self {
        Self {
            create: Ok(()),
            validate: Ok(ValidationVerdict::Accepted {
                provisioning_state: Some("Succeeded".to_string()),
            }),
            delete: Ok(()),
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the call log.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceGroupClient for ScriptedClient {
    async fn create_group(
        &self,
        name: &ResourceGroupName,
        location: &str,
    ) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(format!("create {name} {location}"));
        self.create.clone()
    }

    async fn validate_deployment(
        &self,
        request: &DeploymentValidation,
    ) -> Result<ValidationVerdict, RemoteError> {
        self.calls.lock().unwrap().push(format!("validate {}", request.resource_group));
        self.requests.lock().unwrap().push(request.clone());
        self.validate.clone()
    }

    async fn delete_group(&self, name: &ResourceGroupName) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(format!("delete {name}"));
        self.delete.clone()
    }
}

/// Plan against a fixed group name in `eastus`.
pub fn plan(policy: FailurePolicy) -> SmokePlan {
    SmokePlan {
        resource_group: ResourceGroupName::new("abcde-spec-group").unwrap(),
        location: "eastus".to_string(),
        template_path: PathBuf::from("azuredeploy.json"),
        parameters_path: PathBuf::from("azuredeploy.parameters.json"),
        mode: DeploymentMode::Complete,
        policy,
    }
}

/// Command failure with the given stderr.
pub fn command_failed(stderr: &str) -> RemoteError {
    RemoteError::CommandFailed {
        program: "az".to_string(),
        status: "exit status: 1".to_string(),
        stderr: stderr.to_string(),
    }
}
