// crates/armcheck-remote/src/smoke.rs
// ============================================================================
// Module: Smoke Test Runner
// Description: Create, validate, and delete a disposable resource group.
// Purpose: Classify each remote step under an explicit failure policy.
// Dependencies: armcheck-core, serde
// ============================================================================

//! ## Overview
//! [`run_smoke_test`] performs the three lifecycle calls strictly in order and
//! always runs all of them: a failed create does not skip validation and
//! deletion always runs. Each step yields a [`StepReport`] and one
//! `smoke_step` audit event.
//!
//! Classification:
//! - create and validate failures are [`StepOutcome::Failed`] under
//!   [`FailurePolicy::Strict`] and [`StepOutcome::Tolerated`] under
//!   [`FailurePolicy::Lenient`].
//! - delete failures are always [`StepOutcome::Tolerated`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use armcheck_core::AuditSink;
use armcheck_core::StepAuditEvent;
use serde::Deserialize;
use serde::Serialize;

use crate::client::DeploymentMode;
use crate::client::DeploymentValidation;
use crate::client::ResourceGroupClient;
use crate::client::ValidationVerdict;
use crate::group::ResourceGroupName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How create and validate failures affect the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Create and validate failures fail the run.
    #[default]
    Strict,
    /// Create and validate failures are recorded as tolerated.
    Lenient,
}

impl FailurePolicy {
    /// Returns the policy label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Inputs for one smoke run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokePlan {
    /// Disposable resource group name.
    pub resource_group: ResourceGroupName,
    /// Provider region for the group.
    pub location: String,
    /// Template file submitted for validation.
    pub template_path: PathBuf,
    /// Parameters file submitted for validation.
    pub parameters_path: PathBuf,
    /// Deployment mode.
    pub mode: DeploymentMode,
    /// Failure policy.
    pub policy: FailurePolicy,
}

/// One lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokeStep {
    /// Resource group creation.
    CreateGroup,
    /// Deployment validation.
    ValidateDeployment,
    /// Resource group deletion.
    DeleteGroup,
}

impl SmokeStep {
    /// Returns the step label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateGroup => "create_group",
            Self::ValidateDeployment => "validate_deployment",
            Self::DeleteGroup => "delete_group",
        }
    }
}

/// Classified result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step succeeded.
    Passed {
        /// Optional detail (for example the provisioning state).
        detail: Option<String>,
    },
    /// The step failed and fails the run.
    Failed {
        /// Failure text.
        reason: String,
    },
    /// The step failed but the failure is tolerated.
    Tolerated {
        /// Failure text.
        reason: String,
    },
}

impl StepOutcome {
    /// Returns the status label used in audit events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed {
                ..
            } => "passed",
            Self::Failed {
                ..
            } => "failed",
            Self::Tolerated {
                ..
            } => "tolerated",
        }
    }

    /// Returns true unless the step failed the run.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Returns the detail or failure text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Passed {
                detail,
            } => detail.as_deref(),
            Self::Failed {
                reason,
            }
            | Self::Tolerated {
                reason,
            } => Some(reason),
        }
    }
}

/// Report entry for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step performed.
    pub step: SmokeStep,
    /// Classified outcome.
    pub outcome: StepOutcome,
}

/// Report for a full smoke run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmokeReport {
    /// Resource group used.
    pub resource_group: ResourceGroupName,
    /// Provider region.
    pub location: String,
    /// Failure policy in effect.
    pub policy: FailurePolicy,
    /// Step reports in execution order.
    pub steps: Vec<StepReport>,
}

impl SmokeReport {
    /// Returns true when no step failed the run.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.outcome.is_ok())
    }

    /// Returns the report for `step`, if it ran.
    #[must_use]
    pub fn step(&self, step: SmokeStep) -> Option<&StepReport> {
        self.steps.iter().find(|report| report.step == step)
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs create, validate, and delete against `client` in order.
pub async fn run_smoke_test(
    client: &dyn ResourceGroupClient,
    plan: &SmokePlan,
    audit: &dyn AuditSink,
) -> SmokeReport {
    let group = &plan.resource_group;
    let mut steps = Vec::with_capacity(3);

    let created = match client.create_group(group, &plan.location).await {
        Ok(()) => StepOutcome::Passed {
            detail: Some(format!("created in {}", plan.location)),
        },
        Err(err) => failure(plan.policy, err.to_string()),
    };
    steps.push(record(audit, group, SmokeStep::CreateGroup, created));

    let request = DeploymentValidation {
        resource_group: group.clone(),
        template_path: plan.template_path.clone(),
        parameters_path: plan.parameters_path.clone(),
        mode: plan.mode,
    };
    let validated = match client.validate_deployment(&request).await {
        Ok(ValidationVerdict::Accepted {
            provisioning_state,
        }) => StepOutcome::Passed {
            detail: provisioning_state,
        },
        Ok(ValidationVerdict::Rejected {
            code,
            message,
        }) => failure(plan.policy, format!("{code}: {message}")),
        Err(err) => failure(plan.policy, err.to_string()),
    };
    steps.push(record(audit, group, SmokeStep::ValidateDeployment, validated));

    let deleted = match client.delete_group(group).await {
        Ok(()) => StepOutcome::Passed {
            detail: Some("deletion requested".to_string()),
        },
        Err(err) => StepOutcome::Tolerated {
            reason: err.to_string(),
        },
    };
    steps.push(record(audit, group, SmokeStep::DeleteGroup, deleted));

    SmokeReport {
        resource_group: group.clone(),
        location: plan.location.clone(),
        policy: plan.policy,
        steps,
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classifies a create or validate failure under `policy`.
fn failure(policy: FailurePolicy, reason: String) -> StepOutcome {
    match policy {
        FailurePolicy::Strict => StepOutcome::Failed {
            reason,
        },
        FailurePolicy::Lenient => StepOutcome::Tolerated {
            reason,
        },
    }
}

/// Emits the audit event for a step and wraps it in a report.
fn record(
    audit: &dyn AuditSink,
    group: &ResourceGroupName,
    step: SmokeStep,
    outcome: StepOutcome,
) -> StepReport {
    audit.record_step(&StepAuditEvent::new(
        group.as_str(),
        step.as_str(),
        outcome.label(),
        outcome.text().map(ToString::to_string),
    ));
    StepReport {
        step,
        outcome,
    }
}
