// crates/armcheck-remote/src/lib.rs
// ============================================================================
// Module: armcheck Remote Library
// Description: Resource group lifecycle client and remote smoke test runner.
// Purpose: Submit templates for provider-side validation in a disposable group.
// Dependencies: armcheck-core, async-trait, rand, serde, tokio
// ============================================================================

//! ## Overview
//! The remote half of armcheck treats a cloud resource group as an external
//! resource with a three-call lifecycle: create, validate a deployment
//! against it, delete. [`ResourceGroupClient`] is the seam; [`AzCliClient`]
//! drives the `az` command-line tool and tests substitute in-memory fakes.
//!
//! [`run_smoke_test`] executes the three steps in order. Create and validate
//! report real failures unless the plan opts into [`FailurePolicy::Lenient`];
//! delete is best-effort and never fails the run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod az;
pub mod client;
pub mod group;
pub mod smoke;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use az::AzCliClient;
pub use az::AzCliConfig;
pub use az::DEFAULT_COMMAND_TIMEOUT_MS;
pub use az::DEFAULT_MAX_OUTPUT_BYTES;
pub use az::DEFAULT_PROGRAM;
pub use client::DeploymentMode;
pub use client::DeploymentValidation;
pub use client::RemoteError;
pub use client::ResourceGroupClient;
pub use client::ValidationVerdict;
pub use group::DEFAULT_GROUP_LABEL;
pub use group::MAX_GROUP_NAME_LENGTH;
pub use group::GroupNameError;
pub use group::ResourceGroupName;
pub use group::validate_label;
pub use smoke::FailurePolicy;
pub use smoke::SmokePlan;
pub use smoke::SmokeReport;
pub use smoke::SmokeStep;
pub use smoke::StepOutcome;
pub use smoke::StepReport;
pub use smoke::run_smoke_test;
