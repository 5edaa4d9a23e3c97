// crates/armcheck-core/src/lib.rs
// ============================================================================
// Module: armcheck Core Library
// Description: Template documents, built-in profiles, and structural checks.
// Purpose: Evaluate ARM template shape expectations as independent checks.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `armcheck-core` loads ARM template and parameters documents and evaluates
//! the fixed expectations of a built-in [`TemplateVariant`] against them. Each
//! expectation is an independent check with a stable identifier; a failed
//! check never prevents the evaluation of any other.
//!
//! The crate also defines the audit event payloads and sinks shared by the
//! structural checker and the remote smoke driver.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod checks;
pub mod document;
pub mod profile;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::CheckAuditEvent;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::StepAuditEvent;
pub use audit::record_report;
pub use checks::CheckId;
pub use checks::CheckOutcome;
pub use checks::CheckReport;
pub use checks::CheckResult;
pub use checks::evaluate;
pub use document::DEFAULT_MAX_DOCUMENT_BYTES;
pub use document::DocumentError;
pub use document::ParametersDocument;
pub use document::TemplateDocument;
pub use profile::OutputExpectation;
pub use profile::ResourceExpectation;
pub use profile::TemplateProfile;
pub use profile::TemplateVariant;
