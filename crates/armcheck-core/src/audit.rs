// crates/armcheck-core/src/audit.rs
// ============================================================================
// Module: Audit Logging
// Description: Structured audit events for structural checks and smoke steps.
// Purpose: Emit JSON-line diagnostics without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are serialized as one JSON object per line. Sinks decide where
//! the line goes: stderr, an append-only file, an in-memory buffer (tests), or
//! nowhere. Sinks never fail the caller; write errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use serde_json::Value;

use crate::checks::CheckOutcome;
use crate::checks::CheckReport;
use crate::profile::TemplateVariant;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit payload for one structural check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Profile the check belongs to.
    pub variant: TemplateVariant,
    /// Check identifier.
    pub check_id: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Failure reason when the check failed.
    pub reason: Option<String>,
}

/// Audit payload for one remote smoke step.
#[derive(Debug, Clone, Serialize)]
pub struct StepAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Resource group the step acted on.
    pub resource_group: String,
    /// Step label (`create_group`, `validate_deployment`, `delete_group`).
    pub step: &'static str,
    /// Step status label (`passed`, `failed`, `tolerated`).
    pub status: &'static str,
    /// Detail or error text.
    pub detail: Option<String>,
}

impl CheckAuditEvent {
    /// Creates a check audit event with the current timestamp.
    #[must_use]
    pub fn new(
        variant: TemplateVariant,
        check_id: impl Into<String>,
        outcome: &CheckOutcome,
    ) -> Self {
        let reason = match outcome {
            CheckOutcome::Pass => None,
            CheckOutcome::Fail {
                reason,
            } => Some(reason.clone()),
        };
        Self {
            event: "template_check",
            timestamp_ms: now_ms(),
            variant,
            check_id: check_id.into(),
            passed: outcome.is_pass(),
            reason,
        }
    }
}

impl StepAuditEvent {
    /// Creates a smoke step audit event with the current timestamp.
    #[must_use]
    pub fn new(
        resource_group: impl Into<String>,
        step: &'static str,
        status: &'static str,
        detail: Option<String>,
    ) -> Self {
        Self {
            event: "smoke_step",
            timestamp_ms: now_ms(),
            resource_group: resource_group.into(),
            step,
            status,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records a structural check event.
    fn record_check(&self, event: &CheckAuditEvent);

    /// Records a smoke step event.
    fn record_step(&self, event: &StepAuditEvent);
}

/// Records one audit event per check in `report`.
pub fn record_report(sink: &dyn AuditSink, report: &CheckReport) {
    for result in &report.results {
        sink.record_check(&CheckAuditEvent::new(report.variant, result.id.as_str(), &result.outcome));
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_check(&self, event: &CheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_step(&self, event: &StepAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes and appends one event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_check(&self, event: &CheckAuditEvent) {
        self.append(event);
    }

    fn record_step(&self, event: &StepAuditEvent) {
        self.append(event);
    }
}

/// Audit sink that keeps events in memory as JSON values.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<Value>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Serializes and stores one event.
    fn push<T: Serialize>(&self, event: &T) {
        if let Ok(value) = serde_json::to_value(event)
            && let Ok(mut events) = self.events.lock()
        {
            events.push(value);
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record_check(&self, event: &CheckAuditEvent) {
        self.push(event);
    }

    fn record_step(&self, event: &StepAuditEvent) {
        self.push(event);
    }
}

/// Audit sink that discards all events.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_check(&self, _event: &CheckAuditEvent) {}

    fn record_step(&self, _event: &StepAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}
