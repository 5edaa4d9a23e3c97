// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for armcheck system-tests.
// Purpose: Provide binary location, workspaces, and artifact utilities.
// Dependencies: system-tests, armcheck-core
// ============================================================================

//! ## Overview
//! Shared helpers for armcheck system-tests.
//! Invariants:
//! - Every run happens inside a fresh temporary workspace.
//! - The CLI never inherits caller config or locale overrides.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod cli;
pub mod fixtures;
