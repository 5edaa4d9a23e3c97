// system-tests/src/lib.rs
// ============================================================================
// Module: armcheck System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for armcheck system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the armcheck system-test
//! binaries in `system-tests/tests`. Suites drive the compiled `armcheck`
//! binary end to end; the live suite additionally talks to a real cloud
//! subscription and only runs when explicitly enabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
