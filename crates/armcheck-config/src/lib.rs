// crates/armcheck-config/src/lib.rs
// ============================================================================
// Module: armcheck Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for armcheck.toml semantics.
// Dependencies: armcheck-core, armcheck-remote, serde, toml
// ============================================================================

//! ## Overview
//! `armcheck-config` defines the configuration model shared by the `check`
//! and `smoke` commands. Loading is strict and fail-closed: unknown keys,
//! oversized files, and out-of-range limits are rejected before any template
//! is read or any external command is run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
