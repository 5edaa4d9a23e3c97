// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Parsing goes through a lookup
//! function so tests can supply values without touching the process
//! environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override.
    RunRoot,
    /// Optional per-command timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Enables the live cloud suite (`true`/`false` or `1`/`0`).
    LiveAzure,
    /// Optional region for the live suite.
    Location,
    /// Optional cloud CLI program for the live suite.
    AzProgram,
}

impl SystemTestEnv {
    /// All keys in stable order.
    pub const ALL: [Self; 5] =
        [Self::RunRoot, Self::TimeoutSeconds, Self::LiveAzure, Self::Location, Self::AzProgram];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "ARMCHECK_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "ARMCHECK_SYSTEM_TEST_TIMEOUT_SEC",
            Self::LiveAzure => "ARMCHECK_SYSTEM_TEST_LIVE_AZURE",
            Self::Location => "ARMCHECK_SYSTEM_TEST_LOCATION",
            Self::AzProgram => "ARMCHECK_SYSTEM_TEST_AZ_PROGRAM",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
    /// Whether the live cloud suite should run.
    pub live_azure: bool,
    /// Region override for the live suite.
    pub location: Option<String>,
    /// Cloud CLI program override for the live suite.
    pub az_program: Option<String>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or boolean value).
    pub fn load() -> Result<Self, String> {
        Self::from_lookup(read_env_strict)
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails or a value is empty or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Result<Option<String>, String>,
    {
        let read = |key: SystemTestEnv| read_nonempty(key.as_str(), lookup(key.as_str())?);
        let run_root = read(SystemTestEnv::RunRoot)?.map(PathBuf::from);
        let timeout = read(SystemTestEnv::TimeoutSeconds)?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let live_azure =
            parse_bool_env(SystemTestEnv::LiveAzure.as_str(), read(SystemTestEnv::LiveAzure)?)?;
        let location = read(SystemTestEnv::Location)?;
        let az_program = read(SystemTestEnv::AzProgram)?;
        Ok(Self {
            run_root,
            timeout,
            live_azure,
            location,
            az_program,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Rejects set-but-empty values.
///
/// # Errors
///
/// Returns an error when the value is empty or whitespace.
fn read_nonempty(name: &str, value: Option<String>) -> Result<Option<String>, String> {
    match value {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a boolean environment variable; unset means false.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(false);
    };
    if value.eq_ignore_ascii_case("true") || value == "1" {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") || value == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}
