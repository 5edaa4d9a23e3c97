// crates/armcheck-remote/src/group.rs
// ============================================================================
// Module: Resource Group Names
// Description: Validated resource group names and disposable name generation.
// Purpose: Keep every name handed to the cloud CLI within provider rules.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! Disposable groups are named `<prefix>-<label>` where `prefix` is five
//! random lowercase hex characters. Names follow the provider's rules:
//! 1 to 90 characters drawn from ASCII alphanumerics, `-`, `_`, `.`, `(`,
//! `)`, and never ending in a period.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum resource group name length accepted by the provider.
pub const MAX_GROUP_NAME_LENGTH: usize = 90;
/// Number of random hex characters prefixed to generated names.
pub const GROUP_PREFIX_LENGTH: usize = 5;
/// Default label appended to generated names.
pub const DEFAULT_GROUP_LABEL: &str = "spec-group";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a resource group name or label is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupNameError {
    /// Name or label is empty.
    #[error("resource group name must be non-empty")]
    Empty,
    /// Name exceeds the provider limit.
    #[error("resource group name is {length} characters (limit {limit})")]
    TooLong {
        /// Actual length.
        length: usize,
        /// Allowed length.
        limit: usize,
    },
    /// Name contains a character the provider rejects.
    #[error("resource group name contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// Name ends with a period.
    #[error("resource group name must not end with a period")]
    TrailingPeriod,
}

// ============================================================================
// SECTION: Resource Group Name
// ============================================================================

/// A provider-valid resource group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceGroupName(String);

impl ResourceGroupName {
    /// Validates and wraps an explicit name.
    ///
    /// # Errors
    ///
    /// Returns [`GroupNameError`] when the name breaks provider rules.
    pub fn new(name: impl Into<String>) -> Result<Self, GroupNameError> {
        let name = name.into();
        validate_chars(&name, MAX_GROUP_NAME_LENGTH)?;
        Ok(Self(name))
    }

    /// Generates `<5 random hex chars>-<label>` using the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`GroupNameError`] when `label` is invalid.
    pub fn generate(label: &str) -> Result<Self, GroupNameError> {
        Self::generate_with(&mut rand::thread_rng(), label)
    }

    /// Generates `<5 random hex chars>-<label>` from the supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns [`GroupNameError`] when `label` is invalid.
    pub fn generate_with<R: RngCore + ?Sized>(
        rng: &mut R,
        label: &str,
    ) -> Result<Self, GroupNameError> {
        validate_label(label)?;
        let prefix = rng.next_u32() & 0x000F_FFFF;
        Self::new(format!("{prefix:05x}-{label}"))
    }

    /// Returns the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a label so that generated names stay provider-valid.
///
/// # Errors
///
/// Returns [`GroupNameError`] when the label is empty, too long, or contains
/// characters the provider rejects.
pub fn validate_label(label: &str) -> Result<(), GroupNameError> {
    validate_chars(label, MAX_GROUP_NAME_LENGTH - GROUP_PREFIX_LENGTH - 1)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies the provider's character and length rules.
fn validate_chars(value: &str, limit: usize) -> Result<(), GroupNameError> {
    if value.is_empty() {
        return Err(GroupNameError::Empty);
    }
    let length = value.chars().count();
    if length > limit {
        return Err(GroupNameError::TooLong {
            length,
            limit,
        });
    }
    if let Some(invalid) = value
        .chars()
        .find(|&ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '(' | ')')))
    {
        return Err(GroupNameError::InvalidCharacter(invalid));
    }
    if value.ends_with('.') {
        return Err(GroupNameError::TrailingPeriod);
    }
    Ok(())
}
