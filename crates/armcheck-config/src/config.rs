// crates/armcheck-config/src/config.rs
// ============================================================================
// Module: armcheck Configuration
// Description: Configuration loading and validation for armcheck.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: armcheck-core, armcheck-remote, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is resolved from an explicit path, then `ARMCHECK_CONFIG`, then
//! `./armcheck.toml`. Only the last location is optional: when it is absent,
//! built-in defaults apply. Relative paths inside the file resolve against
//! the directory containing the file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use armcheck_core::DEFAULT_MAX_DOCUMENT_BYTES;
use armcheck_core::TemplateVariant;
use armcheck_remote::AzCliConfig;
use armcheck_remote::DEFAULT_COMMAND_TIMEOUT_MS;
use armcheck_remote::DEFAULT_GROUP_LABEL;
use armcheck_remote::DEFAULT_MAX_OUTPUT_BYTES;
use armcheck_remote::DEFAULT_PROGRAM;
use armcheck_remote::DeploymentMode;
use armcheck_remote::FailurePolicy;
use armcheck_remote::validate_label;
use serde::Deserialize;
use serde::Deserializer;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "armcheck.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ARMCHECK_CONFIG";
/// Default provider region for disposable groups.
pub const DEFAULT_LOCATION: &str = "eastus";
/// Template filename inside a template family directory.
pub const TEMPLATE_FILE_NAME: &str = "azuredeploy.json";
/// Parameters filename inside a template family directory.
pub const PARAMETERS_FILE_NAME: &str = "azuredeploy.parameters.json";
/// Directory holding the template families, relative to the config base.
pub const TEMPLATES_DIR: &str = "templates";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum accepted template document size in bytes.
pub(crate) const MAX_DOCUMENT_BYTES: usize = 64 * 1024 * 1024;
/// Minimum per-command timeout in milliseconds.
pub(crate) const MIN_COMMAND_TIMEOUT_MS: u64 = 100;
/// Maximum per-command timeout in milliseconds.
pub(crate) const MAX_COMMAND_TIMEOUT_MS: u64 = 3_600_000;
/// Minimum captured output per stream in bytes.
pub(crate) const MIN_OUTPUT_BYTES: usize = 1024;
/// Maximum captured output per stream in bytes.
pub(crate) const MAX_OUTPUT_BYTES: usize = 64 * 1024 * 1024;
/// Maximum length of a region name.
pub(crate) const MAX_LOCATION_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// armcheck configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmcheckConfig {
    /// Template selection and document limits.
    #[serde(default)]
    pub template: TemplateConfig,
    /// Remote smoke test settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Audit sink settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// File the configuration was read from, if any (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ArmcheckConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.base_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        config.source = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration text with an empty base directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.template.validate()?;
        self.remote.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the template path, resolved against the base directory.
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        let relative = self.template.template_path.clone().unwrap_or_else(|| {
            default_family_dir(self.template.variant).join(TEMPLATE_FILE_NAME)
        });
        self.base_dir.join(relative)
    }

    /// Returns the parameters path, resolved against the base directory.
    #[must_use]
    pub fn parameters_path(&self) -> PathBuf {
        let relative = self.template.parameters_path.clone().unwrap_or_else(|| {
            default_family_dir(self.template.variant).join(PARAMETERS_FILE_NAME)
        });
        self.base_dir.join(relative)
    }

    /// Returns the audit log path, resolved against the base directory.
    #[must_use]
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_ref().map(|path| self.base_dir.join(path))
    }
}

/// Template selection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Built-in profile to check against.
    #[serde(default, deserialize_with = "deserialize_variant")]
    pub variant: TemplateVariant,
    /// Template file; defaults to `templates/<variant>/azuredeploy.json`.
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    /// Parameters file; defaults to
    /// `templates/<variant>/azuredeploy.parameters.json`.
    #[serde(default)]
    pub parameters_path: Option<PathBuf>,
    /// Maximum accepted document size in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            variant: TemplateVariant::default(),
            template_path: None,
            parameters_path: None,
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl TemplateConfig {
    /// Validates template settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.template_path {
            validate_path_string("template.template_path", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.parameters_path {
            validate_path_string("template.parameters_path", &path.to_string_lossy())?;
        }
        if self.max_document_bytes == 0 || self.max_document_bytes > MAX_DOCUMENT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "template.max_document_bytes must be between 1 and {MAX_DOCUMENT_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Remote smoke test settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Cloud CLI program.
    #[serde(default = "default_program")]
    pub program: String,
    /// Provider region for the disposable group.
    #[serde(default = "default_location")]
    pub location: String,
    /// Label appended to the random group prefix.
    #[serde(default = "default_group_label")]
    pub group_label: String,
    /// Deployment mode submitted with validation.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: DeploymentMode,
    /// How create and validate failures affect the run.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Per-command timeout in milliseconds.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// Captured bytes per output stream.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            location: default_location(),
            group_label: default_group_label(),
            mode: DeploymentMode::default(),
            failure_policy: FailurePolicy::default(),
            command_timeout_ms: default_command_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl RemoteConfig {
    /// Validates remote settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("remote.program", &self.program)?;
        validate_location(&self.location)?;
        validate_label(&self.group_label)
            .map_err(|err| ConfigError::Invalid(format!("remote.group_label: {err}")))?;
        if !(MIN_COMMAND_TIMEOUT_MS ..= MAX_COMMAND_TIMEOUT_MS).contains(&self.command_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "remote.command_timeout_ms must be between {MIN_COMMAND_TIMEOUT_MS} and \
                 {MAX_COMMAND_TIMEOUT_MS}"
            )));
        }
        if !(MIN_OUTPUT_BYTES ..= MAX_OUTPUT_BYTES).contains(&self.max_output_bytes) {
            return Err(ConfigError::Invalid(format!(
                "remote.max_output_bytes must be between {MIN_OUTPUT_BYTES} and \
                 {MAX_OUTPUT_BYTES}"
            )));
        }
        Ok(())
    }

    /// Builds the `az` client settings.
    #[must_use]
    pub fn az_config(&self) -> AzCliConfig {
        AzCliConfig {
            program: self.program.trim().to_string(),
            timeout: Duration::from_millis(self.command_timeout_ms),
            max_output_bytes: self.max_output_bytes,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit events are discarded.
    None,
}

/// Audit settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (file sink only).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid with audit.sink=file".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default template family directory for `variant`.
fn default_family_dir(variant: TemplateVariant) -> PathBuf {
    Path::new(TEMPLATES_DIR).join(variant.as_str())
}

/// Default document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Default CLI program.
fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// Default region.
fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// Default group label.
fn default_group_label() -> String {
    DEFAULT_GROUP_LABEL.to_string()
}

/// Default command timeout.
const fn default_command_timeout_ms() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_MS
}

/// Default output cap.
const fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a variant name case-insensitively.
fn deserialize_variant<'de, D>(deserializer: D) -> Result<TemplateVariant, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}

/// Deserializes a deployment mode case-insensitively.
fn deserialize_mode<'de, D>(deserializer: D) -> Result<DeploymentMode, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}

/// Resolves the config path from CLI or environment defaults.
///
/// The flag is true when the path was named explicitly and must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
pub(crate) fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Region names are short lowercase alphanumeric identifiers.
fn validate_location(value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.len() > MAX_LOCATION_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "remote.location must be 1 to {MAX_LOCATION_LENGTH} characters"
        )));
    }
    if !value.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit()) {
        return Err(ConfigError::Invalid(
            "remote.location must be lowercase alphanumeric (for example eastus)".to_string(),
        ));
    }
    Ok(())
}
