// crates/armcheck-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localization.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The armcheck CLI stores user-facing strings in a small translation catalog
//! to keep messaging consistent across commands. All runtime output should be
//! routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_', '.']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
pub(crate) const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "armcheck {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to serialize output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.validate.source", "Source: {path}"),
    ("config.validate.defaults", "Source: built-in defaults"),
    ("config.override_invalid", "Invalid command-line override: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("check.load_failed", "Failed to load template input: {error}"),
    ("check.header", "Checking {template} against the {variant} profile"),
    ("check.result.pass", "PASS {id}"),
    ("check.result.fail", "FAIL {id}: {reason}"),
    ("check.summary", "{passed} passed, {failed} failed"),
    ("smoke.input_missing", "Smoke test input not found: {path}"),
    ("smoke.group_invalid", "Invalid resource group label: {error}"),
    ("smoke.header", "Resource group {group} in {location} (policy {policy})"),
    ("smoke.step.detail", "{status} {step}: {detail}"),
    ("smoke.step.plain", "{status} {step}"),
    ("smoke.status.passed", "PASS"),
    ("smoke.status.failed", "FAIL"),
    ("smoke.status.tolerated", "TOLERATED"),
    ("smoke.summary.passed", "Smoke test passed."),
    ("smoke.summary.failed", "Smoke test failed."),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries.
pub(crate) const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "armcheck {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("output.json_failed", "No s'ha pogut serialitzar la sortida: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("config.validate.source", "Origen: {path}"),
    ("config.validate.defaults", "Origen: valors per defecte integrats"),
    ("config.override_invalid", "Valor de línia d'ordres no vàlid: {error}"),
    ("audit.open_failed", "No s'ha pogut obrir el registre d'auditoria {path}: {error}"),
    ("check.load_failed", "No s'ha pogut carregar l'entrada de la plantilla: {error}"),
    ("check.header", "Comprovant {template} amb el perfil {variant}"),
    ("check.result.pass", "CORRECTE {id}"),
    ("check.result.fail", "ERROR {id}: {reason}"),
    ("check.summary", "{passed} correctes, {failed} erronis"),
    ("smoke.input_missing", "No s'ha trobat l'entrada de la prova: {path}"),
    ("smoke.group_invalid", "Etiqueta de grup de recursos no vàlida: {error}"),
    ("smoke.header", "Grup de recursos {group} a {location} (política {policy})"),
    ("smoke.step.detail", "{status} {step}: {detail}"),
    ("smoke.step.plain", "{status} {step}"),
    ("smoke.status.passed", "CORRECTE"),
    ("smoke.status.failed", "ERROR"),
    ("smoke.status.tolerated", "TOLERAT"),
    ("smoke.summary.passed", "La prova de fum ha superat."),
    ("smoke.summary.failed", "La prova de fum ha fallat."),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` in an explicit locale while substituting `args`.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
