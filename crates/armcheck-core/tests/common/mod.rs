// crates/armcheck-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared template fixtures for structural check tests.
// Purpose: Load the repository templates and derive mutated variants.
// Dependencies: armcheck-core, serde_json
// ============================================================================

//! ## Overview
//! Helpers that load the templates shipped under `templates/` and apply
//! targeted mutations for negative tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use armcheck_core::ParametersDocument;
use armcheck_core::TemplateDocument;
use armcheck_core::TemplateVariant;
use serde_json::Value;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Directory holding the template family for `variant`.
#[must_use]
pub fn template_dir(variant: TemplateVariant) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates").join(variant.as_str())
}

/// Raw template JSON for `variant`.
#[must_use]
pub fn template_json(variant: TemplateVariant) -> Value {
    read_json(template_dir(variant).join("azuredeploy.json"))
}

/// Raw parameters JSON for `variant`.
#[must_use]
pub fn parameters_json(variant: TemplateVariant) -> Value {
    read_json(template_dir(variant).join("azuredeploy.parameters.json"))
}

/// Wraps raw JSON as a template document.
#[must_use]
pub fn template(value: Value) -> TemplateDocument {
    TemplateDocument::from_value(value).unwrap()
}

/// Wraps raw JSON as a parameters document.
#[must_use]
pub fn parameters(value: Value) -> ParametersDocument {
    ParametersDocument::from_value(value).unwrap()
}

/// Returns the first resource of `resource_type` mutably.
pub fn resource_mut<'a>(template: &'a mut Value, resource_type: &str) -> &'a mut Value {
    template["resources"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|resource| resource["type"] == resource_type)
        .unwrap()
}

/// Reads and parses a JSON file.
fn read_json(path: PathBuf) -> Value {
    let bytes = std::fs::read(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
    serde_json::from_slice(&bytes).unwrap()
}
