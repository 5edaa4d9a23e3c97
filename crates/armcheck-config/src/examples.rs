// crates/armcheck-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for `armcheck config example` and docs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `armcheck.toml`. Every key is spelled out with its
//! default value so the output doubles as a reference.

/// Returns a canonical example `armcheck.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[template]
variant = "network"
# template_path = "templates/network/azuredeploy.json"
# parameters_path = "templates/network/azuredeploy.parameters.json"
max_document_bytes = 4194304

[remote]
program = "az"
location = "eastus"
group_label = "spec-group"
mode = "complete"
failure_policy = "strict"
command_timeout_ms = 600000
max_output_bytes = 1048576

[audit]
sink = "stderr"
# sink = "file"
# path = "armcheck-audit.jsonl"
"#,
    )
}
