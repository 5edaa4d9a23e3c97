// system-tests/tests/suites/smoke_workflows.rs
// ============================================================================
// Module: Smoke Workflow Tests
// Description: Full `armcheck smoke` runs against a scripted cloud CLI.
// Purpose: Ensure lifecycle ordering, cleanup, policies, and timeouts hold end to end.
// Dependencies: system-tests helpers
// ============================================================================

//! Smoke workflow system tests.

use std::fs;
use std::path::Path;

use helpers::artifacts::TestReporter;
use helpers::cli::cli_binary;
use helpers::cli::run_cli;
use helpers::cli::stderr_text;
use helpers::cli::stdout_text;
use helpers::fixtures::Workspace;
use serde_json::Value;

use crate::helpers;

/// Script body: logs calls, then answers per subcommand.
///
/// `VALIDATE` selects the validation behavior: `accept`, `reject`, or `hang`.
const SCRIPTED_AZ: &str = r#"here="$(dirname "$0")"
echo "$@" >> "$here/calls.log"
case "$1 $2" in
  "group create")
    echo "$4"
    ;;
  "deployment group")
    case "$(cat "$here/validate.mode")" in
      accept) echo '{"error": null, "properties": {"provisioningState": "Succeeded"}}' ;;
      reject) echo '{"error": {"code": "InvalidTemplateDeployment", "message": "quota", "details": [{"code": "QuotaExceeded", "message": "cores"}]}}'; exit 0 ;;
      hang) exec sleep 30 ;;
    esac
    ;;
  "group delete")
    echo 'ERROR: transient' >&2
    exit 1
    ;;
esac"#;

fn workspace_with_az(validate: &str, extra_config: &str) -> Result<Workspace, Box<dyn std::error::Error>> {
    let workspace = Workspace::new()?;
    let program = workspace.write_script("az", SCRIPTED_AZ)?;
    fs::write(workspace.root().join("validate.mode"), validate)?;
    workspace.write_config(&format!(
        "[remote]\nprogram = \"{}\"\nlocation = \"westeurope\"\n{extra_config}\n[audit]\nsink = \"file\"\npath = \"audit.jsonl\"\n",
        program.display()
    ))?;
    Ok(workspace)
}

fn calls(root: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(root.join("calls.log"))?.lines().map(ToString::to_string).collect())
}

#[test]
fn accepted_template_runs_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("accepted_template_runs_full_lifecycle")?;
    let workspace = workspace_with_az("accept", "")?;
    let binary = cli_binary().ok_or("armcheck binary unavailable")?;
    let args = ["smoke", "--variant", "aks", "--group-label", "ci-run", "--format", "json"];

    let output = run_cli(&binary, workspace.root(), &args)?;
    reporter.artifacts().write_command("smoke", &args, &output)?;
    if !output.status.success() {
        return Err(format!("smoke failed: {}", stdout_text(&output)).into());
    }

    let report: Value = serde_json::from_slice(&output.stdout)?;
    let group = report["resource_group"].as_str().ok_or("missing resource_group")?;
    if !group.ends_with("-ci-run") || group.len() != "-ci-run".len() + 5 {
        return Err(format!("unexpected group name {group}").into());
    }
    let statuses: Vec<&str> = report["steps"]
        .as_array()
        .ok_or("missing steps")?
        .iter()
        .filter_map(|step| step["outcome"]["status"].as_str())
        .collect();
    if statuses != ["passed", "passed", "tolerated"] {
        return Err(format!("unexpected statuses [{}]", statuses.join(", ")).into());
    }

    let calls = calls(workspace.root())?;
    if calls.len() != 3 {
        return Err(format!("expected three az calls, got {}", calls.len()).into());
    }
    let validate = &calls[1];
    for fragment in [
        format!("--resource-group {group}"),
        "templates/aks/azuredeploy.json".to_string(),
        "--parameters @".to_string(),
        "--mode Complete".to_string(),
    ] {
        if !validate.contains(&fragment) {
            return Err(format!("validate call `{validate}` lacks `{fragment}`").into());
        }
    }
    if !calls[2].contains(group) {
        return Err("delete targeted a different group".into());
    }

    let audit = fs::read_to_string(workspace.root().join("audit.jsonl"))?;
    if audit.lines().count() != 3 {
        return Err("expected one audit line per smoke step".into());
    }
    reporter.finish("pass")?;
    Ok(())
}

#[test]
fn provider_rejection_respects_policy() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("provider_rejection_respects_policy")?;
    let binary = cli_binary().ok_or("armcheck binary unavailable")?;

    let strict = workspace_with_az("reject", "")?;
    let strict_output = run_cli(&binary, strict.root(), &["smoke"])?;
    reporter.artifacts().write_command("strict", &["smoke"], &strict_output)?;
    if strict_output.status.success() {
        return Err("rejection passed under strict policy".into());
    }
    let text = stdout_text(&strict_output);
    if !text.contains("FAIL validate_deployment: InvalidTemplateDeployment: quota (cores)") {
        return Err(format!("rejection detail missing:\n{text}").into());
    }

    let lenient = workspace_with_az("reject", "failure_policy = \"lenient\"\n")?;
    let lenient_output = run_cli(&binary, lenient.root(), &["smoke"])?;
    reporter.artifacts().write_command("lenient", &["smoke"], &lenient_output)?;
    if !lenient_output.status.success() {
        return Err(format!("lenient run failed: {}", stdout_text(&lenient_output)).into());
    }
    if calls(lenient.root())?.len() != 3 {
        return Err("lenient run skipped a lifecycle step".into());
    }
    reporter.finish("pass")?;
    Ok(())
}

#[test]
fn hung_validation_times_out_and_still_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("hung_validation_times_out_and_still_cleans_up")?;
    let workspace = workspace_with_az("hang", "command_timeout_ms = 500\n")?;
    let binary = cli_binary().ok_or("armcheck binary unavailable")?;

    let started = std::time::Instant::now();
    let output = run_cli(&binary, workspace.root(), &["smoke"])?;
    let elapsed = started.elapsed();
    reporter.artifacts().write_command("smoke", &["smoke"], &output)?;

    if output.status.success() {
        return Err("timed out validation passed".into());
    }
    if elapsed.as_secs() >= 20 {
        return Err(format!("smoke took {}s despite the timeout", elapsed.as_secs()).into());
    }
    let text = stdout_text(&output);
    if !text.contains("timed out after 500 ms") {
        return Err(format!("timeout not reported:\n{text}\n{}", stderr_text(&output)).into());
    }
    let calls = calls(workspace.root())?;
    if !calls.last().is_some_and(|call| call.starts_with("group delete")) {
        return Err("group was not deleted after the timeout".into());
    }
    reporter.finish("pass")?;
    Ok(())
}
