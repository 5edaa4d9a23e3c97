// system-tests/tests/suites/live_azure.rs
// ============================================================================
// Module: Live Azure Tests
// Description: Smoke lifecycle against a real subscription, opt-in only.
// Purpose: Confirm shipped templates pass provider-side validation.
// Dependencies: system-tests helpers, armcheck-core
// ============================================================================

//! Live cloud system tests.

use std::process::Command;
use std::time::Duration;
use std::time::Instant;

use armcheck_core::TemplateVariant;
use helpers::artifacts::TestReporter;
use helpers::cli::cli_binary;
use helpers::cli::run_cli;
use helpers::cli::stdout_text;
use helpers::fixtures::Workspace;
use helpers::timeouts::resolve_timeout;
use helpers::timeouts::timeout_ms;
use serde_json::Value;
use system_tests::config::SystemTestConfig;

use crate::helpers;

/// Per-command budget for real provider calls.
const LIVE_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);
/// How long a no-wait delete may take to remove the group.
const DELETION_BUDGET: Duration = Duration::from_secs(1_200);
/// Pause between `group exists` polls.
const DELETION_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Polls `<program> group exists` until the group is gone or the budget runs out.
fn wait_for_deletion(
    reporter: &TestReporter,
    program: &str,
    group: &str,
    budget: Duration,
    interval: Duration,
) -> Result<Duration, Box<dyn std::error::Error>> {
    let args = ["group", "exists", "--name", group];
    let started = Instant::now();
    let mut attempt = 0_u32;
    loop {
        attempt += 1;
        let output = Command::new(program).args(args).output()?;
        reporter.artifacts().write_command(&format!("{group}_exists_{attempt}"), &args, &output)?;
        let answer = stdout_text(&output);
        if output.status.success() && answer.trim() == "false" {
            return Ok(started.elapsed());
        }
        if started.elapsed() + interval > budget {
            return Err(format!(
                "resource group {group} still present after {}s (last answer: {})",
                started.elapsed().as_secs(),
                answer.trim()
            )
            .into());
        }
        std::thread::sleep(interval);
    }
}

#[test]
fn shipped_templates_validate_remotely() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("shipped_templates_validate_remotely")?;
    let config = SystemTestConfig::load()?;
    if !config.live_azure {
        reporter.note("skipped: ARMCHECK_SYSTEM_TEST_LIVE_AZURE is not enabled");
        reporter.finish("skip")?;
        return Ok(());
    }

    let workspace = Workspace::new()?;
    let program = config.az_program.as_deref().unwrap_or("az");
    let location = config.location.as_deref().unwrap_or("eastus");
    let timeout = timeout_ms(resolve_timeout(&config, LIVE_COMMAND_TIMEOUT));
    workspace.write_config(&format!(
        "[remote]\nprogram = \"{program}\"\nlocation = \"{location}\"\n\
         group_label = \"armcheck-system-test\"\ncommand_timeout_ms = {timeout}\n\n\
         [audit]\nsink = \"file\"\npath = \"audit.jsonl\"\n"
    ))?;
    let binary = cli_binary().ok_or("armcheck binary unavailable")?;

    for variant in TemplateVariant::ALL {
        let args = ["smoke", "--variant", variant.as_str(), "--format", "json"];
        let output = run_cli(&binary, workspace.root(), &args)?;
        reporter.artifacts().write_command(variant.as_str(), &args, &output)?;

        let report: Value = serde_json::from_slice(&output.stdout)?;
        if !output.status.success() {
            return Err(format!("{variant} smoke failed:\n{}", stdout_text(&output)).into());
        }
        let group = report["resource_group"].as_str().ok_or("report has no resource_group")?;
        let budget = resolve_timeout(&config, DELETION_BUDGET);
        let waited =
            wait_for_deletion(&reporter, program, group, budget, DELETION_POLL_INTERVAL)?;
        reporter.note(format!(
            "{variant} validated in {location} as {group}; group gone after {}s",
            waited.as_secs()
        ));
    }
    std::fs::copy(
        workspace.root().join("audit.jsonl"),
        reporter.artifacts().root().join("audit.jsonl"),
    )?;
    reporter.finish("pass")?;
    Ok(())
}

/// Script answering `group exists` with `true` twice, then `false`.
#[cfg(unix)]
const EVENTUALLY_DELETED_AZ: &str = r#"here="$(dirname "$0")"
echo x >> "$here/polls"
if [ "$(wc -l < "$here/polls")" -le 2 ]; then echo true; else echo false; fi"#;

#[cfg(unix)]
#[test]
fn deletion_poll_waits_until_group_is_gone() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("deletion_poll_waits_until_group_is_gone")?;
    let workspace = Workspace::new()?;
    let script = workspace.write_script("az", EVENTUALLY_DELETED_AZ)?;
    let program = script.to_str().ok_or("non-utf8 path")?;

    wait_for_deletion(
        &reporter,
        program,
        "abcde-armcheck-system-test",
        Duration::from_secs(30),
        Duration::from_millis(10),
    )?;
    let polls = std::fs::read_to_string(workspace.root().join("polls"))?.lines().count();
    if polls != 3 {
        return Err(format!("expected 3 polls, made {polls}").into());
    }
    reporter.finish("pass")?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn deletion_poll_fails_when_group_lingers() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("deletion_poll_fails_when_group_lingers")?;
    let workspace = Workspace::new()?;
    let script = workspace.write_script("az", "echo true")?;
    let program = script.to_str().ok_or("non-utf8 path")?;

    let result = wait_for_deletion(
        &reporter,
        program,
        "abcde-armcheck-system-test",
        Duration::from_millis(200),
        Duration::from_millis(50),
    );
    match result {
        Err(err) if err.to_string().contains("still present") => {}
        Err(err) => return Err(format!("unexpected error: {err}").into()),
        Ok(_) => return Err("lingering group was reported deleted".into()),
    }
    reporter.finish("pass")?;
    Ok(())
}
