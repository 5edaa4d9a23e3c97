// crates/armcheck-cli/src/main.rs
// ============================================================================
// Module: armcheck CLI Entry Point
// Description: Command dispatcher for template checks and remote smoke tests.
// Purpose: Provide a localized CLI over the core checker and remote driver.
// Dependencies: clap, armcheck-config, armcheck-core, armcheck-remote, tokio.
// ============================================================================

//! ## Overview
//! `armcheck check` evaluates a template and parameters file against a
//! built-in profile and exits non-zero when any check fails. `armcheck smoke`
//! creates a disposable resource group, submits the template for
//! provider-side validation, and deletes the group. `armcheck config`
//! validates or prints configuration. All user-facing strings are routed
//! through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use armcheck_cli::i18n::Locale;
use armcheck_cli::i18n::set_locale;
use armcheck_cli::t;
use armcheck_config::ArmcheckConfig;
use armcheck_config::AuditSinkKind;
use armcheck_config::config_toml_example;
use armcheck_core::AuditSink;
use armcheck_core::CheckOutcome;
use armcheck_core::CheckReport;
use armcheck_core::FileAuditSink;
use armcheck_core::NoopAuditSink;
use armcheck_core::ParametersDocument;
use armcheck_core::StderrAuditSink;
use armcheck_core::TemplateDocument;
use armcheck_core::TemplateVariant;
use armcheck_core::evaluate;
use armcheck_core::record_report;
use armcheck_remote::AzCliClient;
use armcheck_remote::FailurePolicy;
use armcheck_remote::ResourceGroupName;
use armcheck_remote::SmokePlan;
use armcheck_remote::SmokeReport;
use armcheck_remote::StepOutcome;
use armcheck_remote::run_smoke_test;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "ARMCHECK_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "armcheck", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `ARMCHECK_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a template and parameters file against a built-in profile.
    Check(CheckCommand),
    /// Validate a template remotely inside a disposable resource group.
    Smoke(SmokeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Template selection shared by `check` and `smoke`.
#[derive(Args, Debug, Default)]
struct TemplateArgs {
    /// Optional config file path (defaults to armcheck.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Built-in profile (overrides `template.variant`).
    #[arg(long, value_enum, value_name = "VARIANT")]
    variant: Option<VariantArg>,
    /// Template file (overrides `template.template_path`).
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,
    /// Parameters file (overrides `template.parameters_path`).
    #[arg(long, value_name = "PATH")]
    parameters: Option<PathBuf>,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Template selection.
    #[command(flatten)]
    inputs: TemplateArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
}

/// Arguments for the `smoke` command.
#[derive(Args, Debug)]
struct SmokeCommand {
    /// Template selection.
    #[command(flatten)]
    inputs: TemplateArgs,
    /// Provider region (overrides `remote.location`).
    #[arg(long, value_name = "REGION")]
    location: Option<String>,
    /// Resource group label (overrides `remote.group_label`).
    #[arg(long, value_name = "LABEL")]
    group_label: Option<String>,
    /// Tolerate create and validate failures.
    #[arg(long, action = ArgAction::SetTrue)]
    lenient: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an armcheck configuration file.
    Validate(ConfigValidateCommand),
    /// Print a canonical example configuration.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to armcheck.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

/// Built-in profile selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum VariantArg {
    /// Virtual network with two NSG-protected subnets.
    Network,
    /// Network plus container registry and managed cluster.
    Aks,
}

/// Output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormatArg {
    /// Human-readable lines.
    Text,
    /// Canonical JSON.
    Json,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

impl From<VariantArg> for TemplateVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Network => Self::Network,
            VariantArg::Aks => Self::Aks,
        }
    }
}

/// Template inputs after config and flag resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedInputs {
    /// Profile to check against.
    variant: TemplateVariant,
    /// Template file path.
    template_path: PathBuf,
    /// Parameters file path.
    parameters_path: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Smoke(command) => command_smoke(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.inputs)?;
    let inputs = resolve_inputs(&config, &command.inputs);
    let max_bytes = config.template.max_document_bytes;
    let template = TemplateDocument::load(&inputs.template_path, max_bytes)
        .map_err(|err| CliError::new(t!("check.load_failed", error = err)))?;
    let parameters = ParametersDocument::load(&inputs.parameters_path, max_bytes)
        .map_err(|err| CliError::new(t!("check.load_failed", error = err)))?;

    let report = evaluate(inputs.variant, &template, &parameters);
    let audit = build_audit_sink(&config)?;
    record_report(audit.as_ref(), &report);

    match command.format {
        OutputFormatArg::Text => {
            let header = t!(
                "check.header",
                template = inputs.template_path.display(),
                variant = inputs.variant
            );
            write_stdout_text(&format!("{header}\n{}", render_check_text(&report)))?;
        }
        OutputFormatArg::Json => write_canonical_json(&report)?,
    }
    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Renders one line per check followed by a summary line.
fn render_check_text(report: &CheckReport) -> String {
    let mut output = String::new();
    for result in &report.results {
        let line = match &result.outcome {
            CheckOutcome::Pass => t!("check.result.pass", id = result.id),
            CheckOutcome::Fail {
                reason,
            } => t!("check.result.fail", id = result.id, reason = reason),
        };
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(&t!(
        "check.summary",
        passed = report.passed_count(),
        failed = report.failed_count()
    ));
    output.push('\n');
    output
}

// ============================================================================
// SECTION: Smoke Command
// ============================================================================

/// Executes the `smoke` command.
async fn command_smoke(command: SmokeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(&command.inputs)?;
    apply_smoke_overrides(&mut config, &command)?;
    let inputs = resolve_inputs(&config, &command.inputs);
    for path in [&inputs.template_path, &inputs.parameters_path] {
        if !path.is_file() {
            return Err(CliError::new(t!("smoke.input_missing", path = path.display())));
        }
    }
    let resource_group = ResourceGroupName::generate(&config.remote.group_label)
        .map_err(|err| CliError::new(t!("smoke.group_invalid", error = err)))?;
    let plan = SmokePlan {
        resource_group,
        location: config.remote.location.clone(),
        template_path: inputs.template_path,
        parameters_path: inputs.parameters_path,
        mode: config.remote.mode,
        policy: config.remote.failure_policy,
    };

    let audit = build_audit_sink(&config)?;
    let client = AzCliClient::new(config.remote.az_config());
    let report = run_smoke_test(&client, &plan, audit.as_ref()).await;

    match command.format {
        OutputFormatArg::Text => write_stdout_text(&render_smoke_text(&report))?,
        OutputFormatArg::Json => write_canonical_json(&report)?,
    }
    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Applies smoke flags to the loaded config and revalidates it.
fn apply_smoke_overrides(config: &mut ArmcheckConfig, command: &SmokeCommand) -> CliResult<()> {
    if let Some(location) = &command.location {
        config.remote.location.clone_from(location);
    }
    if let Some(label) = &command.group_label {
        config.remote.group_label.clone_from(label);
    }
    if command.lenient {
        config.remote.failure_policy = FailurePolicy::Lenient;
    }
    config.validate().map_err(|err| CliError::new(t!("config.override_invalid", error = err)))
}

/// Renders the smoke header, one line per step, and a verdict line.
fn render_smoke_text(report: &SmokeReport) -> String {
    let mut output = t!(
        "smoke.header",
        group = report.resource_group,
        location = report.location,
        policy = report.policy.as_str()
    );
    output.push('\n');
    for step in &report.steps {
        let status = match step.outcome {
            StepOutcome::Passed {
                ..
            } => t!("smoke.status.passed"),
            StepOutcome::Failed {
                ..
            } => t!("smoke.status.failed"),
            StepOutcome::Tolerated {
                ..
            } => t!("smoke.status.tolerated"),
        };
        let line = match step.outcome.text() {
            Some(detail) => {
                t!("smoke.step.detail", status = status, step = step.step.as_str(), detail = detail)
            }
            None => t!("smoke.step.plain", status = status, step = step.step.as_str()),
        };
        output.push_str(&line);
        output.push('\n');
    }
    let verdict =
        if report.passed() { t!("smoke.summary.passed") } else { t!("smoke.summary.failed") };
    output.push_str(&verdict);
    output.push('\n');
    output
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_text(&config_toml_example())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = ArmcheckConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    let source = match &config.source {
        Some(path) => t!("config.validate.source", path = path.display()),
        None => t!("config.validate.defaults"),
    };
    write_stdout_line(&source).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads config from the flag, environment, or default location.
fn load_config(inputs: &TemplateArgs) -> CliResult<ArmcheckConfig> {
    let mut config = ArmcheckConfig::load(inputs.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    if let Some(variant) = inputs.variant {
        config.template.variant = variant.into();
    }
    Ok(config)
}

/// Resolves template inputs: path flags win over config values.
///
/// The variant flag is applied by [`load_config`]. Flag paths are taken relative to the working directory; config paths are
/// already resolved against the config file directory.
fn resolve_inputs(config: &ArmcheckConfig, inputs: &TemplateArgs) -> ResolvedInputs {
    ResolvedInputs {
        variant: config.template.variant,
        template_path: inputs.template.clone().unwrap_or_else(|| config.template_path()),
        parameters_path: inputs.parameters.clone().unwrap_or_else(|| config.parameters_path()),
    }
}

/// Builds the configured audit sink.
fn build_audit_sink(config: &ArmcheckConfig) -> CliResult<Box<dyn AuditSink>> {
    match config.audit.sink {
        AuditSinkKind::Stderr => Ok(Box::new(StderrAuditSink)),
        AuditSinkKind::None => Ok(Box::new(NoopAuditSink)),
        AuditSinkKind::File => {
            let path = config.audit_path().unwrap_or_default();
            let sink = FileAuditSink::new(&path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
    }
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes preformatted text to stdout without adding a newline.
fn write_stdout_text(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes canonical JSON to stdout with a trailing newline.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
