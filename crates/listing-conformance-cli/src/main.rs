// crates/listing-conformance-cli/src/main.rs
// ============================================================================
// Module: Listing Conformance CLI Entry Point
// Description: Command dispatcher for conformance runs and catalog tooling.
// Purpose: Run catalog scenarios against a listing service and report results.
// Dependencies: clap, listing-conformance-cli, listing-conformance-config,
//               listing-conformance-core, listing-conformance-gateway, thiserror
// ============================================================================

//! ## Overview
//! `listing-conformance run` executes the selected catalog scenarios
//! sequentially, prints one line per scenario and the totals, and writes
//! reports when a report directory is configured. Exit codes: `0` when nothing
//! failed, `1` when any scenario failed (tracked defects included), `2` when
//! the harness itself could not run.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use listing_conformance_cli::ArtifactError;
use listing_conformance_cli::SelectionError;
use listing_conformance_cli::result_line;
use listing_conformance_cli::select_scenarios;
use listing_conformance_cli::totals_line;
use listing_conformance_cli::write_report;
use listing_conformance_config::AuditSinkKind;
use listing_conformance_config::ConfigError;
use listing_conformance_config::HarnessConfig;
use listing_conformance_core::InMemoryGateway;
use listing_conformance_core::ScenarioRunner;
use listing_conformance_core::ServiceGateway;
use listing_conformance_core::Suite;
use listing_conformance_core::SuiteReport;
use listing_conformance_core::runtime::catalog;
use listing_conformance_gateway::GatewayBuildError;
use listing_conformance_gateway::HttpGateway;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report target label for the in-memory service.
const IN_MEMORY_TARGET: &str = "memory";
/// Report target label for the in-memory service with tracked defects.
const IN_MEMORY_BUGS_TARGET: &str = "memory+known-bugs";
/// Exit code when the harness cannot run.
const HARNESS_ERROR_EXIT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "listing-conformance", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run catalog scenarios against the listing service.
    Run(RunCommand),
    /// List catalog scenarios.
    List(ListCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to listing-conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the service base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Restrict the run to these suites (repeatable).
    #[arg(long = "suite", value_enum, value_name = "NAME")]
    suites: Vec<SuiteArg>,
    /// Restrict the run to these scenario ids (repeatable).
    #[arg(long = "scenario", value_name = "ID")]
    scenarios: Vec<String>,
    /// Fixture seed for a reproducible run.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Directory for report.json and report.md.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
    /// Run against the built-in in-memory service instead of HTTP.
    #[arg(long)]
    in_memory: bool,
    /// Enable the tracked defects in the in-memory service.
    #[arg(long, requires = "in_memory")]
    with_known_bugs: bool,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
struct ListCommand {
    /// Restrict the listing to these suites (repeatable).
    #[arg(long = "suite", value_enum, value_name = "NAME")]
    suites: Vec<SuiteArg>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate configuration.
    Check(ConfigCheckCommand),
}

/// Arguments for `config check`.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Optional config file path (defaults to listing-conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Suite names accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
enum SuiteArg {
    /// Item creation contract.
    ItemCreation,
    /// Get-item contract.
    GetItem,
    /// Seller listing contract.
    SellerItems,
    /// Statistics v1/v2 contract.
    Statistics,
}

impl From<SuiteArg> for Suite {
    fn from(value: SuiteArg) -> Self {
        match value {
            SuiteArg::ItemCreation => Self::ItemCreation,
            SuiteArg::GetItem => Self::GetItem,
            SuiteArg::SellerItems => Self::SellerItems,
            SuiteArg::Statistics => Self::Statistics,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures that prevent a run from completing.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP gateway could not be built.
    #[error(transparent)]
    Gateway(#[from] GatewayBuildError),
    /// The scenario filters are invalid.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// Reports could not be written.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    /// Writing to stdout or stderr failed.
    #[error("failed to write to {stream}: {detail}")]
    Output {
        /// Stream name.
        stream: &'static str,
        /// Underlying failure.
        detail: String,
    },
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(&command),
        Commands::List(command) => command_list(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Check(command) => command_config_check(&command),
        },
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let mut config = HarnessConfig::load(command.config.as_deref())?;
    apply_run_overrides(&mut config, command)?;
    let suites = command.suites.iter().copied().map(Suite::from).collect::<Vec<_>>();
    let scenarios = select_scenarios(&suites, &command.scenarios)?;

    let (gateway, target): (Box<dyn ServiceGateway>, String) = if command.in_memory {
        if command.with_known_bugs {
            (Box::new(InMemoryGateway::with_known_bugs()), IN_MEMORY_BUGS_TARGET.to_string())
        } else {
            (Box::new(InMemoryGateway::new()), IN_MEMORY_TARGET.to_string())
        }
    } else {
        let gateway = HttpGateway::new(config.gateway_config())?;
        let target = gateway.base_url().to_string();
        (Box::new(gateway), target)
    };
    let audit = config.audit.open_sink()?;
    let mut runner = ScenarioRunner::new(gateway, audit, config.runner_config());

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let result = runner.run(scenario);
        stdout_line(&result_line(&result))?;
        results.push(result);
    }
    let report = SuiteReport::from_results(&target, results);
    stdout_line(&totals_line(&report.totals))?;

    if let Some(dir) = &config.report.output_dir {
        let paths = write_report(dir, &report)?;
        stdout_line(&format!("report: {}", paths.json.display()))?;
        stdout_line(&format!("summary: {}", paths.markdown.display()))?;
    }
    Ok(if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Applies command-line overrides on top of file and environment settings.
fn apply_run_overrides(config: &mut HarnessConfig, command: &RunCommand) -> CliResult<()> {
    if let Some(base_url) = &command.base_url {
        config.service.base_url.clone_from(base_url);
    }
    if let Some(seed) = command.seed {
        config.runner.seed = Some(seed);
    }
    if let Some(dir) = &command.report_dir {
        config.report.output_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(())
}

// ============================================================================
// SECTION: List and Config Commands
// ============================================================================

/// Executes the `list` command.
fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let suites = command.suites.iter().copied().map(Suite::from).collect::<Vec<_>>();
    let mut output = String::new();
    for scenario in catalog::scenarios() {
        if suites.is_empty() || suites.contains(&scenario.suite) {
            output.push_str(&format!("{}\t{}\n", scenario.id, scenario.title));
        }
    }
    stdout_bytes(output.as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config check`.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(command.config.as_deref())?;
    stdout_line(&format!(
        "config ok: base_url={} timeout_ms={} audit={}",
        config.service.base_url,
        config.service.timeout_ms,
        audit_label(&config)
    ))?;
    Ok(ExitCode::SUCCESS)
}

/// Returns a short label for the configured audit sink.
const fn audit_label(config: &HarnessConfig) -> &'static str {
    match config.audit.sink {
        AuditSinkKind::Stderr => "stderr",
        AuditSinkKind::File => "file",
        AuditSinkKind::None => "none",
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| output_error("stdout", &err))
}

/// Writes raw bytes to stdout.
fn stdout_bytes(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes).map_err(|err| output_error("stdout", &err))
}

/// Builds an output error for `stream`.
fn output_error(stream: &'static str, error: &std::io::Error) -> CliError {
    CliError::Output {
        stream,
        detail: error.to_string(),
    }
}

/// Emits an error message to stderr and returns the harness error exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "error: {message}");
    ExitCode::from(HARNESS_ERROR_EXIT)
}
