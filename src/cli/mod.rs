//! CLI module for trialrun
//!
//! ## Commands
//!
//! - `run [GROUP]` - Run a built-in test group and print its report
//! - `list` - List the built-in groups with their execution plans
//!
//! ## Modules
//!
//! - `console` - `RunListener` that reports progress on stderr
//!
//! Commands return `CliResult<ExitCode>`; `run()` is the only place that exits the process.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod console;

use std::fmt;
use std::panic;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::demo::{self, GroupEntry};
use crate::runner::{ConstructionPolicy, HookFailurePolicy, RunConfig, Runner, StructuralError};
use console::ConsoleListener;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// A message for stderr plus the exit code the process ends with.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<StructuralError> for CliError {
    /// Render the structural error as a miette diagnostic.
    fn from(err: StructuralError) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run declared test groups
#[derive(Parser, Debug)]
#[command(name = "trialrun")]
#[command(version = VERSION)]
#[command(about = "Run declared test groups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a test group and print its report
    Run {
        /// Group to run (see `trialrun list`)
        #[arg(value_name = "GROUP", default_value = "common")]
        group: String,
        /// Report each test as it finishes
        #[arg(short, long)]
        verbose: bool,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Turn a failing before_each/after_each hook into an error for that test
        #[arg(long)]
        strict_hooks: bool,
        /// Report an instance construction failure on its test instead of aborting the run
        #[arg(long)]
        isolate_construction: bool,
    },

    /// List built-in groups and their execution plans
    List,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Parse the arguments, run the command and exit with its code.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            group,
            verbose,
            format,
            strict_hooks,
            isolate_construction,
        } => {
            let entry = lookup(&group)?;
            let config = run_config(strict_hooks, isolate_construction);
            run_group(entry, config, verbose, format)
        }
        Command::List => list_groups(),
    }
}

fn lookup(name: &str) -> CliResult<&'static GroupEntry> {
    demo::find_group(name).ok_or_else(|| {
        CliError::failure(format!(
            "Error: unknown test group '{}'\nRun `trialrun list` to see the available groups",
            name
        ))
    })
}

/// Build the run configuration from the policy flags.
pub fn run_config(strict_hooks: bool, isolate_construction: bool) -> RunConfig {
    let hooks = if strict_hooks {
        HookFailurePolicy::Surface
    } else {
        HookFailurePolicy::Swallow
    };
    let construction = if isolate_construction {
        ConstructionPolicy::Isolate
    } else {
        ConstructionPolicy::Abort
    };
    RunConfig::new()
        .with_hook_failures(hooks)
        .with_construction_failures(construction)
}

fn run_group(entry: &GroupEntry, config: RunConfig, verbose: bool, format: OutputFormat) -> CliResult<ExitCode> {
    let mut listener = ConsoleListener::new(verbose);
    let mut runner = Runner::new().with_config(config).with_listener(&mut listener);
    let report = quiet_panics(|| (entry.run)(&mut runner))?;

    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report.summary(entry.group))
                .map_err(|e| CliError::failure(format!("Error serializing report: {}", e)))?;
            println!("{}", json);
        }
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Run `f` with a panic hook that logs at debug level instead of printing to stderr. The previous hook is put
/// back afterwards.
pub fn quiet_panics<T>(f: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        tracing::debug!(panic = %info, "caught panic");
    }));
    let result = f();
    panic::set_hook(previous);
    result
}

fn list_groups() -> CliResult<ExitCode> {
    for entry in demo::GROUPS {
        println!("{} ({}): {}", entry.name, entry.group, entry.description);
        for step in (entry.plan)()? {
            let marker = if step.enabled { "" } else { " [disabled]" };
            println!("  {:>5}  {}{}", step.order.to_string(), step.display_name, marker);
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["trialrun", "run"]).unwrap();
        if let Command::Run {
            group,
            verbose,
            format,
            strict_hooks,
            isolate_construction,
        } = cli.command
        {
            assert_eq!(group, "common");
            assert!(!verbose);
            assert_eq!(format, OutputFormat::Text);
            assert!(!strict_hooks);
            assert!(!isolate_construction);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "trialrun",
            "run",
            "CommonTest",
            "-v",
            "--format",
            "json",
            "--strict-hooks",
            "--isolate-construction",
        ])
        .unwrap();
        if let Command::Run {
            group,
            verbose,
            format,
            strict_hooks,
            isolate_construction,
        } = cli.command
        {
            assert_eq!(group, "CommonTest");
            assert!(verbose);
            assert_eq!(format, OutputFormat::Json);
            assert!(strict_hooks);
            assert!(isolate_construction);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["trialrun", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["trialrun", "run", "--format", "tap"]).is_err());
    }

    #[test]
    fn test_run_config_from_flags() {
        assert_eq!(run_config(false, false), RunConfig::default());
        let strict = run_config(true, true);
        assert_eq!(strict.hook_failures, HookFailurePolicy::Surface);
        assert_eq!(strict.construction_failures, ConstructionPolicy::Isolate);
    }

    #[test]
    fn test_unknown_group_is_an_error() {
        let err = lookup("nope").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("unknown test group 'nope'"));
    }

    #[test]
    fn test_common_run_exits_with_failure() {
        let cli = Cli::try_parse_from(["trialrun", "run", "common"]).unwrap();
        assert_eq!(execute(cli).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn test_quiet_panics_returns_the_result() {
        let caught = quiet_panics(|| panic::catch_unwind(|| panic!("hidden")).is_err());
        assert!(caught);
        assert_eq!(quiet_panics(|| 7), 7);
    }

    #[test]
    fn test_structural_error_renders_diagnostic() {
        let err = CliError::from(StructuralError::DisabledWithoutTest {
            unit: "orphan".to_string(),
        });
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("orphan"));
    }
}
