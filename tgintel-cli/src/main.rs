// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `TgIntel` CLI - Telegram entity lookups from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Interactive menu
//! tgintel
//!
//! # Run every free lookup on a target
//! tgintel search @durov
//!
//! # Run one operation
//! tgintel run fetch_full_user username=durov
//!
//! # JSON output
//! tgintel --format json --pretty search durov
//!
//! # Monthly quota
//! tgintel usage
//!
//! # Configure a RapidAPI key
//! tgintel config set-key scraper
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tgintel_core::CoreError;
use tgintel_store::{DataPaths, LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, menu, operations, reset, run, search, usage};
use context::AppContext;

// ============================================================================
// CLI Definition
// ============================================================================

/// `TgIntel` CLI - quota-aware Telegram intelligence lookups.
#[derive(Parser)]
#[command(name = "tgintel")]
#[command(about = "Quota-aware Telegram intelligence lookups")]
#[command(long_about = r"
TgIntel looks up Telegram bots, channels and users across several APIs.

Providers:
  • BotsArchive (botsarchive)             free, no key
  • Telegram Channel API (channel)        free, RapidAPI key
  • Telegram Scraper API (scraper)        free search + 15 metered calls/month

Examples:
  tgintel                                 # Interactive menu
  tgintel search durov                    # All free lookups
  tgintel run fetch_entity username=durov # One operation
  tgintel operations --tier metered       # Catalog
  tgintel usage                           # Monthly quota
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, opens the interactive menu.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Directory holding credentials, usage and settings.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run every free lookup on one target.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Run a single operation.
    #[command(visible_alias = "r")]
    Run(run::RunArgs),

    /// List available operations.
    #[command(visible_alias = "ops")]
    Operations(operations::OperationsArgs),

    /// Show this month's metered usage.
    #[command(visible_alias = "u")]
    Usage,

    /// Reset a metered usage counter.
    Reset(reset::ResetArgs),

    /// Manage keys and settings.
    Config(config::ConfigArgs),

    /// Interactive menu (default).
    #[command(visible_alias = "m")]
    Menu,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Nothing succeeded, or a quota or credential gate was hit.
    NoResult = 2,
    /// Invalid input.
    InvalidInput = 3,
}

impl ExitCode {
    /// Exit code for a top-level error.
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CoreError>() {
            Some(e) if e.is_validation() || matches!(e, CoreError::UnknownProvider(_)) => {
                Self::InvalidInput
            }
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("tgintel=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("tgintel={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = cli
        .data_dir
        .as_deref()
        .map(DataPaths::new)
        .unwrap_or_default();
    let settings = SettingsStore::load(paths.settings()).await;
    setup_logging(cli.verbose, cli.quiet, settings.get().await.log_level);

    let code = match dispatch(&cli, paths, settings).await {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e}");
            }
            ExitCode::for_error(&e)
        }
    };

    std::process::exit(code as i32);
}

async fn dispatch(cli: &Cli, paths: DataPaths, settings: SettingsStore) -> Result<ExitCode> {
    let ctx = AppContext::open(paths, settings).await?;

    match &cli.command {
        Some(Commands::Search(args)) => search::run(args, &ctx, cli).await,
        Some(Commands::Run(args)) => run::run(args, &ctx, cli).await,
        Some(Commands::Operations(args)) => operations::run(args, &ctx, cli),
        Some(Commands::Usage) => usage::run(&ctx, cli).await,
        Some(Commands::Reset(args)) => reset::run(args, &ctx, cli).await,
        Some(Commands::Config(args)) => config::run(args, &ctx, cli).await,
        Some(Commands::Menu) | None => menu::run(&ctx, cli).await,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_pairs() {
        let cli = Cli::parse_from([
            "tgintel",
            "--format",
            "json",
            "run",
            "fetch_stories",
            "username=durov",
            "without_media=true",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.operation, "fetch_stories");
                assert_eq!(args.params.len(), 2);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::parse_from(["tgintel", "--data-dir", "/tmp/x"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_exit_code_for_errors() {
        let invalid = anyhow::Error::new(CoreError::UnknownOperation("x".to_string()));
        assert_eq!(ExitCode::for_error(&invalid), ExitCode::InvalidInput);

        let corrupt = anyhow::Error::new(CoreError::ConfigCorrupt {
            path: PathBuf::from("usage.json"),
            reason: "eof".to_string(),
        });
        assert_eq!(ExitCode::for_error(&corrupt), ExitCode::Error);

        let other = anyhow::anyhow!("boom");
        assert_eq!(ExitCode::for_error(&other), ExitCode::Error);
    }
}
