// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! EDHA CLI - the EDHA site client from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Program grid as HTML
//! edha programs
//!
//! # One program page
//! edha program --slug tech
//! edha program --page-url "https://edha.org/program.html?slug=tech"
//!
//! # Send the volunteer form
//! edha volunteer --field name=Awa --field email=awa@example.org
//!
//! # Send the partner form through the relay
//! edha partner --relay --field organisation=ONG
//!
//! # Resolved configuration as JSON
//! edha --format json config show
//! ```

mod commands;
mod output;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use edha_fetch::ConfigError;
use edha_site::SiteError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, form, program, programs};

// ============================================================================
// CLI Definition
// ============================================================================

/// EDHA CLI - programs, program pages and contact forms.
#[derive(Parser)]
#[command(name = "edha")]
#[command(about = "Client for the EDHA website")]
#[command(long_about = r#"
Loads the EDHA program grid and program pages from the backend API and
sends the volunteer and partner contact forms.

The API base is resolved once: --api-base, then EDHA_API, then the config
file; otherwise a localhost site uses http://localhost:5000/api and any
other site uses <site origin>/api.

Examples:
  edha programs                         # Program grid
  edha program --slug tech              # Program page
  edha volunteer --field name=Awa       # Volunteer form
  edha --format json programs           # View models as JSON
"#)]
#[command(version)]
#[command(author = "EDHA Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (html or json).
    #[arg(long, short = 'f', default_value = "html", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Backend API base, `/api` prefix included.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// URL of the site hosting the client.
    #[arg(long, global = true)]
    pub site_url: Option<String>,

    /// Request deadline in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the program grid.
    #[command(visible_alias = "p")]
    Programs,

    /// Show a program page.
    Program(program::ProgramArgs),

    /// Send the volunteer form.
    Volunteer(form::FormArgs),

    /// Send the partner form.
    Partner(form::FormArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// HTML fragments, as the pages render them.
    #[default]
    Html,
    /// View models as JSON.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Request, page or form failure.
    Error = 1,
    /// Configuration could not be resolved.
    ConfigError = 2,
    /// A request hit its deadline.
    Timeout = 3,
}

impl ExitCode {
    /// Exit code for a command that failed outright.
    pub fn for_error(err: &anyhow::Error) -> Self {
        let config = err.downcast_ref::<ConfigError>().is_some()
            || matches!(err.downcast_ref::<SiteError>(), Some(SiteError::Config(_)));
        if config { Self::ConfigError } else { Self::Error }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("edha=debug,info")
    } else {
        EnvFilter::new("edha=warn")
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
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Programs => programs::run(&cli).await,
        Commands::Program(args) => program::run(args, &cli).await,
        Commands::Volunteer(args) => form::run(edha_site::FormKind::Volunteer, args, &cli).await,
        Commands::Partner(args) => form::run(edha_site::FormKind::Partner, args, &cli).await,
        Commands::Config(args) => config::run(args, &cli),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::for_error(&e)
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }

    Ok(())
}
