//! # Command Line Interface
//!
//! Provides the deployctl commands. Global flags resolve into an
//! [`config::ExecutionContext`] once per invocation; each command borrows it
//! to build its own API client.

pub mod certs;
pub mod client;
pub mod config;
pub mod output;
pub mod scope;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{ContextFlags, ExecutionContext};
use output::TerminalOutput;

#[derive(Parser)]
#[command(name = "deployctl")]
#[command(about = "Command line client for the deployment platform")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Access token for API authentication
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to file containing the access token
    #[arg(long, global = true)]
    pub token_file: Option<std::path::PathBuf>,

    /// Base URL for the platform API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Team to run the command as
    #[arg(long, global = true)]
    pub team: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Certificate management commands
    #[command(alias = "cert")]
    Certs {
        #[command(subcommand)]
        command: certs::CertCommands,
    },
}

impl Commands {
    fn debug_requested(&self) -> bool {
        match self {
            Commands::Certs { command: certs::CertCommands::Add(args) } => args.options.debug,
            Commands::Certs { command: certs::CertCommands::Issue(args) } => args.debug,
        }
    }
}

/// Run CLI commands, returning the process exit code
pub async fn run_cli() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose || cli.command.debug_requested())?;

    let context = ExecutionContext::resolve(ContextFlags {
        token: cli.token,
        token_file: cli.token_file,
        api_url: cli.api_url,
        team: cli.team,
        timeout: cli.timeout,
    })?;

    let output = TerminalOutput;

    match cli.command {
        Commands::Certs { command } => {
            certs::handle_certs_command(command, &context, &output).await
        }
    }
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
