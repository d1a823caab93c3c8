//! Certificate CLI commands
//!
//! Provides command-line interface for registering TLS certificates, either
//! uploaded from local files or issued by the platform for a list of common
//! names.

pub mod add;
pub mod cns;
pub mod create;
pub mod issue;

use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use tracing::info;

use super::client::ApiClient;
use super::config::ExecutionContext;
use super::output::{format_cns, Output, Stamp};
use super::scope::{get_scope, Scope};
use crate::errors::ApiError;
use create::{create_cert_for_cns, CertOutcome};

pub use add::{add, AddArgs, AddOptions};
pub use cns::parse_cns;
pub use issue::{issue, IssueArgs};

#[derive(Subcommand)]
pub enum CertCommands {
    /// Add a certificate from local files, or request one for common names
    #[command(
        long_about = "Register a TLS certificate with the account.\n\nEither upload an existing certificate, private key and CA bundle, or ask the platform to issue a certificate for one or more common names. Requesting by common name is being replaced by `certs issue`.",
        after_help = "EXAMPLES:\n    # Upload a custom certificate\n    deployctl certs add --crt domain.crt --key domain.key --ca ca.crt\n\n    # Request a certificate for two common names\n    deployctl certs add example.com,www.example.com"
    )]
    Add(AddArgs),

    /// Issue a certificate for one or more common names
    #[command(
        long_about = "Ask the platform to issue a certificate covering the given common names.\n\nThe platform solves the domain challenges; this can take a while.",
        after_help = "EXAMPLES:\n    # Issue a certificate for a domain and its www subdomain\n    deployctl certs issue example.com www.example.com\n\n    # Comma separated lists are accepted too\n    deployctl certs issue example.com,www.example.com --team acme"
    )]
    Issue(IssueArgs),
}

/// Handle certificate commands, returning the process exit code
pub async fn handle_certs_command(
    command: CertCommands,
    context: &ExecutionContext,
    output: &dyn Output,
) -> Result<i32> {
    match command {
        CertCommands::Add(args) => add(context, &args.options, &args.cns, output).await,
        CertCommands::Issue(args) => issue(context, &args, output).await,
    }
}

/// Outcome of a certificate command, consumed by the exit code mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Success,
    Failure(String),
}

impl CommandResult {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandResult::Success => 0,
            CommandResult::Failure(_) => 1,
        }
    }
}

fn fail(output: &dyn Output, message: impl Into<String>) -> CommandResult {
    let message = message.into();
    output.error(&message);
    CommandResult::Failure(message)
}

fn usage_error(output: &dyn Output, usage: &str) -> CommandResult {
    let result =
        fail(output, "Invalid number of arguments to create a custom certificate entry. Usage:");
    output.print(&format!("  {}\n", usage.cyan()));
    result
}

/// Resolve the scope, reporting authorization failures.
///
/// `Ok(Err(_))` carries an already reported failure; any other resolver
/// error is returned for the caller to propagate.
async fn resolve_scope(
    client: &ApiClient,
    output: &dyn Output,
) -> Result<std::result::Result<Scope, CommandResult>, ApiError> {
    match get_scope(client).await {
        Ok(scope) => Ok(Ok(scope)),
        Err(err) if err.is_authorization() => Ok(Err(fail(output, err.to_string()))),
        Err(err) => Err(err),
    }
}

/// Request a certificate for `cns` behind a spinner and report the outcome
async fn issue_for_cns(
    client: &ApiClient,
    cns: &[String],
    scope: &Scope,
    output: &dyn Output,
    stamp: &Stamp,
) -> Result<CommandResult> {
    let spinner =
        output.spinner(&format!("Generating a certificate for {}", format_cns(cns).bold()));
    let outcome = create_cert_for_cns(client, cns, &scope.context_name).await;
    spinner.stop();

    Ok(report_outcome(outcome?, output, stamp))
}

/// Report a creation outcome and turn it into a command result
fn report_outcome(outcome: CertOutcome, output: &dyn Output, stamp: &Stamp) -> CommandResult {
    match outcome {
        CertOutcome::Rejected(err) => fail(output, err.to_string()),
        CertOutcome::Created(cert) => {
            info!(cert_id = %cert.id, cns = ?cert.cns, "Certificate created");
            output.success(&format!(
                "Certificate entry for {} created {}",
                format_cns(&cert.cns).bold(),
                stamp.elapsed().bright_black()
            ));
            CommandResult::Success
        }
    }
}
