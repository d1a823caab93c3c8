//! `certs issue`: request a certificate for one or more common names

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{issue_for_cns, parse_cns, resolve_scope, usage_error, CommandResult};
use crate::cli::client::{ApiClient, ClientConfig};
use crate::cli::config::ExecutionContext;
use crate::cli::output::{Output, Stamp};

/// Usage shown when no common names are given
pub const ISSUE_USAGE: &str = "deployctl certs issue <cn> [<cn>...]";

#[derive(Args, Debug, Clone)]
pub struct IssueArgs {
    /// Common names the certificate should cover (comma separated lists accepted)
    #[arg(value_name = "CN", required = true)]
    pub cns: Vec<String>,

    /// Log API requests and responses
    #[arg(long)]
    pub debug: bool,
}

/// Run `certs issue` and return the process exit code
pub async fn issue(
    context: &ExecutionContext,
    args: &IssueArgs,
    output: &dyn Output,
) -> Result<i32> {
    let stamp = Stamp::start();
    let client = ApiClient::new(ClientConfig::from_context(context, args.debug))?;

    let result = run(&client, &args.cns, output, &stamp).await;
    client.close();

    let result = result?;
    if let CommandResult::Failure(reason) = &result {
        debug!(reason = %reason, "certs issue failed");
    }

    Ok(result.exit_code())
}

async fn run(
    client: &ApiClient,
    args: &[String],
    output: &dyn Output,
    stamp: &Stamp,
) -> Result<CommandResult> {
    let scope = match resolve_scope(client, output).await? {
        Ok(scope) => scope,
        Err(failure) => return Ok(failure),
    };

    if args.is_empty() {
        return Ok(usage_error(output, ISSUE_USAGE));
    }

    issue_for_cns(client, &parse_cns(args), &scope, output, stamp).await
}
