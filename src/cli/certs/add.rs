//! `certs add`
//!
//! Registers a certificate with the account in one of two modes:
//!
//! - **File mode** (`--crt`, `--key`, `--ca`): uploads existing certificate
//!   material. All three flags are required and no common names may be given.
//! - **CN mode** (positional common names): asks the platform to issue a
//!   certificate. Deprecated in favour of `certs issue`.

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::create::create_cert_from_files;
use super::{
    fail, issue_for_cns, parse_cns, report_outcome, resolve_scope, usage_error, CommandResult,
};
use crate::cli::client::{ApiClient, ClientConfig};
use crate::cli::config::ExecutionContext;
use crate::cli::output::{Output, Stamp};

/// Usage shown when file mode flags are incomplete or mixed with common names
pub const FILE_MODE_USAGE: &str =
    "deployctl certs add --crt <domain.crt> --key <domain.key> --ca <ca.crt>";

/// Usage shown when CN mode gets no common names
pub const CN_MODE_USAGE: &str = "deployctl certs add <cn>[,<cn>]";

/// Message reported for the removed overwrite option
pub const OVERWRITE_DEPRECATED: &str = "Overwrite option is deprecated";

#[derive(Args, Debug, Default, Clone)]
pub struct AddArgs {
    /// Common names to request a certificate for (comma separated lists accepted)
    #[arg(value_name = "CN")]
    pub cns: Vec<String>,

    #[command(flatten)]
    pub options: AddOptions,
}

#[derive(Args, Debug, Default, Clone)]
pub struct AddOptions {
    /// Overwrite an existing certificate (no longer supported)
    #[arg(long, hide = true)]
    pub overwrite: bool,

    /// Log API requests and responses
    #[arg(long)]
    pub debug: bool,

    /// Path to the certificate file
    #[arg(long, value_name = "FILE")]
    pub crt: Option<PathBuf>,

    /// Path to the private key file
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Path to the CA bundle file
    #[arg(long, value_name = "FILE")]
    pub ca: Option<PathBuf>,
}

impl AddOptions {
    /// Any certificate file flag selects file mode
    pub fn is_file_mode(&self) -> bool {
        self.crt.is_some() || self.key.is_some() || self.ca.is_some()
    }
}

/// Run `certs add` and return the process exit code.
///
/// Handled failures are reported through `output` and yield `1`. Errors the
/// command does not classify are returned as `Err`. The API client is closed
/// on every path.
pub async fn add(
    context: &ExecutionContext,
    options: &AddOptions,
    args: &[String],
    output: &dyn Output,
) -> Result<i32> {
    let stamp = Stamp::start();
    let client = ApiClient::new(ClientConfig::from_context(context, options.debug))?;

    let result = run(&client, options, args, output, &stamp).await;
    client.close();

    let result = result?;
    if let CommandResult::Failure(reason) = &result {
        debug!(reason = %reason, "certs add failed");
    }

    Ok(result.exit_code())
}

async fn run(
    client: &ApiClient,
    options: &AddOptions,
    args: &[String],
    output: &dyn Output,
    stamp: &Stamp,
) -> Result<CommandResult> {
    let scope = match resolve_scope(client, output).await? {
        Ok(scope) => scope,
        Err(failure) => return Ok(failure),
    };

    if options.overwrite {
        return Ok(fail(output, OVERWRITE_DEPRECATED));
    }

    if options.is_file_mode() {
        let (Some(crt), Some(key), Some(ca)) = (&options.crt, &options.key, &options.ca) else {
            return Ok(usage_error(output, FILE_MODE_USAGE));
        };
        if !args.is_empty() {
            return Ok(usage_error(output, FILE_MODE_USAGE));
        }

        info!(context = %scope.context_name, "Adding custom certificate");
        let outcome = create_cert_from_files(client, key, crt, ca, &scope.context_name).await?;
        return Ok(report_outcome(outcome, output, stamp));
    }

    output.warn(&format!(
        "{} will be soon deprecated. Please use {} instead",
        "deployctl certs add".cyan(),
        "deployctl certs issue <cn> <cns>".cyan()
    ));

    if args.is_empty() {
        return Ok(usage_error(output, CN_MODE_USAGE));
    }

    issue_for_cns(client, &parse_cns(args), &scope, output, stamp).await
}
