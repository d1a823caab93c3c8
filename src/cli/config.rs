//! Configuration file handling for the deployctl CLI
//!
//! Loads CLI configuration from ~/.deployctl/config.toml
//! and resolving the per-invocation [`ExecutionContext`] from flags, the
//! config file and the environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Platform API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.deployctl.dev";

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TOKEN_ENV: &str = "DEPLOYCTL_TOKEN";
const API_URL_ENV: &str = "DEPLOYCTL_API_URL";
const TEAM_ENV: &str = "DEPLOYCTL_TEAM";

/// CLI configuration stored in ~/.deployctl/config.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Access token
    pub token: Option<String>,

    /// Base URL for the platform API
    pub api_url: Option<String>,

    /// Team selected as the active scope
    pub current_team: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.deployctl/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".deployctl");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path. A missing file is an empty config.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Global flags that feed the execution context
#[derive(Debug, Clone, Default)]
pub struct ContextFlags {
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub api_url: Option<String>,
    pub team: Option<String>,
    pub timeout: Option<u64>,
}

/// Immutable per-invocation bundle of credentials and endpoint settings.
///
/// Built once before a command runs; commands only borrow it.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub token: String,
    pub current_team: Option<String>,
    pub api_url: String,
    pub timeout: u64,
}

impl ExecutionContext {
    /// Resolve the context from flags, ~/.deployctl/config.toml and the environment
    pub fn resolve(flags: ContextFlags) -> Result<Self> {
        let config = CliConfig::load().unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring unreadable CLI configuration");
            CliConfig::default()
        });

        Self::resolve_with(flags, &config)
    }

    /// Resolve the context against an already loaded configuration
    pub fn resolve_with(flags: ContextFlags, config: &CliConfig) -> Result<Self> {
        Ok(Self {
            token: resolve_token(flags.token, flags.token_file, config)?,
            current_team: resolve_team(flags.team, config),
            api_url: resolve_api_url(flags.api_url, config),
            timeout: resolve_timeout(flags.timeout, config),
        })
    }
}

/// Resolve the authentication token from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --token command line flag
/// 2. --token-file command line flag
/// 3. ~/.deployctl/config.toml
/// 4. DEPLOYCTL_TOKEN environment variable
pub fn resolve_token(
    token_flag: Option<String>,
    token_file_flag: Option<PathBuf>,
    config: &CliConfig,
) -> Result<String> {
    if let Some(token) = token_flag {
        debug!("Using token from --token flag");
        return Ok(token);
    }

    if let Some(token_file) = token_file_flag {
        debug!("Reading token from file: {}", token_file.display());
        let token = std::fs::read_to_string(&token_file)
            .with_context(|| format!("Failed to read token file: {}", token_file.display()))?
            .trim()
            .to_string();

        if token.is_empty() {
            anyhow::bail!("Token file is empty: {}", token_file.display());
        }

        return Ok(token);
    }

    if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
        debug!("Using token from config file");
        return Ok(token.to_string());
    }

    if let Some(token) = non_empty_env(TOKEN_ENV) {
        debug!("Using token from {} environment variable", TOKEN_ENV);
        return Ok(token);
    }

    anyhow::bail!(
        "No authentication token found. Please provide a token via:\n\
         - --token flag\n\
         - --token-file flag\n\
         - ~/.deployctl/config.toml\n\
         - {} environment variable",
        TOKEN_ENV
    )
}

/// Resolve the base URL: --api-url, config file, DEPLOYCTL_API_URL, default
pub fn resolve_api_url(api_url_flag: Option<String>, config: &CliConfig) -> String {
    if let Some(url) = api_url_flag {
        debug!("Using API URL from --api-url flag: {}", url);
        return url;
    }

    if let Some(url) = config.api_url.as_deref().filter(|u| !u.is_empty()) {
        debug!("Using API URL from config file: {}", url);
        return url.to_string();
    }

    if let Some(url) = non_empty_env(API_URL_ENV) {
        debug!("Using API URL from {} environment variable: {}", API_URL_ENV, url);
        return url;
    }

    debug!("Using default API URL: {}", DEFAULT_API_URL);
    DEFAULT_API_URL.to_string()
}

/// Resolve the active team: --team, config file, DEPLOYCTL_TEAM. None means the personal account.
pub fn resolve_team(team_flag: Option<String>, config: &CliConfig) -> Option<String> {
    if let Some(team) = team_flag {
        return Some(team);
    }

    config
        .current_team
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| non_empty_env(TEAM_ENV))
}

/// Resolve the timeout: --timeout, config file, default
pub fn resolve_timeout(timeout_flag: Option<u64>, config: &CliConfig) -> u64 {
    timeout_flag.or(config.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
