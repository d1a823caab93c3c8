//! # Error Types
//!
//! Error types for the deployctl client using `thiserror`.
//!
//! Two families live here. [`ApiError`] covers everything that can go wrong
//! while talking to the platform API; the certificate commands only handle
//! its authorization variants and let the rest propagate. [`CreationError`]
//! is the expected, user-facing rejection of a certificate request and is
//! carried as a value, never raised.

use std::path::PathBuf;

/// Errors raised by the platform API client
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The token was rejected, or does not grant access to the active team
    #[error("{message}")]
    NotAuthorized { message: String },

    /// The active team no longer exists
    #[error("{message}")]
    TeamDeleted { message: String },

    /// Any other non-success HTTP response
    #[error("HTTP request failed with status {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
        domain: Option<String>,
        retry_after: Option<u64>,
    },

    /// Connection, TLS or timeout failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body could not be decoded
    #[error("Failed to decode response: {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Create a not-authorized error
    pub fn not_authorized<S: Into<String>>(message: S) -> Self {
        Self::NotAuthorized { message: message.into() }
    }

    /// Create the error reported when the active team is gone
    pub fn team_deleted(team_id: &str) -> Self {
        Self::TeamDeleted {
            message: format!(
                "Your team \"{}\" was deleted. Switch to a different one with --team or update ~/.deployctl/config.toml",
                team_id
            ),
        }
    }

    /// Create an HTTP error without platform error details
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Http { status, code: None, message: message.into(), domain: None, retry_after: None }
    }

    /// HTTP status of the failed response, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Platform error code, if the response carried one
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the command layer reports this error instead of propagating it
    pub fn is_authorization(&self) -> bool {
        matches!(self, ApiError::NotAuthorized { .. } | ApiError::TeamDeleted { .. })
    }
}

/// Expected reasons a certificate could not be created
#[derive(thiserror::Error, Debug)]
pub enum CreationError {
    #[error("We could not solve the challenge for domain {domain}: {message}")]
    CantSolveChallenge { domain: String, message: String },

    #[error("The domain {domain} is not configured correctly: {message}")]
    DomainConfiguration { domain: String, message: String },

    #[error("You don't have permissions over domain {domain} under {context}.")]
    DomainPermission { domain: String, context: String },

    #[error("All common names should share the same root domain: {}", .domains.join(", "))]
    DomainsShouldShareRoot { domains: Vec<String> },

    #[error("Wildcard certificates are not allowed for {domain}.")]
    WildcardNotAllowed { domain: String },

    #[error("The domain {domain} is not a valid common name.")]
    InvalidDomain { domain: String },

    #[error("Too many certificate requests.{}", retry_hint(.retry_after))]
    TooManyRequests { retry_after: Option<u64> },

    #[error("There is a validation in course for {domain}. Wait until it finishes.")]
    ValidationRunning { domain: String },

    #[error("The provided certificate is not valid: {message}")]
    InvalidCert { message: String },

    #[error("The specified file \"{}\" doesn't exist.", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read \"{}\": {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(seconds) => format!(" Try again in {}s.", seconds),
        None => " Try again later.".to_string(),
    }
}

impl CreationError {
    /// Classify a platform rejection of a certificate request.
    ///
    /// Returns `None` for failures that are not a known certificate
    /// rejection; callers treat those as fatal.
    pub fn from_api(err: &ApiError, cns: &[String], context: &str) -> Option<Self> {
        let ApiError::Http { code: Some(code), message, domain, retry_after, .. } = err else {
            return None;
        };

        let domain = domain.clone().or_else(|| cns.first().cloned()).unwrap_or_default();
        let message = message.clone();

        let classified = match code.as_str() {
            "cant_solve_challenge" => Self::CantSolveChallenge { domain, message },
            "configuration_error" => Self::DomainConfiguration { domain, message },
            "domain_permission" | "forbidden" => {
                Self::DomainPermission { domain, context: context.to_string() }
            }
            "should_share_root_domain" => Self::DomainsShouldShareRoot { domains: cns.to_vec() },
            "wildcard_not_allowed" => Self::WildcardNotAllowed { domain },
            "invalid_domain" | "invalid_wildcard_domain" => Self::InvalidDomain { domain },
            "too_many_requests" | "rate_limited" => {
                Self::TooManyRequests { retry_after: *retry_after }
            }
            "validation_running" => Self::ValidationRunning { domain },
            "bad_cert" | "invalid_cert" => Self::InvalidCert { message },
            _ => return None,
        };

        Some(classified)
    }
}
