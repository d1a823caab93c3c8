//! HTTP client for the deployctl CLI
//!
//! Provides an authenticated HTTP client for the platform API. Every request
//! carries the bearer token and, when a team is active, the `teamId` query
//! parameter so the call runs under that team's scope.

use anyhow::{Context, Result};
use reqwest::{header::RETRY_AFTER, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use super::config::{ExecutionContext, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::ApiError;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the platform API (e.g., "https://api.deployctl.dev")
    pub api_url: String,

    /// Access token for authentication
    pub token: String,

    /// Team the requests are scoped to, if any
    pub current_team: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Log request and response bodies
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            current_team: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Bind a client configuration to an execution context
    pub fn from_context(context: &ExecutionContext, debug: bool) -> Self {
        Self {
            api_url: context.api_url.trim_end_matches('/').to_string(),
            token: context.token.clone(),
            current_team: context.current_team.clone(),
            timeout: context.timeout,
            debug,
        }
    }
}

/// Authenticated HTTP client for the platform API.
///
/// Owned by a single command invocation; release it with [`ApiClient::close`].
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        debug!(api_url = %config.api_url, team = ?config.current_team, "API client created");

        Ok(Self { client, config })
    }

    /// Team the client is scoped to
    pub fn current_team(&self) -> Option<&str> {
        self.config.current_team.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, &url).bearer_auth(&self.config.token);

        match &self.config.current_team {
            Some(team) => builder.query(&[("teamId", team)]),
            None => builder,
        }
    }

    /// Build a GET request with authentication
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    /// Build a POST request with authentication
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Build a PUT request with authentication
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    /// Send a GET request and deserialize the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.get(path).send().await?;

        self.handle_response(response).await
    }

    /// Send a POST request with JSON body and deserialize the response
    pub async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        self.trace_body(body);

        let response = self.post(path).json(body).send().await?;

        self.handle_response(response).await
    }

    /// Send a PUT request with JSON body and deserialize the response
    pub async fn put_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        self.trace_body(body);

        let response = self.put(path).json(body).send().await?;

        self.handle_response(response).await
    }

    /// Release the client. Pending connections are dropped with it.
    pub fn close(self) {
        debug!(api_url = %self.config.api_url, "API client closed");
    }

    fn trace_body<T: Serialize>(&self, body: &T) {
        if self.config.debug {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "<unable to serialize>".to_string());
            trace!("Request body:\n{}", body_json);
        }
    }

    /// Handle HTTP response, checking status and deserializing JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());

            let error_text =
                response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());

            if self.config.debug {
                debug!("Error response:\n{}", error_text);
            }

            return Err(parse_error(status.as_u16(), &error_text, retry_after));
        }

        let body = response.text().await?;

        if self.config.debug {
            debug!("Response body:\n{}", body);
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            context: format!("unexpected response body: {}", body),
            source,
        })
    }
}

/// Platform error envelope: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    domain: Option<String>,
}

fn parse_error(status: u16, text: &str, retry_after: Option<u64>) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(ErrorEnvelope { error }) => ApiError::Http {
            status,
            code: error.code,
            message: error.message.unwrap_or_else(|| text.to_string()),
            domain: error.domain,
            retry_after,
        },
        Err(_) => ApiError::Http {
            status,
            code: None,
            message: text.to_string(),
            domain: None,
            retry_after,
        },
    }
}
