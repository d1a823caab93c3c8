//! # deployctl
//!
//! Command line client for the deployment platform. This crate carries the
//! certificate commands:
//!
//! - `certs add --crt <file> --key <file> --ca <file>` uploads an existing
//!   certificate, private key and CA bundle.
//! - `certs add <cn>[,<cn>]...` asks the platform to issue a certificate for
//!   the given common names (deprecated in favour of `certs issue`).
//! - `certs issue <cn> [<cn>...]` asks the platform to issue a certificate.
//!
//! ## Architecture
//!
//! ```text
//! clap flags → ExecutionContext → command → ApiClient → platform API
//!                                    ↓
//!                              Output sink (terminal / tests)
//! ```
//!
//! Commands return a process exit code. Expected failures (authorization,
//! usage, certificate rejections) are reported through the output sink and
//! yield `1`; anything else propagates as an error.

pub mod cli;
pub mod errors;

pub use errors::{ApiError, CreationError};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
