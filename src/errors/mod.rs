//! # Error Handling
//!
//! Error types shared by the API client and the certificate commands.
//! The CLI layer itself works in `anyhow::Result` and converts into these
//! only where a caller needs to branch on the failure kind.

pub mod types;

pub use types::{ApiError, CreationError};
