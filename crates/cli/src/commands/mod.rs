//! CLI command implementations.

pub mod payload;
pub mod sign;

use thiserror::Error;

use pagerbridge_server::slack::AuthError;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Failed to read body: {0}")]
    Io(#[from] std::io::Error),
    #[error("Signature check failed: {0}")]
    Auth(#[from] AuthError),
    #[error("Failed to compute signature")]
    Signature,
}
