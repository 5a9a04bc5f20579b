//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when talking to Slack.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// Slack answered with a non-success status.
    #[error("Slack response error: {0}")]
    Response(String),

    /// The interaction did not include a response URL to reply to.
    #[error("Slack interaction has no response_url")]
    MissingResponseUrl,
}
