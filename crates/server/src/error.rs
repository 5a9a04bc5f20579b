//! Unified error handling for the webhook server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagerbridge_core::ReceiveError;
use thiserror::Error;

use crate::slack::{AuthError, InteractionError, SlackError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed signature or timestamp checks.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Interaction payload could not be decoded or validated.
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    /// Delivery subsystem rejected the result.
    #[error("Delivery error: {0}")]
    Delivery(ReceiveError),

    /// Slack API operation failed.
    #[error("Slack error: {0}")]
    Slack(#[from] SlackError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<ReceiveError> for AppError {
    fn from(err: ReceiveError) -> Self {
        Self::Delivery(err)
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) | Self::Interaction(_) | Self::Delivery(ReceiveError::Invalid { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Slack(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Webhook request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Delivery(err @ ReceiveError::Invalid { .. }) => err.to_string(),
            Self::Delivery(_) => "Internal server error".to_string(),
            Self::Slack(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
