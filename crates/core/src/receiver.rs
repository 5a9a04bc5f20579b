//! The delivery subsystem seam.
//!
//! Interactive messages only translate a button click into a
//! [`NotificationResult`]; resolving the subject, updating the alert and
//! fanning out status updates happens behind [`SubjectReceiver`].

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{NotificationResult, SubjectKey};

/// Errors returned by the delivery subsystem.
///
/// Three variants are distinguished so callers can recover from them:
/// [`ReceiveError::UnknownSubject`] and the two "already handled" variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReceiveError {
    /// The provider/subject pair is not linked to any user.
    #[error("unknown subject")]
    UnknownSubject,

    /// The alert was already acknowledged.
    #[error("alert is already acknowledged")]
    AlreadyAcknowledged,

    /// The alert was already closed.
    #[error("alert is already closed")]
    AlreadyClosed,

    /// The request was rejected as invalid for a specific field.
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        /// Name of the offending field.
        field: String,
        /// Human-readable reason.
        message: String,
    },

    /// Any other failure (transport, storage, unexpected response).
    #[error("delivery failed: {0}")]
    Other(String),
}

impl ReceiveError {
    /// Returns `true` for duplicate requests against an alert that is
    /// already in the requested (or a later) state.
    #[must_use]
    pub const fn is_already_handled(&self) -> bool {
        matches!(self, Self::AlreadyAcknowledged | Self::AlreadyClosed)
    }
}

/// Accepts a notification result on behalf of an external subject.
#[async_trait]
pub trait SubjectReceiver: Send + Sync {
    /// Record `result` for the alert referenced by `callback_id`, as issued
    /// by the user identified by `subject`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiveError`] describing why the result was not applied.
    async fn receive_subject(
        &self,
        subject: &SubjectKey,
        callback_id: &str,
        result: NotificationResult,
    ) -> Result<(), ReceiveError>;
}
