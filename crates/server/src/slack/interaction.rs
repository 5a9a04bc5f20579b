//! Parsing and validation of alert button interactions.
//!
//! An authenticated request body is form-encoded with a single `payload`
//! field holding JSON. Exactly one action from the alert response block is
//! accepted and mapped to a [`NotificationResult`].

use pagerbridge_core::{NotificationResult, SubjectKey};
use thiserror::Error;

use super::types::InteractionPayload;

/// Block ID of the actions block on alert messages.
pub const ALERT_RESPONSE_BLOCK_ID: &str = "block_alert_response";

/// Action ID of the Acknowledge button.
pub const ALERT_ACK_ACTION_ID: &str = "action_alert_ack";

/// Action ID of the Close button.
pub const ALERT_CLOSE_ACTION_ID: &str = "action_alert_close";

/// Form field carrying the JSON payload.
pub const PAYLOAD_FIELD: &str = "payload";

/// Errors from decoding or validating an interaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InteractionError {
    /// The form field is missing or does not hold the expected JSON.
    #[error("failed to decode payload: {0}")]
    Decode(String),

    /// The payload did not carry exactly one action.
    #[error("invalid value for 'payload': invalid payload")]
    WrongActionCount(usize),

    /// The action came from an unexpected block.
    #[error("invalid value for 'block_id': unknown block ID '{0}'")]
    UnknownBlockId(String),

    /// The action is not one of the alert buttons.
    #[error("invalid value for 'action_id': unknown action ID '{0}'")]
    UnknownActionId(String),
}

impl InteractionError {
    /// Name of the offending field, for validation failures.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Decode(_) => None,
            Self::WrongActionCount(_) => Some("payload"),
            Self::UnknownBlockId(_) => Some("block_id"),
            Self::UnknownActionId(_) => Some("action_id"),
        }
    }
}

/// A validated alert action, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    /// Outcome chosen by the user.
    pub result: NotificationResult,
    /// Opaque alert reference carried in the button value.
    pub callback_id: String,
    /// Channel the button was clicked in.
    pub channel_id: String,
    /// Slack user who clicked.
    pub user_id: String,
    /// Slack workspace of the user.
    pub team_id: String,
    /// URL for replying to the interaction.
    pub response_url: String,
}

impl AlertAction {
    /// Subject key identifying the clicking user to the delivery subsystem.
    #[must_use]
    pub fn subject(&self) -> SubjectKey {
        SubjectKey::slack(&self.team_id, self.user_id.clone())
    }
}

/// Map a button to its notification result.
///
/// Only actions from [`ALERT_RESPONSE_BLOCK_ID`] with one of the two alert
/// action IDs are recognized; there is no fallback.
///
/// # Errors
///
/// Returns [`InteractionError::UnknownBlockId`] or
/// [`InteractionError::UnknownActionId`] for anything else.
pub fn route_action(block_id: &str, action_id: &str) -> Result<NotificationResult, InteractionError> {
    if block_id != ALERT_RESPONSE_BLOCK_ID {
        return Err(InteractionError::UnknownBlockId(block_id.to_string()));
    }

    match action_id {
        ALERT_ACK_ACTION_ID => Ok(NotificationResult::Acknowledge),
        ALERT_CLOSE_ACTION_ID => Ok(NotificationResult::Resolve),
        other => Err(InteractionError::UnknownActionId(other.to_string())),
    }
}

/// Decode the `payload` form field from a raw request body.
///
/// # Errors
///
/// Returns [`InteractionError::Decode`] if the field is missing or is not a
/// valid interaction payload.
pub fn decode_payload(body: &[u8]) -> Result<InteractionPayload, InteractionError> {
    let raw = url::form_urlencoded::parse(body)
        .find(|(key, _)| key == PAYLOAD_FIELD)
        .map(|(_, value)| value)
        .ok_or_else(|| InteractionError::Decode(format!("missing '{PAYLOAD_FIELD}' field")))?;

    serde_json::from_str(&raw).map_err(|e| InteractionError::Decode(e.to_string()))
}

/// Validate a decoded payload into an [`AlertAction`].
///
/// # Errors
///
/// Returns a field error if the payload does not carry exactly one known
/// alert action.
pub fn validate_payload(payload: InteractionPayload) -> Result<AlertAction, InteractionError> {
    let InteractionPayload {
        response_url,
        channel,
        user,
        mut actions,
        ..
    } = payload;

    if actions.len() != 1 {
        return Err(InteractionError::WrongActionCount(actions.len()));
    }
    let action = actions
        .pop()
        .ok_or(InteractionError::WrongActionCount(0))?;

    let result = route_action(&action.block_id, &action.action_id)?;

    Ok(AlertAction {
        result,
        callback_id: action.value,
        channel_id: channel.id,
        user_id: user.id,
        team_id: user.team_id,
        response_url,
    })
}

/// Decode and validate an authenticated request body.
///
/// # Errors
///
/// See [`decode_payload`] and [`validate_payload`].
pub fn parse_alert_action(body: &[u8]) -> Result<AlertAction, InteractionError> {
    validate_payload(decode_payload(body)?)
}
