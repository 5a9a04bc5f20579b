//! Slack wire types for interactive alert messages.
//!
//! These types represent the subset of Slack's `block_actions` payload and
//! `response_url` message format used by alert action buttons.
//!
//! See: <https://api.slack.com/reference/interaction-payloads/block-actions>

use serde::{Deserialize, Serialize};

/// Slack interaction payload from a button click.
///
/// Slack sends many more fields; unknown fields are ignored. Absent fields
/// decode as empty so validation can name the offending field.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    /// Type of interaction (e.g. `block_actions`).
    #[serde(rename = "type", default)]
    pub interaction_type: String,
    /// Response URL for replying to the interaction.
    #[serde(default)]
    pub response_url: String,
    /// Channel where the interaction occurred.
    #[serde(default)]
    pub channel: InteractionChannel,
    /// User who triggered the interaction.
    #[serde(default)]
    pub user: InteractionUser,
    /// Actions that were triggered.
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
}

/// User who triggered an interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionUser {
    /// Slack user ID.
    #[serde(default)]
    pub id: String,
    /// Slack workspace (team) ID.
    #[serde(default)]
    pub team_id: String,
}

/// Channel where an interaction occurred.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionChannel {
    /// Channel ID.
    #[serde(default)]
    pub id: String,
}

/// Action that was triggered.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionAction {
    /// Action ID (set when creating the button).
    #[serde(default)]
    pub action_id: String,
    /// Block ID containing this action.
    #[serde(default)]
    pub block_id: String,
    /// Value attached to the button: the alert's callback ID.
    #[serde(default)]
    pub value: String,
}

/// Visibility of a message posted to a `response_url`.
///
/// Alert notices are only ever shown to the clicking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only the requesting user sees the message.
    Ephemeral,
}

/// Message posted to an interaction's `response_url`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseUrlMessage {
    /// Channel the interaction came from.
    pub channel: String,
    /// User the message is addressed to.
    pub user: String,
    /// Plain text body.
    pub text: String,
    /// Message visibility.
    pub response_type: ResponseType,
    /// Whether to replace the message containing the buttons.
    pub replace_original: bool,
}
