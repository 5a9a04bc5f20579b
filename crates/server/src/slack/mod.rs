//! Slack integration for interactive alert messages.
//!
//! This module provides:
//! - Request signature verification ([`verify_request`])
//! - Interaction payload decoding and button routing ([`parse_alert_action`])
//! - [`SlackClient`] for replying to interactions
//!
//! # Flow
//!
//! 1. An alert notification with Acknowledge/Close buttons is posted to Slack
//! 2. A user clicks a button
//! 3. Webhook handler receives the interaction and verifies its signature
//! 4. The payload is validated and the button mapped to a result
//! 5. The result is handed to the delivery subsystem

mod client;
mod error;
pub mod interaction;
pub mod signature;
mod types;

pub use client::{EphemeralNotifier, SlackClient};
pub use error::SlackError;
pub use interaction::{
    ALERT_ACK_ACTION_ID, ALERT_CLOSE_ACTION_ID, ALERT_RESPONSE_BLOCK_ID, AlertAction,
    InteractionError, PAYLOAD_FIELD, parse_alert_action, route_action,
};
pub use signature::{
    AuthError, MAX_REQUEST_SKEW_SECS, SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_signature,
    verify_request,
};
pub use types::{
    InteractionAction, InteractionChannel, InteractionPayload, InteractionUser, ResponseType,
    ResponseUrlMessage,
};
