//! Build form-encoded interaction bodies for manual testing.
//!
//! # Usage
//!
//! ```bash
//! pb-cli payload --button ack --callback-id 42 --team T1 --user U1 \
//!     --channel C1 --response-url https://hooks.slack.com/actions/T1/1/abc > body.txt
//! pb-cli sign --body body.txt
//! ```

use clap::ValueEnum;
use pagerbridge_server::slack::{
    ALERT_ACK_ACTION_ID, ALERT_CLOSE_ACTION_ID, ALERT_RESPONSE_BLOCK_ID, PAYLOAD_FIELD,
};
use serde_json::json;

/// Alert message button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Button {
    /// Acknowledge the alert
    Ack,
    /// Close the alert
    Close,
}

impl Button {
    const fn action_id(self) -> &'static str {
        match self {
            Self::Ack => ALERT_ACK_ACTION_ID,
            Self::Close => ALERT_CLOSE_ACTION_ID,
        }
    }
}

/// Fields of a simulated button click.
#[derive(Debug, Clone)]
pub struct ClickParams {
    pub button: Button,
    pub callback_id: String,
    pub team_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub response_url: String,
}

/// Build the form-encoded body Slack would send for a click.
#[must_use]
pub fn build_body(params: &ClickParams) -> String {
    let payload = json!({
        "type": "block_actions",
        "response_url": params.response_url,
        "channel": {"id": params.channel_id},
        "user": {"id": params.user_id, "team_id": params.team_id},
        "actions": [{
            "type": "button",
            "block_id": ALERT_RESPONSE_BLOCK_ID,
            "action_id": params.button.action_id(),
            "value": params.callback_id,
        }],
    });

    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(PAYLOAD_FIELD, &payload.to_string())
        .finish()
}

/// Print a click body to stdout.
#[allow(clippy::print_stdout)] // The body is the command's output
pub fn print(params: &ClickParams) {
    print!("{}", build_body(params));
}
