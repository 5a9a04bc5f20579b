//! Slack webhook handler for alert action buttons.
//!
//! Handles Acknowledge/Close clicks on alert notifications.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::error::AppError;
use crate::services::DispatchService;
use crate::slack::{SIGNATURE_HEADER, TIMESTAMP_HEADER, parse_alert_action, verify_request};
use crate::state::AppState;

/// Path Slack posts interactions to.
pub const MESSAGE_ACTION_PATH: &str = "/api/slack/actions";

/// Create Slack webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route(MESSAGE_ACTION_PATH, post(handle_message_action))
}

/// Handle a Slack alert action.
///
/// The body is read once into `body`; the same bytes are verified against
/// the signature and then decoded. Returns 200 with an empty body on
/// success, including duplicate clicks.
#[instrument(skip_all)]
async fn handle_message_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let config = state.slack();
    if !config.interactive_messages {
        return Err(AppError::NotFound("not enabled".into()));
    }

    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    verify_request(
        &config.signing_secret,
        timestamp,
        signature,
        &body,
        Utc::now(),
    )
    .inspect_err(|e| warn!(error = %e, "Rejected Slack request"))?;

    let action = parse_alert_action(&body)
        .inspect_err(|e| warn!(error = %e, "Invalid Slack interaction"))?;

    let outcome = DispatchService::new(state.receiver(), state.notifier())
        .dispatch(&action)
        .await?;

    debug!(?outcome, "Alert action handled");

    Ok(StatusCode::OK)
}

/// Read a header as a string, treating non-ASCII values as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
