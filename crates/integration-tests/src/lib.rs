//! Integration tests for Pagerbridge.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pagerbridge-integration-tests
//! ```
//!
//! Tests drive the real router with `tower::ServiceExt::oneshot`. The
//! delivery subsystem and Slack are replaced by the recording fakes below,
//! so no network or database is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::Utc;
use pagerbridge_core::{NotificationResult, ReceiveError, SubjectKey, SubjectReceiver};
use pagerbridge_server::config::SlackConfig;
use pagerbridge_server::routes;
use pagerbridge_server::slack::{
    ALERT_RESPONSE_BLOCK_ID, EphemeralNotifier, PAYLOAD_FIELD, SIGNATURE_HEADER, SlackError,
    TIMESTAMP_HEADER, compute_signature,
};
use pagerbridge_server::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Signing secret shared by the app and the request builder.
pub const SIGNING_SECRET: &str = "Qm9x7#pLz2$wKv8!rTn4&yHc";

/// Path of the alert action endpoint.
pub const ACTION_PATH: &str = "/api/slack/actions";

/// A recorded delivery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCall {
    pub subject: SubjectKey,
    pub callback_id: String,
    pub result: NotificationResult,
}

/// Delivery fake returning a fixed outcome.
#[derive(Debug)]
pub struct FakeReceiver {
    outcome: Result<(), ReceiveError>,
    calls: Mutex<Vec<ReceivedCall>>,
}

impl FakeReceiver {
    #[must_use]
    pub fn new(outcome: Result<(), ReceiveError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Calls recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<ReceivedCall> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl SubjectReceiver for FakeReceiver {
    async fn receive_subject(
        &self,
        subject: &SubjectKey,
        callback_id: &str,
        result: NotificationResult,
    ) -> Result<(), ReceiveError> {
        self.calls.lock().expect("lock").push(ReceivedCall {
            subject: subject.clone(),
            callback_id: callback_id.to_string(),
            result,
        });
        self.outcome.clone()
    }
}

/// A recorded ephemeral notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub channel_id: String,
    pub user_id: String,
    pub response_url: String,
    pub text: String,
}

/// Notifier fake, optionally failing every post.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    fail: bool,
    notices: Mutex<Vec<Notice>>,
}

impl FakeNotifier {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Notices recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("lock").clone()
    }
}

#[async_trait]
impl EphemeralNotifier for FakeNotifier {
    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        response_url: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        self.notices.lock().expect("lock").push(Notice {
            channel_id: channel_id.to_string(),
            user_id: user_id.to_string(),
            response_url: response_url.to_string(),
            text: text.to_string(),
        });
        if self.fail {
            return Err(SlackError::Response("Response URL returned 404: expired".to_string()));
        }
        Ok(())
    }
}

/// Build the router with fake collaborators.
pub fn app(
    interactive_messages: bool,
    receiver: Arc<FakeReceiver>,
    notifier: Arc<FakeNotifier>,
) -> Router {
    let state = AppState::new(
        SlackConfig {
            signing_secret: SecretString::from(SIGNING_SECRET),
            interactive_messages,
        },
        receiver,
        notifier,
    );
    routes::routes().with_state(state)
}

/// JSON payload for a single alert button click.
#[must_use]
pub fn click_payload(action_id: &str, callback_id: &str) -> Value {
    payload_with_actions(&json!([{
        "type": "button",
        "block_id": ALERT_RESPONSE_BLOCK_ID,
        "action_id": action_id,
        "value": callback_id,
    }]))
}

/// JSON payload with an arbitrary actions array.
#[must_use]
pub fn payload_with_actions(actions: &Value) -> Value {
    json!({
        "type": "block_actions",
        "response_url": "https://hooks.slack.com/actions/T024BE7LD/1/xyz",
        "channel": {"id": "C0ALERTS"},
        "user": {"id": "U012AB3CD", "team_id": "T024BE7LD", "username": "oncall"},
        "actions": actions,
    })
}

/// Form-encode a payload.
#[must_use]
pub fn form_body(payload: &Value) -> Vec<u8> {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(PAYLOAD_FIELD, &payload.to_string())
        .finish()
        .into_bytes()
}

/// Build a POST to the action endpoint signed at `timestamp`.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn signed_request_at(body: Vec<u8>, timestamp: i64) -> Request<Body> {
    let timestamp = timestamp.to_string();
    let signature =
        compute_signature(SIGNING_SECRET.as_bytes(), &timestamp, &body).expect("hmac key");
    request_with_headers(body, Some(&timestamp), Some(&signature))
}

/// Build a POST to the action endpoint signed now.
#[must_use]
pub fn signed_request(body: Vec<u8>) -> Request<Body> {
    signed_request_at(body, Utc::now().timestamp())
}

/// Build a POST to the action endpoint with explicit headers.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn request_with_headers(
    body: Vec<u8>,
    timestamp: Option<&str>,
    signature: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::post(ACTION_PATH)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(timestamp) = timestamp {
        builder = builder.header(TIMESTAMP_HEADER, timestamp);
    }
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body)).expect("valid request")
}

/// Send a request and return status and body text.
///
/// # Panics
///
/// Panics if the router fails or the body is not UTF-8.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}
