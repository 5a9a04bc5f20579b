//! Integration tests for the Slack alert action webhook.
//!
//! Each test sends a real HTTP request through the router and checks the
//! response together with what reached the delivery and Slack fakes.

use chrono::Utc;
use serde_json::json;

use pagerbridge_core::{NotificationResult, ReceiveError, SubjectKey};
use pagerbridge_integration_tests::{
    FakeNotifier, FakeReceiver, Notice, ReceivedCall, app, click_payload, form_body,
    payload_with_actions, request_with_headers, send, signed_request, signed_request_at,
};
use pagerbridge_server::services::UNLINKED_ACCOUNT_NOTICE;
use pagerbridge_server::slack::{ALERT_ACK_ACTION_ID, ALERT_CLOSE_ACTION_ID, ALERT_RESPONSE_BLOCK_ID};

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_ack_click_delivers_acknowledge() {
    let receiver = FakeReceiver::new(Ok(()));
    let notifier = FakeNotifier::new();
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1001"));

    let (status, text) = send(
        app(true, receiver.clone(), notifier.clone()),
        signed_request(body),
    )
    .await;

    assert_eq!(status, 200);
    assert!(text.is_empty(), "success has an empty body");
    assert_eq!(
        receiver.calls(),
        vec![ReceivedCall {
            subject: SubjectKey::slack("T024BE7LD", "U012AB3CD"),
            callback_id: "alert-1001".to_string(),
            result: NotificationResult::Acknowledge,
        }]
    );
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_close_click_delivers_resolve() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_CLOSE_ACTION_ID, "alert-1002"));

    let (status, _) = send(app(true, receiver.clone(), FakeNotifier::new()), signed_request(body)).await;

    assert_eq!(status, 200);
    let calls = receiver.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls.first().map(|c| c.result),
        Some(NotificationResult::Resolve)
    );
    assert_eq!(calls.first().map(|c| c.subject.provider_id()), Some("slack:T024BE7LD"));
}

// =============================================================================
// Feature flag
// =============================================================================

#[tokio::test]
async fn test_disabled_returns_not_found_before_auth() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));

    // Unsigned on purpose: the flag is checked first.
    let (status, _) = send(
        app(false, receiver.clone(), FakeNotifier::new()),
        request_with_headers(body, None, None),
    )
    .await;

    assert_eq!(status, 404);
    assert!(receiver.calls().is_empty());
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));
    let timestamp = Utc::now().timestamp().to_string();

    let (status, text) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        request_with_headers(body, Some(&timestamp), Some("v0=deadbeef")),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(text, "invalid signature");
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_missing_headers_are_rejected() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));

    let (status, text) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        request_with_headers(body, None, None),
    )
    .await;

    assert_eq!(status, 400);
    assert!(text.contains("timestamp"), "got {text}");
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_signature_over_different_bytes_is_rejected() {
    // Same payload, different form encoding: the signature covers raw bytes.
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));
    let request = signed_request(body.clone());
    let (parts, _) = request.into_parts();

    let mut reencoded = body;
    reencoded.extend_from_slice(b"&extra=1");
    let request = axum::http::Request::from_parts(parts, axum::body::Body::from(reencoded));

    let (status, _) = send(app(true, receiver.clone(), FakeNotifier::new()), request).await;

    assert_eq!(status, 400);
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_replay_after_window_is_stale() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));
    let captured_at = Utc::now().timestamp() - 6 * 60;

    let (status, text) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        signed_request_at(body, captured_at),
    )
    .await;

    assert_eq!(status, 400);
    assert!(text.starts_with("timestamp too old"), "got {text}");
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_recent_request_inside_window_is_accepted() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-1"));
    let signed_at = Utc::now().timestamp() - 4 * 60;

    let (status, _) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        signed_request_at(body, signed_at),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(receiver.calls().len(), 1);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_two_actions_rejected_on_payload_field() {
    let receiver = FakeReceiver::new(Ok(()));
    let action = json!({
        "block_id": ALERT_RESPONSE_BLOCK_ID,
        "action_id": ALERT_ACK_ACTION_ID,
        "value": "alert-1",
    });
    let body = form_body(&payload_with_actions(&json!([action.clone(), action])));

    let (status, text) = send(app(true, receiver.clone(), FakeNotifier::new()), signed_request(body)).await;

    assert_eq!(status, 400);
    assert_eq!(text, "invalid value for 'payload': invalid payload");
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_no_actions_rejected_on_payload_field() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&payload_with_actions(&json!([])));

    let (status, text) = send(app(true, receiver.clone(), FakeNotifier::new()), signed_request(body)).await;

    assert_eq!(status, 400);
    assert!(text.contains("'payload'"));
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_missing_actions_key_rejected_on_payload_field() {
    let receiver = FakeReceiver::new(Ok(()));
    let payload = json!({
        "type": "block_actions",
        "channel": {"id": "C0ALERTS"},
        "user": {"id": "U012AB3CD", "team_id": "T024BE7LD"},
    });

    let (status, text) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        signed_request(form_body(&payload)),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(text, "invalid value for 'payload': invalid payload");
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_block_rejected_with_value() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&payload_with_actions(&json!([{
        "block_id": "block_incident_links",
        "action_id": ALERT_ACK_ACTION_ID,
        "value": "alert-1",
    }])));

    let (status, text) = send(app(true, receiver.clone(), FakeNotifier::new()), signed_request(body)).await;

    assert_eq!(status, 400);
    assert_eq!(
        text,
        "invalid value for 'block_id': unknown block ID 'block_incident_links'"
    );
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_action_rejected_with_value() {
    let receiver = FakeReceiver::new(Ok(()));
    let body = form_body(&click_payload("action_alert_escalate", "alert-1"));

    let (status, text) = send(app(true, receiver.clone(), FakeNotifier::new()), signed_request(body)).await;

    assert_eq!(status, 400);
    assert_eq!(
        text,
        "invalid value for 'action_id': unknown action ID 'action_alert_escalate'"
    );
    assert!(receiver.calls().is_empty());
}

#[tokio::test]
async fn test_signed_garbage_is_decode_error() {
    let receiver = FakeReceiver::new(Ok(()));

    let (status, text) = send(
        app(true, receiver.clone(), FakeNotifier::new()),
        signed_request(b"payload=%7B%22type%22".to_vec()),
    )
    .await;

    assert_eq!(status, 400);
    assert!(text.starts_with("failed to decode payload"), "got {text}");
    assert!(receiver.calls().is_empty());
}

// =============================================================================
// Dispatch outcomes
// =============================================================================

#[tokio::test]
async fn test_duplicate_clicks_succeed_without_notice() {
    for outcome in [ReceiveError::AlreadyAcknowledged, ReceiveError::AlreadyClosed] {
        let receiver = FakeReceiver::new(Err(outcome));
        let notifier = FakeNotifier::new();
        let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-7"));

        let (status, text) = send(app(true, receiver.clone(), notifier.clone()), signed_request(body)).await;

        assert_eq!(status, 200);
        assert!(text.is_empty());
        assert_eq!(receiver.calls().len(), 1);
        assert!(notifier.notices().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_subject_sends_one_notice() {
    let receiver = FakeReceiver::new(Err(ReceiveError::UnknownSubject));
    let notifier = FakeNotifier::new();
    let body = form_body(&click_payload(ALERT_CLOSE_ACTION_ID, "alert-8"));

    let (status, _) = send(app(true, receiver, notifier.clone()), signed_request(body)).await;

    assert_eq!(status, 200);
    assert_eq!(
        notifier.notices(),
        vec![Notice {
            channel_id: "C0ALERTS".to_string(),
            user_id: "U012AB3CD".to_string(),
            response_url: "https://hooks.slack.com/actions/T024BE7LD/1/xyz".to_string(),
            text: UNLINKED_ACCOUNT_NOTICE.to_string(),
        }]
    );
}

#[tokio::test]
async fn test_unknown_subject_notice_failure_fails_request() {
    let receiver = FakeReceiver::new(Err(ReceiveError::UnknownSubject));
    let notifier = FakeNotifier::failing();
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-9"));

    let (status, text) = send(app(true, receiver, notifier.clone()), signed_request(body)).await;

    assert!(status.is_server_error());
    assert_eq!(text, "External service error");
    assert_eq!(notifier.notices().len(), 1, "the notice is attempted exactly once");
}

#[tokio::test]
async fn test_delivery_field_error_is_bad_request() {
    let receiver = FakeReceiver::new(Err(ReceiveError::Invalid {
        field: "callback_id".to_string(),
        message: "alert does not exist".to_string(),
    }));
    let notifier = FakeNotifier::new();
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-404"));

    let (status, text) = send(app(true, receiver, notifier.clone()), signed_request(body)).await;

    assert_eq!(status, 400);
    assert_eq!(text, "invalid value for 'callback_id': alert does not exist");
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_is_internal_error() {
    let receiver = FakeReceiver::new(Err(ReceiveError::Other("storage unavailable".to_string())));
    let notifier = FakeNotifier::new();
    let body = form_body(&click_payload(ALERT_ACK_ACTION_ID, "alert-10"));

    let (status, text) = send(app(true, receiver, notifier.clone()), signed_request(body)).await;

    assert_eq!(status, 500);
    assert_eq!(text, "Internal server error");
    assert!(notifier.notices().is_empty());
}
