//! HTTP client for the notification delivery subsystem.
//!
//! Results are POSTed as JSON to a single endpoint. The response status
//! selects the outcome:
//!
//! | Status        | Outcome                                              |
//! |---------------|------------------------------------------------------|
//! | 2xx           | accepted                                             |
//! | 404           | [`ReceiveError::UnknownSubject`]                     |
//! | 409           | `code` selects already acknowledged / already closed |
//! | 400, 422      | [`ReceiveError::Invalid`] with `field` / `message`   |
//! | anything else | [`ReceiveError::Other`]                              |

use async_trait::async_trait;
use pagerbridge_core::{NotificationResult, ReceiveError, SubjectKey, SubjectReceiver};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::DeliveryConfig;

/// Error code for a result against an acknowledged alert.
pub const CODE_ALREADY_ACKNOWLEDGED: &str = "already_acknowledged";

/// Error code for a result against a closed alert.
pub const CODE_ALREADY_CLOSED: &str = "already_closed";

/// Request body sent to the delivery endpoint.
#[derive(Debug, Serialize)]
struct SubjectResultRequest<'a> {
    provider_id: &'a str,
    subject_id: &'a str,
    callback_id: &'a str,
    result: NotificationResult,
}

/// Error body returned by the delivery endpoint.
#[derive(Debug, Default, Deserialize)]
struct DeliveryErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`SubjectReceiver`] backed by an HTTP endpoint.
#[derive(Clone)]
pub struct HttpSubjectReceiver {
    client: Client,
    url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for HttpSubjectReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSubjectReceiver")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpSubjectReceiver {
    /// Create a receiver for the configured endpoint.
    #[must_use]
    pub fn new(client: Client, config: &DeliveryConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl SubjectReceiver for HttpSubjectReceiver {
    #[instrument(skip(self, subject), fields(subject = %subject))]
    async fn receive_subject(
        &self,
        subject: &SubjectKey,
        callback_id: &str,
        result: NotificationResult,
    ) -> Result<(), ReceiveError> {
        let body = SubjectResultRequest {
            provider_id: subject.provider_id(),
            subject_id: subject.subject_id(),
            callback_id,
            result,
        };

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReceiveError::Other(format!("delivery request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Result accepted by delivery subsystem");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let error_body: DeliveryErrorBody = serde_json::from_str(&text).unwrap_or_default();

        Err(classify_error(status, error_body, &text))
    }
}

/// Map an error response to a [`ReceiveError`].
fn classify_error(status: StatusCode, body: DeliveryErrorBody, raw: &str) -> ReceiveError {
    match status {
        StatusCode::NOT_FOUND => ReceiveError::UnknownSubject,
        StatusCode::CONFLICT => match body.code.as_deref() {
            Some(CODE_ALREADY_ACKNOWLEDGED) => ReceiveError::AlreadyAcknowledged,
            Some(CODE_ALREADY_CLOSED) => ReceiveError::AlreadyClosed,
            _ => ReceiveError::Other(format!("delivery endpoint returned {status}: {raw}")),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ReceiveError::Invalid {
            field: body.field.unwrap_or_else(|| "callback_id".to_string()),
            message: body.message.unwrap_or_else(|| "invalid request".to_string()),
        },
        _ => ReceiveError::Other(format!("delivery endpoint returned {status}: {raw}")),
    }
}
