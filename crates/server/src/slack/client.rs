//! Slack client for replying to interactions.
//!
//! Replies go to the interaction's `response_url`, which Slack authorizes by
//! URL alone; no bot token is needed.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::error::SlackError;
use super::types::{ResponseType, ResponseUrlMessage};

/// Posts a message visible only to one user.
#[async_trait]
pub trait EphemeralNotifier: Send + Sync {
    /// Post `text` to `user_id` in `channel_id` through `response_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the message could not be delivered.
    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        response_url: &str,
        text: &str,
    ) -> Result<(), SlackError>;
}

/// Slack client for interaction replies.
#[derive(Debug, Clone, Default)]
pub struct SlackClient {
    /// HTTP client.
    client: Client,
}

impl SlackClient {
    /// Create a new Slack client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client reusing an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Send a message to a `response_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Slack answers with a
    /// non-success status.
    #[instrument(skip(self, message), fields(channel = %message.channel))]
    pub async fn respond_to_url(
        &self,
        response_url: &str,
        message: &ResponseUrlMessage,
    ) -> Result<(), SlackError> {
        if response_url.is_empty() {
            return Err(SlackError::MissingResponseUrl);
        }

        let response = self
            .client
            .post(response_url)
            .json(message)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Response(format!(
                "Response URL returned {status}: {body}"
            )));
        }

        debug!("Responded to Slack response_url");

        Ok(())
    }
}

#[async_trait]
impl EphemeralNotifier for SlackClient {
    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        response_url: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        let message = ResponseUrlMessage {
            channel: channel_id.to_string(),
            user: user_id.to_string(),
            text: text.to_string(),
            response_type: ResponseType::Ephemeral,
            replace_original: false,
        };

        self.respond_to_url(response_url, &message).await
    }
}
