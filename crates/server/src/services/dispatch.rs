//! Dispatch of validated alert actions to the delivery subsystem.
//!
//! Two delivery errors are handled here rather than surfaced:
//! - Unknown subject: the clicking user gets a private notice that their
//!   Slack account is not linked. Only a failure to post that notice fails
//!   the request.
//! - Already acknowledged / already closed: duplicate clicks succeed
//!   silently.

use std::sync::Arc;

use pagerbridge_core::{ReceiveError, SubjectReceiver};
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::slack::{AlertAction, EphemeralNotifier};

/// Notice sent to users whose Slack account is not linked.
pub const UNLINKED_ACCOUNT_NOTICE: &str = "Your Slack account isn't currently linked to Pagerbridge, the admin will need to set this up for it to work.";

/// How a dispatched action was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The delivery subsystem accepted the result.
    Delivered,
    /// The alert was already in the requested state.
    AlreadyHandled,
    /// The user is unknown and was told so.
    UnlinkedUserNotified,
}

/// Dispatch service for alert actions.
pub struct DispatchService {
    receiver: Arc<dyn SubjectReceiver>,
    notifier: Arc<dyn EphemeralNotifier>,
}

impl DispatchService {
    /// Create a new dispatch service.
    #[must_use]
    pub fn new(receiver: Arc<dyn SubjectReceiver>, notifier: Arc<dyn EphemeralNotifier>) -> Self {
        Self { receiver, notifier }
    }

    /// Hand a validated action to the delivery subsystem.
    ///
    /// Nothing is retried; a failure is reported once.
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails for any reason other than an unknown
    /// subject or a duplicate action, or if the unlinked-account notice
    /// cannot be posted.
    #[instrument(
        skip(self, action),
        fields(
            result = %action.result,
            callback_id = %action.callback_id,
            team_id = %action.team_id,
            user_id = %action.user_id,
        )
    )]
    pub async fn dispatch(&self, action: &AlertAction) -> Result<DispatchOutcome, AppError> {
        let subject = action.subject();

        match self
            .receiver
            .receive_subject(&subject, &action.callback_id, action.result)
            .await
        {
            Ok(()) => {
                info!("Alert action delivered");
                Ok(DispatchOutcome::Delivered)
            }
            Err(ReceiveError::UnknownSubject) => {
                warn!(
                    subject = %subject,
                    "unknown provider/subject ID for Slack '{subject}'"
                );
                self.notify_unlinked(action).await?;
                Ok(DispatchOutcome::UnlinkedUserNotified)
            }
            Err(err) if err.is_already_handled() => {
                debug!(reason = %err, "Ignoring duplicate alert action");
                Ok(DispatchOutcome::AlreadyHandled)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Tell the clicking user their account is not linked.
    async fn notify_unlinked(&self, action: &AlertAction) -> Result<(), AppError> {
        self.notifier
            .post_ephemeral(
                &action.channel_id,
                &action.user_id,
                &action.response_url,
                UNLINKED_ACCOUNT_NOTICE,
            )
            .await?;

        debug!("Posted unlinked-account notice");

        Ok(())
    }
}
