//! Application state shared across handlers.

use std::sync::Arc;

use pagerbridge_core::SubjectReceiver;

use crate::config::SlackConfig;
use crate::slack::EphemeralNotifier;

/// Application state shared across all handlers.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    slack: SlackConfig,
    receiver: Arc<dyn SubjectReceiver>,
    notifier: Arc<dyn EphemeralNotifier>,
}

impl AppState {
    /// Build the state from its collaborators.
    #[must_use]
    pub fn new(
        slack: SlackConfig,
        receiver: Arc<dyn SubjectReceiver>,
        notifier: Arc<dyn EphemeralNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                slack,
                receiver,
                notifier,
            }),
        }
    }

    /// Slack settings (signing secret, feature flag).
    #[must_use]
    pub fn slack(&self) -> &SlackConfig {
        &self.inner.slack
    }

    /// Delivery subsystem.
    #[must_use]
    pub fn receiver(&self) -> Arc<dyn SubjectReceiver> {
        Arc::clone(&self.inner.receiver)
    }

    /// Ephemeral notice sender.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn EphemeralNotifier> {
        Arc::clone(&self.inner.notifier)
    }
}
