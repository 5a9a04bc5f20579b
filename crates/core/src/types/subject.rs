//! Provider-qualified subject identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix used for Slack provider IDs (`slack:<team_id>`).
pub const SLACK_PROVIDER_PREFIX: &str = "slack:";

/// Identifies a person in an external system.
///
/// The delivery subsystem resolves this key to an internal user. The key is
/// never persisted here; it only travels with a single request.
///
/// ## Examples
///
/// ```
/// use pagerbridge_core::SubjectKey;
///
/// let key = SubjectKey::slack("T024BE7LD", "U012AB3CD");
/// assert_eq!(key.provider_id(), "slack:T024BE7LD");
/// assert_eq!(key.subject_id(), "U012AB3CD");
/// assert_eq!(key.to_string(), "slack:T024BE7LD/U012AB3CD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectKey {
    provider_id: String,
    subject_id: String,
}

impl SubjectKey {
    /// Create a key from an already-qualified provider ID.
    #[must_use]
    pub fn new(provider_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            subject_id: subject_id.into(),
        }
    }

    /// Create a key for a Slack user within a workspace.
    #[must_use]
    pub fn slack(team_id: &str, user_id: impl Into<String>) -> Self {
        Self::new(format!("{SLACK_PROVIDER_PREFIX}{team_id}"), user_id)
    }

    /// Provider tag, e.g. `slack:T024BE7LD`.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Provider-specific user ID.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.subject_id)
    }
}
