//! Notification outcomes reported back by responders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The outcome a responder chose for an alert notification.
///
/// Only these two outcomes can be expressed from an interactive message;
/// anything else is rejected before it reaches the delivery subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationResult {
    /// The responder has seen the alert and is working on it.
    Acknowledge,
    /// The responder closed the alert.
    Resolve,
}

impl NotificationResult {
    /// Wire name of the result, as sent to the delivery subsystem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acknowledge => "acknowledge",
            Self::Resolve => "resolve",
        }
    }
}

impl fmt::Display for NotificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationResult::Acknowledge).expect("serialize");
        assert_eq!(json, "\"acknowledge\"");

        let json = serde_json::to_string(&NotificationResult::Resolve).expect("serialize");
        assert_eq!(json, "\"resolve\"");
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(NotificationResult::Acknowledge.to_string(), "acknowledge");
        assert_eq!(NotificationResult::Resolve.to_string(), "resolve");
    }
}
