//! Core types for Pagerbridge.
//!
//! This module provides type-safe wrappers for the alert-action domain.

pub mod result;
pub mod subject;

pub use result::NotificationResult;
pub use subject::{SLACK_PROVIDER_PREFIX, SubjectKey};
