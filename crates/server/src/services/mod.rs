//! Business logic services for the webhook server.
//!
//! # Services
//!
//! - `dispatch` - Hands validated alert actions to the delivery subsystem

pub mod dispatch;

pub use dispatch::{DispatchOutcome, DispatchService, UNLINKED_ACCOUNT_NOTICE};
