//! Pagerbridge Core - Shared domain types.
//!
//! This crate provides the types shared between the webhook server, the CLI
//! and the integration tests:
//! - `server` - Slack interaction webhook (signature checks, dispatch)
//! - `cli` - Operator tooling for signing and building test requests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no HTTP, no Slack client,
//! no configuration. This keeps it lightweight and allows the delivery
//! subsystem to be swapped out behind [`SubjectReceiver`].
//!
//! # Modules
//!
//! - [`types`] - Notification results and provider-qualified subject keys
//! - [`receiver`] - The delivery subsystem seam and its error set

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod receiver;
pub mod types;

pub use receiver::{ReceiveError, SubjectReceiver};
pub use types::*;
