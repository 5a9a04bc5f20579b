//! Pagerbridge webhook server library.
//!
//! This crate provides the Slack alert-action webhook as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! Every request is authenticated with the Slack signing secret before any
//! field of the payload is read. Requests older than five minutes are
//! rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod delivery;
pub mod error;
pub mod routes;
pub mod services;
pub mod slack;
pub mod state;
