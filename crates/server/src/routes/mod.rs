//! HTTP route handlers for the webhook server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check (registered in main)
//!
//! # Slack
//! POST /api/slack/actions      - Alert action buttons (Acknowledge / Close)
//! ```

use axum::Router;

use crate::state::AppState;

pub mod slack;

/// Build the application router (without health checks or middleware).
pub fn routes() -> Router<AppState> {
    Router::new().merge(slack::router())
}
