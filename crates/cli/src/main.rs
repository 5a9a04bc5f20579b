//! Pagerbridge CLI - Request signing and test payload tools.
//!
//! # Usage
//!
//! ```bash
//! # Build an Acknowledge click body
//! pb-cli payload --button ack --callback-id 42 --team T1 --user U1 --channel C1 \
//!     --response-url https://hooks.slack.com/actions/T1/1/abc > body.txt
//!
//! # Print signature headers for it
//! pb-cli sign --body body.txt
//!
//! # Check a captured request against the signing secret
//! pb-cli verify --body body.txt --timestamp 1531420618 --signature v0=...
//! ```
//!
//! # Commands
//!
//! - `payload` - Build a form-encoded alert button click
//! - `sign` - Compute Slack signature headers for a body
//! - `verify` - Check a signature and timestamp like the server does

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::payload::{Button, ClickParams};

#[derive(Parser)]
#[command(name = "pb-cli")]
#[command(author, version, about = "Pagerbridge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a form-encoded alert button click
    Payload {
        /// Button that was clicked
        #[arg(short, long, value_enum)]
        button: Button,

        /// Alert callback ID (button value)
        #[arg(long)]
        callback_id: String,

        /// Slack team ID
        #[arg(long)]
        team: String,

        /// Slack user ID
        #[arg(long)]
        user: String,

        /// Slack channel ID
        #[arg(long)]
        channel: String,

        /// Interaction response URL
        #[arg(long)]
        response_url: String,
    },
    /// Compute Slack signature headers for a body
    Sign {
        /// Body file (`-` for stdin)
        #[arg(short, long)]
        body: PathBuf,

        /// Unix timestamp (default: now)
        #[arg(short, long)]
        timestamp: Option<i64>,
    },
    /// Check a signature and timestamp at the current time
    Verify {
        /// Body file (`-` for stdin)
        #[arg(short, long)]
        body: PathBuf,

        /// `X-Slack-Request-Timestamp` value
        #[arg(short, long)]
        timestamp: String,

        /// `X-Slack-Signature` value
        #[arg(short, long)]
        signature: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Payload {
            button,
            callback_id,
            team,
            user,
            channel,
            response_url,
        } => commands::payload::print(&ClickParams {
            button,
            callback_id,
            team_id: team,
            user_id: user,
            channel_id: channel,
            response_url,
        }),
        Commands::Sign { body, timestamp } => commands::sign::sign(&body, timestamp)?,
        Commands::Verify {
            body,
            timestamp,
            signature,
        } => commands::sign::verify(&body, &timestamp, &signature)?,
    }
    Ok(())
}
