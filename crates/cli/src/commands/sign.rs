//! Request signing commands.
//!
//! # Usage
//!
//! ```bash
//! # Sign a body file with the current time
//! pb-cli sign --body body.txt
//!
//! # Sign stdin with a fixed timestamp
//! printf 'payload=...' | pb-cli sign --body - --timestamp 1531420618
//!
//! # Check a captured request
//! pb-cli verify --body body.txt --timestamp 1531420618 --signature v0=...
//! ```
//!
//! # Environment Variables
//!
//! - `SLACK_SIGNING_SECRET` - Slack app signing secret
//!
//! The body is used byte-for-byte; a trailing newline from `echo` changes
//! the signature.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use pagerbridge_server::slack::{
    SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_signature, verify_request,
};
use secrecy::{ExposeSecret, SecretString};

use super::CliError;

/// Print the signature headers for a body.
///
/// # Errors
///
/// Returns error if the secret is missing or the body cannot be read.
#[allow(clippy::print_stdout)] // Headers are the command's output
pub fn sign(body_path: &Path, timestamp: Option<i64>) -> Result<(), CliError> {
    let secret = signing_secret()?;
    let body = read_body(body_path)?;
    let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp());

    for line in signature_headers(&secret, timestamp, &body)? {
        println!("{line}");
    }

    Ok(())
}

/// Check a signature the way the server would, at the current time.
///
/// # Errors
///
/// Returns error if the request would be rejected.
pub fn verify(body_path: &Path, timestamp: &str, signature: &str) -> Result<(), CliError> {
    let secret = signing_secret()?;
    let body = read_body(body_path)?;

    check_signature(&secret, timestamp, signature, &body, Utc::now())?;

    tracing::info!("Signature is valid");
    Ok(())
}

/// Header lines Slack would send for `body` at `timestamp`.
fn signature_headers(
    secret: &SecretString,
    timestamp: i64,
    body: &[u8],
) -> Result<[String; 2], CliError> {
    let timestamp = timestamp.to_string();
    let signature = compute_signature(secret.expose_secret().as_bytes(), &timestamp, body)
        .map_err(|_| CliError::Signature)?;

    Ok([
        format!("{TIMESTAMP_HEADER}: {timestamp}"),
        format!("{SIGNATURE_HEADER}: {signature}"),
    ])
}

fn check_signature(
    secret: &SecretString,
    timestamp: &str,
    signature: &str,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    verify_request(secret, Some(timestamp), Some(signature), body, now)?;
    Ok(())
}

fn signing_secret() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("SLACK_SIGNING_SECRET")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("SLACK_SIGNING_SECRET"))
}

/// Read the body from a file, or stdin for `-`.
fn read_body(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut body = Vec::new();
        std::io::stdin().read_to_end(&mut body)?;
        return Ok(body);
    }

    Ok(std::fs::read(path)?)
}
