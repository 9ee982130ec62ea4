//! Client-side polling protocol.
//!
//! Layered purely on `GET /api/commands/{id}`: repeatedly look a command up
//! until it reports an accepted terminal status or the deadline passes.
//! Transport failures, unexpected response codes and not-yet-terminal
//! statuses are all retried after a sleep; only the overall timeout aborts
//! the caller.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::models::CommandStatus;

/// Snapshot of a command as observed over the wire.
///
/// Strict shape: `id` and `status` are required and unknown fields are
/// rejected, so a malformed body fails deserialization instead of being
/// half-read.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolledCommand {
    pub id: String,
    pub status: CommandStatus,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error(
        "no accepted status within {timeout:?} after {attempts} attempts; last status: {last_status}; last body: {last_body}"
    )]
    Timeout {
        timeout: Duration,
        attempts: u32,
        last_status: String,
        last_body: String,
    },
}

/// Polls `{base_url}/api/commands/{command_id}` until the command reports
/// one of the `accepted` statuses, returning that snapshot immediately.
///
/// A 200 with a not-yet-accepted status keeps polling rather than giving
/// up, and non-200 responses sleep before retrying like transport errors
/// do. On deadline the command is looked up once more so the error carries
/// the last observed status and body (`"N/A"` when nothing was observed).
pub async fn poll_until_status(
    client: &Client,
    base_url: &str,
    command_id: &str,
    accepted: &[CommandStatus],
    timeout: Duration,
    poll_interval: Duration,
) -> Result<PolledCommand, PollError> {
    let url = format!("{base_url}/api/commands/{command_id}");
    let started = Instant::now();
    let mut attempts = 0u32;

    while started.elapsed() < timeout {
        attempts += 1;

        match client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.json::<PolledCommand>().await {
                    Ok(snapshot) if accepted.contains(&snapshot.status) => {
                        debug!(command_id, attempts, status = %snapshot.status, "accepted status observed");
                        return Ok(snapshot);
                    }
                    Ok(snapshot) => {
                        debug!(command_id, attempts, status = %snapshot.status, "status not accepted yet");
                    }
                    Err(err) => {
                        warn!(command_id, attempts, error = %err, "response failed shape validation");
                    }
                }
            }
            Ok(response) => {
                warn!(command_id, attempts, http_status = %response.status(), "unexpected response status");
            }
            Err(err) => {
                debug!(command_id, attempts, error = %err, "request failed, will retry");
            }
        }

        sleep(poll_interval).await;
    }

    let (last_status, last_body) = final_lookup(client, &url).await;
    Err(PollError::Timeout {
        timeout,
        attempts,
        last_status,
        last_body,
    })
}

/// One last lookup so the timeout error carries whatever the server knew.
async fn final_lookup(client: &Client, url: &str) -> (String, String) {
    let body = match client.get(url).send().await {
        Ok(response) if response.status() == StatusCode::OK => match response.text().await {
            Ok(body) => body,
            Err(_) => return ("N/A".to_string(), String::new()),
        },
        Ok(response) => {
            return (
                "N/A".to_string(),
                response.text().await.unwrap_or_default(),
            );
        }
        Err(_) => return ("N/A".to_string(), String::new()),
    };

    let status = serde_json::from_str::<PolledCommand>(&body)
        .map(|snapshot| snapshot.status.to_string())
        .unwrap_or_else(|_| "N/A".to_string());
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_requires_id_and_status() {
        let err = serde_json::from_str::<PolledCommand>(r#"{"id":"1"}"#);
        assert!(err.is_err(), "status must be required");

        let err = serde_json::from_str::<PolledCommand>(r#"{"status":"NEW"}"#);
        assert!(err.is_err(), "id must be required");
    }

    #[test]
    fn snapshot_rejects_unknown_fields() {
        let err = serde_json::from_str::<PolledCommand>(
            r#"{"id":"1","status":"NEW","extra":"nope"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn snapshot_rejects_unknown_status_values() {
        let err = serde_json::from_str::<PolledCommand>(r#"{"id":"1","status":"RUNNING"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn snapshot_accepts_the_full_record_shape() {
        let snapshot = serde_json::from_str::<PolledCommand>(
            r#"{"id":"1","device_id":"sensor-1","command":"RESTART","status":"FAILED","error":"Device unreachable"}"#,
        )
        .expect("full record should validate");
        assert_eq!(snapshot.status, CommandStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("Device unreachable"));
    }

    #[test]
    fn snapshot_accepts_null_error() {
        let snapshot = serde_json::from_str::<PolledCommand>(
            r#"{"id":"1","device_id":"sensor-1","command":"RESTART","status":"NEW","error":null}"#,
        )
        .expect("null error should validate");
        assert!(snapshot.error.is_none());
    }
}
