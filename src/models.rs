use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a submitted command.
///
/// `InProgress` is reserved: the execution task moves a command straight
/// from `New` to a terminal status, but clients must accept the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    New,
    InProgress,
    Success,
    Failed,
}

impl CommandStatus {
    /// Terminal statuses are sticky; no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device command and its tracked outcome.
///
/// Records are owned by the store; handlers and the engine only ever see
/// cloned snapshots. `error` stays `None` until execution finishes and is
/// non-empty exactly when the command failed.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRecord {
    pub id: String,
    pub device_id: String,
    pub command: String,
    pub status: CommandStatus,
    pub error: Option<String>,
}

impl CommandRecord {
    pub fn new(id: String, device_id: String, command: String) -> Self {
        Self {
            id,
            device_id,
            command,
            status: CommandStatus::New,
            error: None,
        }
    }
}

/// Body of `POST /api/commands`.
///
/// Both fields deserialize as `Option` so that absent keys reach the
/// validation step and get the field-specific 400 message instead of a
/// generic deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCommandRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

/// Body of a successful `POST /api/commands`.
#[derive(Debug, Serialize)]
pub struct CommandCreated {
    pub id: String,
    pub status: CommandStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&CommandStatus::New).expect("serialize"),
            "\"NEW\""
        );
        assert_eq!(
            serde_json::to_string(&CommandStatus::InProgress).expect("serialize"),
            "\"IN_PROGRESS\""
        );
        assert_eq!(CommandStatus::Success.to_string(), "SUCCESS");
        assert_eq!(CommandStatus::Failed.as_str(), "FAILED");
    }

    #[test]
    fn only_success_and_failed_are_terminal() {
        assert!(!CommandStatus::New.is_terminal());
        assert!(!CommandStatus::InProgress.is_terminal());
        assert!(CommandStatus::Success.is_terminal());
        assert!(CommandStatus::Failed.is_terminal());
    }

    #[test]
    fn new_record_starts_without_error() {
        let record = CommandRecord::new(
            "1".to_string(),
            "sensor-1".to_string(),
            "RESTART".to_string(),
        );
        assert_eq!(record.status, CommandStatus::New);
        assert!(record.error.is_none());
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let payload: CreateCommandRequest =
            serde_json::from_str("{}").expect("empty object should deserialize");
        assert!(payload.device_id.is_none());
        assert!(payload.command.is_none());
    }
}
