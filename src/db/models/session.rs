use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "Scheduled",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<SessionStatus> {
        match value {
            "Scheduled" => Ok(SessionStatus::Scheduled),
            "Completed" => Ok(SessionStatus::Completed),
            "Cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(anyhow!("unknown session status {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Studio,
    Online,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Studio => "Studio",
            SessionType::Online => "Online",
        }
    }

    pub fn parse(value: &str) -> Result<SessionType> {
        match value {
            "Studio" => Ok(SessionType::Studio),
            "Online" => Ok(SessionType::Online),
            other => Err(anyhow!("unknown session type {other}")),
        }
    }
}

/// One scheduled or completed training appointment between a trainer and a
/// client. `workout_name` is a display snapshot taken at creation so the row
/// survives later workout edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub trainer_id: String,
    pub client_id: String,
    pub workout_id: Option<String>,
    pub workout_name: Option<String>,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session row joined with the client's display name, as returned by the
/// query entry points.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub client_name: String,
}
