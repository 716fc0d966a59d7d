use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RelationStatus {
    Pending,
    Active,
    Ended,
}

impl RelationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationStatus::Pending => "pending",
            RelationStatus::Active => "active",
            RelationStatus::Ended => "ended",
        }
    }

    pub fn parse(value: &str) -> Result<RelationStatus> {
        match value {
            "pending" => Ok(RelationStatus::Pending),
            "active" => Ok(RelationStatus::Active),
            "ended" => Ok(RelationStatus::Ended),
            other => Err(anyhow!("unknown relation status {other}")),
        }
    }
}

/// The trainer-client association gating trainer-side access to a client.
/// At most one relation exists per (trainer, client) pair; an ended relation
/// is reactivated rather than duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: String,
    pub trainer_id: String,
    pub client_id: String,
    pub status: RelationStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}
