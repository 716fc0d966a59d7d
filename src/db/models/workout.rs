use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
}

/// An exercise assignment from a trainer to a client. Sessions reference a
/// workout for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub trainer_id: String,
    pub client_id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
}
