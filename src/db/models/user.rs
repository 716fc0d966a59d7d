use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Trainer,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Trainer => "trainer",
            UserRole::Client => "client",
        }
    }

    pub fn parse(value: &str) -> Result<UserRole> {
        match value {
            "trainer" => Ok(UserRole::Trainer),
            "client" => Ok(UserRole::Client),
            other => Err(anyhow!("unknown user role {other}")),
        }
    }
}

/// Profile fields carried by client accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub age: Option<i64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub profile: ClientProfile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
