use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-shot invite a trainer sends to a prospective client. Token issuance
/// and delivery happen outside this crate; consumption happens here when the
/// client accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteToken {
    pub token: String,
    pub trainer_id: String,
    pub email: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}
