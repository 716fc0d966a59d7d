use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySessionRow {
    pub client_name: String,
    pub start_time: DateTime<Utc>,
}

/// Who trains today, against the full active-client roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_clients: usize,
    pub training_today: usize,
    pub percentage: u32,
    pub sessions: Vec<TodaySessionRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWeekActivity {
    pub client_name: String,
    pub sessions: usize,
}

/// Week coverage: who trained, how often, and who fell through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    pub total_clients: usize,
    pub training_week: usize,
    pub percentage: u32,
    pub active: Vec<ClientWeekActivity>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledSessionRow {
    pub client_name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCompletionRate {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub percentage: u32,
    pub cancelled_sessions: Vec<CancelledSessionRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerDashboard {
    pub today_stats: TodayStats,
    pub week_stats: WeekStats,
    pub monthly_completion_rate: MonthlyCompletionRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub trainer: Option<TrainerSummary>,
    pub next_session: Option<Session>,
    pub previous_session: Option<Session>,
}
