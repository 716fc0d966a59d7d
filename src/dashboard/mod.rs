//! Trainer and client dashboard aggregation. Each dashboard request reads the
//! relevant windows fresh from the store and folds them into summary blocks;
//! the folds themselves are pure functions over the fetched rows. Any read
//! failure aborts the whole aggregation.

mod types;

pub use types::{
    CancelledSessionRow, ClientDashboard, ClientWeekActivity, MonthlyCompletionRate,
    TodaySessionRow, TodayStats, TrainerDashboard, TrainerSummary, WeekStats,
};

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::db::models::{Relation, Session, SessionStatus};
use crate::db::Database;
use crate::error::AppError;
use crate::scheduling::day_start;

#[derive(Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn trainer_dashboard(
        &self,
        trainer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TrainerDashboard, AppError> {
        let relations = self.db.active_relations_for_trainer(trainer_id).await?;

        let (today_start, today_end) = today_window(now);
        let today_sessions = self
            .db
            .sessions_for_trainer_between(trainer_id, today_start, today_end)
            .await?;

        let (week_start, week_end) = week_window(now);
        let week_sessions = self
            .db
            .sessions_for_trainer_between(trainer_id, week_start, week_end)
            .await?;

        let (month_start, month_end) = month_window(now);
        let month_sessions = self
            .db
            .sessions_for_trainer_between(trainer_id, month_start, month_end)
            .await?;

        let names = self
            .client_names(&relations, [&today_sessions, &week_sessions, &month_sessions])
            .await?;

        Ok(TrainerDashboard {
            today_stats: build_today_stats(relations.len(), &today_sessions, &names),
            week_stats: build_week_stats(&relations, &week_sessions, &names),
            monthly_completion_rate: build_monthly_completion_rate(&month_sessions, &names),
        })
    }

    pub async fn client_dashboard(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ClientDashboard, AppError> {
        let trainer = match self.db.find_active_relation_for_client(client_id).await? {
            Some(relation) => self
                .db
                .get_user(&relation.trainer_id)
                .await?
                .map(|user| TrainerSummary {
                    id: user.id.clone(),
                    name: user.full_name(),
                    email: user.email,
                }),
            None => None,
        };

        let next_session = self.db.next_session_for_client(client_id, now).await?;
        let previous_session = self.db.previous_session_for_client(client_id, now).await?;

        Ok(ClientDashboard {
            trainer,
            next_session,
            previous_session,
        })
    }

    async fn client_names(
        &self,
        relations: &[Relation],
        session_sets: [&Vec<Session>; 3],
    ) -> Result<HashMap<String, String>, AppError> {
        let mut ids: HashSet<String> = relations
            .iter()
            .map(|relation| relation.client_id.clone())
            .collect();
        for sessions in session_sets {
            ids.extend(sessions.iter().map(|session| session.client_id.clone()));
        }

        let users = self.db.get_users_by_ids(ids.into_iter().collect()).await?;
        Ok(users
            .into_iter()
            .map(|user| (user.id.clone(), user.full_name()))
            .collect())
    }
}

/// `[today 00:00, tomorrow 00:00)`.
pub fn today_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day_start(now.date_naive());
    (start, start + Duration::days(1))
}

/// `[Sunday 00:00, next Sunday 00:00)` of the current week. The dashboard
/// week runs Sunday through Saturday; the session-filter week
/// (`scheduling::resolve`) runs Monday through Sunday. Both conventions are
/// kept as-is.
pub fn week_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    let start = day_start(sunday);
    (start, start + Duration::days(7))
}

/// `[first of month 00:00, first of next month 00:00)`. The exclusive end
/// sits one millisecond past the inclusive end of the filter month
/// (`scheduling::resolve`), so the two windows admit the same timestamps at
/// millisecond precision.
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let first = today - Duration::days(today.day0() as i64);
    (day_start(first), day_start(first + chrono::Months::new(1)))
}

/// Integer percentage, rounded half-up, zero when the denominator is zero.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 * 100.0) / total as f64).round() as u32
}

fn display_name(names: &HashMap<String, String>, client_id: &str) -> String {
    names
        .get(client_id)
        .cloned()
        .unwrap_or_else(|| client_id.to_string())
}

fn build_today_stats(
    total_clients: usize,
    sessions: &[Session],
    names: &HashMap<String, String>,
) -> TodayStats {
    let training_today = sessions
        .iter()
        .map(|session| session.client_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let rows = sessions
        .iter()
        .map(|session| TodaySessionRow {
            client_name: display_name(names, &session.client_id),
            start_time: session.start_time,
        })
        .collect();

    TodayStats {
        total_clients,
        training_today,
        percentage: percentage(training_today, total_clients),
        sessions: rows,
    }
}

fn build_week_stats(
    relations: &[Relation],
    sessions: &[Session],
    names: &HashMap<String, String>,
) -> WeekStats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for session in sessions {
        *counts.entry(session.client_id.as_str()).or_insert(0) += 1;
    }

    // Walk the roster in relation order so active/missing stay deterministic
    // and partition the roster exactly.
    let mut active = Vec::new();
    let mut missing = Vec::new();
    for relation in relations {
        match counts.get(relation.client_id.as_str()) {
            Some(&session_count) => active.push(ClientWeekActivity {
                client_name: display_name(names, &relation.client_id),
                sessions: session_count,
            }),
            None => missing.push(display_name(names, &relation.client_id)),
        }
    }

    let training_week = counts.len();
    WeekStats {
        total_clients: relations.len(),
        training_week,
        percentage: percentage(training_week, relations.len()),
        active,
        missing,
    }
}

fn build_monthly_completion_rate(
    sessions: &[Session],
    names: &HashMap<String, String>,
) -> MonthlyCompletionRate {
    let completed = sessions
        .iter()
        .filter(|session| session.status == SessionStatus::Completed)
        .count();
    let cancelled_sessions: Vec<CancelledSessionRow> = sessions
        .iter()
        .filter(|session| session.status == SessionStatus::Cancelled)
        .map(|session| CancelledSessionRow {
            client_name: display_name(names, &session.client_id),
            date: session.start_time,
        })
        .collect();

    MonthlyCompletionRate {
        total: sessions.len(),
        completed,
        cancelled: cancelled_sessions.len(),
        percentage: percentage(completed, sessions.len()),
        cancelled_sessions,
    }
}
