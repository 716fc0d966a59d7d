use chrono::{DateTime, Utc};

use crate::db::models::{Session, SessionStatus};
use crate::scheduling::filter::StatusFilter;
use crate::scheduling::range::DateRange;

/// A session query assembled once from scope, date range, and status filter,
/// then translated to SQL at the repository boundary.
///
/// The status filter never replaces an existing date range: `overdue` and
/// `upcoming` add their own cutoff alongside the range, so both constraints
/// hold simultaneously ("sessions this week, but only the overdue ones").
#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
    pub trainer_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<SessionStatus>,
    pub range: Option<DateRange>,
    /// Exclusive upper cutoff on start time, set by `overdue`.
    pub starts_before: Option<DateTime<Utc>>,
    /// Inclusive lower cutoff on start time, set by `upcoming`.
    pub starts_on_or_after: Option<DateTime<Utc>>,
}

impl SessionQuery {
    pub fn for_trainer(trainer_id: &str) -> SessionQuery {
        SessionQuery {
            trainer_id: Some(trainer_id.to_string()),
            ..SessionQuery::default()
        }
    }

    pub fn for_client(client_id: &str) -> SessionQuery {
        SessionQuery {
            client_id: Some(client_id.to_string()),
            ..SessionQuery::default()
        }
    }

    pub fn with_client(mut self, client_id: Option<String>) -> SessionQuery {
        if client_id.is_some() {
            self.client_id = client_id;
        }
        self
    }

    pub fn with_range(mut self, range: Option<DateRange>) -> SessionQuery {
        self.range = range;
        self
    }

    /// Fold a status filter into the query. Cutoffs intersect with whatever
    /// is already present; repeated application keeps the tightest bound.
    pub fn apply_status_filter(&mut self, filter: StatusFilter, now: DateTime<Utc>) {
        match filter {
            StatusFilter::Overdue => {
                self.status = Some(SessionStatus::Scheduled);
                self.starts_before = Some(match self.starts_before {
                    Some(cutoff) => cutoff.min(now),
                    None => now,
                });
            }
            StatusFilter::Upcoming => {
                self.status = Some(SessionStatus::Scheduled);
                self.starts_on_or_after = Some(match self.starts_on_or_after {
                    Some(cutoff) => cutoff.max(now),
                    None => now,
                });
            }
            StatusFilter::Completed => self.status = Some(SessionStatus::Completed),
            StatusFilter::Cancelled => self.status = Some(SessionStatus::Cancelled),
        }
    }

    /// The predicate this query represents, usable for in-memory filtering and
    /// as the reference semantics for `to_sql`.
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(trainer_id) = &self.trainer_id {
            if &session.trainer_id != trainer_id {
                return false;
            }
        }
        if let Some(client_id) = &self.client_id {
            if &session.client_id != client_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if session.status != status {
                return false;
            }
        }
        if let Some(range) = &self.range {
            if !range.contains(session.start_time) {
                return false;
            }
        }
        if let Some(cutoff) = self.starts_before {
            if session.start_time >= cutoff {
                return false;
            }
        }
        if let Some(cutoff) = self.starts_on_or_after {
            if session.start_time < cutoff {
                return false;
            }
        }
        true
    }

    /// Translate to a SQL `WHERE` fragment plus positional parameters. All
    /// parameters are RFC 3339 strings or ids, so lexicographic comparison in
    /// SQLite matches chronological order.
    pub(crate) fn to_sql(&self) -> (String, Vec<String>) {
        fn push(
            conditions: &mut Vec<String>,
            params: &mut Vec<String>,
            column: &str,
            op: &str,
            value: String,
        ) {
            params.push(value);
            conditions.push(format!("{column} {op} ?{}", params.len()));
        }

        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(trainer_id) = &self.trainer_id {
            push(&mut conditions, &mut params, "trainer_id", "=", trainer_id.clone());
        }
        if let Some(client_id) = &self.client_id {
            push(&mut conditions, &mut params, "client_id", "=", client_id.clone());
        }
        if let Some(status) = self.status {
            push(&mut conditions, &mut params, "status", "=", status.as_str().to_string());
        }
        if let Some(range) = &self.range {
            push(&mut conditions, &mut params, "start_time", ">=", range.start.to_rfc3339());
            push(&mut conditions, &mut params, "start_time", "<=", range.end.to_rfc3339());
        }
        if let Some(cutoff) = self.starts_before {
            push(&mut conditions, &mut params, "start_time", "<", cutoff.to_rfc3339());
        }
        if let Some(cutoff) = self.starts_on_or_after {
            push(&mut conditions, &mut params, "start_time", ">=", cutoff.to_rfc3339());
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        (clause, params)
    }
}
