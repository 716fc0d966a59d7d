use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::{RelationStatus, Session, SessionStatus, SessionType, SessionView};
use crate::db::Database;
use crate::error::AppError;
use crate::scheduling::{SessionFilters, SessionQuery};
use crate::settings::SettingsStore;

/// Fields supplied when a trainer schedules a session. A missing end time
/// falls back to the configured default duration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub client_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub session_type: SessionType,
    pub workout_id: Option<String>,
}

/// Session reads and trainer-side writes. Reads compose the scheduling query
/// from raw filter tokens; writes are scoped to the owning trainer.
#[derive(Clone)]
pub struct SessionService {
    db: Database,
    settings: Arc<SettingsStore>,
}

impl SessionService {
    pub fn new(db: Database, settings: Arc<SettingsStore>) -> Self {
        Self { db, settings }
    }

    /// Sessions visible to a client, ordered by ascending start time.
    ///
    /// Scoped by client id alone: a client keeps read access to historical
    /// sessions even after the relation ends.
    pub async fn sessions_for_client(
        &self,
        client_id: &str,
        filters: &SessionFilters,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionView>, AppError> {
        let mut query = SessionQuery::for_client(client_id);
        filters.apply(&mut query, now)?;

        let sessions = self.db.query_sessions(query).await?;
        self.attach_client_names(sessions).await
    }

    /// Sessions for a trainer, optionally narrowed to one client, ordered by
    /// ascending start time.
    pub async fn sessions_for_trainer(
        &self,
        trainer_id: &str,
        client_id: Option<String>,
        filters: &SessionFilters,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionView>, AppError> {
        let mut query = SessionQuery::for_trainer(trainer_id).with_client(client_id);
        filters.apply(&mut query, now)?;

        let sessions = self.db.query_sessions(query).await?;
        self.attach_client_names(sessions).await
    }

    pub async fn create_session(
        &self,
        trainer_id: &str,
        new: NewSession,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let relation = self.db.find_relation(trainer_id, &new.client_id).await?;
        if !matches!(relation, Some(ref r) if r.status == RelationStatus::Active) {
            return Err(AppError::NoActiveRelation);
        }

        let workout_name = match &new.workout_id {
            Some(workout_id) => {
                let workout = self
                    .db
                    .get_workout(workout_id)
                    .await?
                    .ok_or(AppError::NotFound("workout"))?;
                Some(workout.name)
            }
            None => None,
        };

        let end_time = self.end_or_default(new.start_time, new.end_time);
        validate_times(new.start_time, end_time)?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            trainer_id: trainer_id.to_string(),
            client_id: new.client_id,
            workout_id: new.workout_id,
            workout_name,
            session_type: new.session_type,
            status: SessionStatus::Scheduled,
            start_time: new.start_time,
            end_time,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_session(&session).await?;
        info!(
            "Scheduled session {} for client {} at {}",
            session.id, session.client_id, session.start_time
        );
        Ok(session)
    }

    pub async fn update_status(
        &self,
        trainer_id: &str,
        session_id: &str,
        status: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut session = self.owned_session(trainer_id, session_id).await?;
        session.status = status;
        session.updated_at = now;
        self.db.update_session(&session).await?;
        Ok(session)
    }

    pub async fn reschedule(
        &self,
        trainer_id: &str,
        session_id: &str,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut session = self.owned_session(trainer_id, session_id).await?;
        let end_time = self.end_or_default(start_time, end_time);
        validate_times(start_time, end_time)?;

        session.start_time = start_time;
        session.end_time = end_time;
        session.updated_at = now;
        self.db.update_session(&session).await?;
        Ok(session)
    }

    async fn owned_session(
        &self,
        trainer_id: &str,
        session_id: &str,
    ) -> Result<Session, AppError> {
        let session = self
            .db
            .get_session(session_id)
            .await?
            .ok_or(AppError::NotFound("session"))?;

        // A session belonging to another trainer is indistinguishable from a
        // missing one.
        if session.trainer_id != trainer_id {
            return Err(AppError::NotFound("session"));
        }
        Ok(session)
    }

    fn end_or_default(
        &self,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        end_time.unwrap_or_else(|| {
            start_time + Duration::minutes(self.settings.scheduling().default_session_minutes)
        })
    }

    async fn attach_client_names(
        &self,
        sessions: Vec<Session>,
    ) -> Result<Vec<SessionView>, AppError> {
        let ids: BTreeSet<String> = sessions
            .iter()
            .map(|session| session.client_id.clone())
            .collect();
        let users = self.db.get_users_by_ids(ids.into_iter().collect()).await?;
        let names: HashMap<String, String> = users
            .into_iter()
            .map(|user| (user.id.clone(), user.full_name()))
            .collect();

        Ok(sessions
            .into_iter()
            .map(|session| {
                let client_name = names
                    .get(&session.client_id)
                    .cloned()
                    .unwrap_or_else(|| session.client_id.clone());
                SessionView {
                    session,
                    client_name,
                }
            })
            .collect())
    }
}

fn validate_times(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<(), AppError> {
    if end_time <= start_time {
        return Err(AppError::Validation(
            "end time must be after start time".into(),
        ));
    }
    Ok(())
}
