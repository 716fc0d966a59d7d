use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{Session, SessionStatus, SessionType},
};
use crate::scheduling::SessionQuery;

const SESSION_COLUMNS: &str = "id, trainer_id, client_id, workout_id, workout_name, \
     session_type, status, start_time, end_time, created_at, updated_at";

fn row_to_session(row: &Row) -> Result<Session> {
    let workout_id: Option<String> = row.get("workout_id")?;
    let workout_name: Option<String> = row.get("workout_name")?;
    let session_type: String = row.get("session_type")?;
    let status: String = row.get("status")?;
    let start_time: String = row.get("start_time")?;
    let end_time: String = row.get("end_time")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Session {
        id: row.get("id")?,
        trainer_id: row.get("trainer_id")?,
        client_id: row.get("client_id")?,
        workout_id,
        workout_name,
        session_type: SessionType::parse(&session_type)?,
        status: SessionStatus::parse(&status)?,
        start_time: parse_datetime(&start_time, "start_time")?,
        end_time: parse_datetime(&end_time, "end_time")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, trainer_id, client_id, workout_id, workout_name,
                                       session_type, status, start_time, end_time, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id,
                    record.trainer_id,
                    record.client_id,
                    record.workout_id,
                    record.workout_name,
                    record.session_type.as_str(),
                    record.status.as_str(),
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert session")?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![session_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_session(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Persist the mutable fields of an existing session.
    pub async fn update_session(&self, session: &Session) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE sessions
                 SET workout_id = ?1,
                     workout_name = ?2,
                     session_type = ?3,
                     status = ?4,
                     start_time = ?5,
                     end_time = ?6,
                     updated_at = ?7
                 WHERE id = ?8",
                params![
                    record.workout_id,
                    record.workout_name,
                    record.session_type.as_str(),
                    record.status.as_str(),
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                    record.id,
                ],
            )
            .with_context(|| "failed to update session")?;

            if rows_affected == 0 {
                bail!("session {} does not exist", record.id);
            }
            Ok(())
        })
        .await
    }

    /// Execute a composed query, ordered by ascending start time.
    pub async fn query_sessions(&self, query: SessionQuery) -> Result<Vec<Session>> {
        self.execute(move |conn| {
            let (clause, query_params) = query.to_sql();
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions{clause} ORDER BY start_time ASC"
            ))?;

            let mut rows = stmt.query(params_from_iter(query_params))?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Dashboard window scan: start time in `[start, end)`.
    pub async fn sessions_for_trainer_between(
        &self,
        trainer_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>> {
        let trainer_id = trainer_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE trainer_id = ?1 AND start_time >= ?2 AND start_time < ?3
                 ORDER BY start_time ASC"
            ))?;

            let mut rows = stmt.query(params![
                trainer_id,
                start.to_rfc3339(),
                end.to_rfc3339()
            ])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    pub async fn next_session_for_client(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE client_id = ?1 AND start_time >= ?2
                 ORDER BY start_time ASC
                 LIMIT 1"
            ))?;

            let mut rows = stmt.query(params![client_id, now.to_rfc3339()])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_session(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn previous_session_for_client(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE client_id = ?1 AND start_time < ?2
                 ORDER BY start_time DESC
                 LIMIT 1"
            ))?;

            let mut rows = stmt.query(params![client_id, now.to_rfc3339()])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_session(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}
