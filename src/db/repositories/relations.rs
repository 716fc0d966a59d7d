use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime},
    models::{Relation, RelationStatus},
};

const RELATION_COLUMNS: &str = "id, trainer_id, client_id, status, created_at, ended_at";

fn row_to_relation(row: &Row) -> Result<Relation> {
    let status: String = row.get("status")?;
    let created_at: String = row.get("created_at")?;
    let ended_at: Option<String> = row.get("ended_at")?;

    Ok(Relation {
        id: row.get("id")?,
        trainer_id: row.get("trainer_id")?,
        client_id: row.get("client_id")?,
        status: RelationStatus::parse(&status)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        ended_at: parse_optional_datetime(ended_at, "ended_at")?,
    })
}

impl Database {
    pub async fn insert_relation(&self, relation: &Relation) -> Result<()> {
        let record = relation.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO relations (id, trainer_id, client_id, status, created_at, ended_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.trainer_id,
                    record.client_id,
                    record.status.as_str(),
                    record.created_at.to_rfc3339(),
                    record.ended_at.as_ref().map(|dt| dt.to_rfc3339()),
                ],
            )
            .with_context(|| "failed to insert relation")?;
            Ok(())
        })
        .await
    }

    /// The unique relation for a (trainer, client) pair, in any status.
    pub async fn find_relation(
        &self,
        trainer_id: &str,
        client_id: &str,
    ) -> Result<Option<Relation>> {
        let trainer_id = trainer_id.to_string();
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RELATION_COLUMNS} FROM relations
                 WHERE trainer_id = ?1 AND client_id = ?2"
            ))?;

            let mut rows = stmt.query(params![trainer_id, client_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_relation(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn active_relations_for_trainer(&self, trainer_id: &str) -> Result<Vec<Relation>> {
        let trainer_id = trainer_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RELATION_COLUMNS} FROM relations
                 WHERE trainer_id = ?1 AND status = 'active'
                 ORDER BY created_at ASC"
            ))?;

            let mut rows = stmt.query(params![trainer_id])?;
            let mut relations = Vec::new();
            while let Some(row) = rows.next()? {
                relations.push(row_to_relation(row)?);
            }

            Ok(relations)
        })
        .await
    }

    pub async fn find_active_relation_for_client(
        &self,
        client_id: &str,
    ) -> Result<Option<Relation>> {
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RELATION_COLUMNS} FROM relations
                 WHERE client_id = ?1 AND status = 'active'
                 ORDER BY created_at ASC
                 LIMIT 1"
            ))?;

            let mut rows = stmt.query(params![client_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_relation(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Transition a relation's status. `ended_at` is set when ending and
    /// cleared when reactivating.
    pub async fn set_relation_status(
        &self,
        relation_id: &str,
        status: RelationStatus,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let relation_id = relation_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE relations
                 SET status = ?1,
                     ended_at = ?2
                 WHERE id = ?3",
                params![
                    status.as_str(),
                    ended_at.map(|dt| dt.to_rfc3339()),
                    relation_id,
                ],
            )
            .with_context(|| "failed to update relation status")?;

            if rows_affected == 0 {
                bail!("relation {relation_id} does not exist");
            }
            Ok(())
        })
        .await
    }
}
