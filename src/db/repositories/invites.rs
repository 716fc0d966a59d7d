use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime},
    models::InviteToken,
};

const INVITE_COLUMNS: &str = "token, trainer_id, email, used, created_at, used_at";

fn row_to_invite(row: &Row) -> Result<InviteToken> {
    let used: i64 = row.get("used")?;
    let created_at: String = row.get("created_at")?;
    let used_at: Option<String> = row.get("used_at")?;

    Ok(InviteToken {
        token: row.get("token")?,
        trainer_id: row.get("trainer_id")?,
        email: row.get("email")?,
        used: used != 0,
        created_at: parse_datetime(&created_at, "created_at")?,
        used_at: parse_optional_datetime(used_at, "used_at")?,
    })
}

impl Database {
    pub async fn insert_invite(&self, invite: &InviteToken) -> Result<()> {
        let record = invite.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO invites (token, trainer_id, email, used, created_at, used_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.token,
                    record.trainer_id,
                    record.email,
                    record.used as i64,
                    record.created_at.to_rfc3339(),
                    record.used_at.as_ref().map(|dt| dt.to_rfc3339()),
                ],
            )
            .with_context(|| "failed to insert invite")?;
            Ok(())
        })
        .await
    }

    pub async fn find_invite(&self, token: &str) -> Result<Option<InviteToken>> {
        let token = token.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INVITE_COLUMNS} FROM invites WHERE token = ?1"
            ))?;

            let mut rows = stmt.query(params![token])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_invite(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn mark_invite_used(&self, token: &str, used_at: DateTime<Utc>) -> Result<()> {
        let token = token.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE invites
                 SET used = 1,
                     used_at = ?1
                 WHERE token = ?2",
                params![used_at.to_rfc3339(), token],
            )
            .with_context(|| "failed to mark invite used")?;

            if rows_affected == 0 {
                bail!("invite {token} does not exist");
            }
            Ok(())
        })
        .await
    }
}
