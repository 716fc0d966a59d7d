use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{ClientProfile, User, UserRole},
};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, role, age, weight_kg, goal, notes, created_at";

fn row_to_user(row: &Row) -> Result<User> {
    let role: String = row.get("role")?;
    let created_at: String = row.get("created_at")?;

    Ok(User {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        role: UserRole::parse(&role)?,
        profile: ClientProfile {
            age: row.get("age")?,
            weight_kg: row.get("weight_kg")?,
            goal: row.get("goal")?,
            notes: row.get("notes")?,
        },
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        let record = user.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, first_name, last_name, email, role,
                                    age, weight_kg, goal, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.first_name,
                    record.last_name,
                    record.email,
                    record.role.as_str(),
                    record.profile.age,
                    record.profile.weight_kg,
                    record.profile.goal,
                    record.profile.notes,
                    record.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert user")?;
            Ok(())
        })
        .await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;

            let mut rows = stmt.query(params![user_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_user(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Bulk display-name lookup. Ids not present in the store are simply
    /// absent from the result.
    pub async fn get_users_by_ids(&self, ids: Vec<String>) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.execute(move |conn| {
            let placeholders = (1..=ids.len())
                .map(|position| format!("?{position}"))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id IN ({placeholders})"
            ))?;

            let mut rows = stmt.query(params_from_iter(ids))?;
            let mut users = Vec::new();
            while let Some(row) = rows.next()? {
                users.push(row_to_user(row)?);
            }

            Ok(users)
        })
        .await
    }
}
