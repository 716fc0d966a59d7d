use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{Exercise, Workout},
};

const WORKOUT_COLUMNS: &str = "id, trainer_id, client_id, name, exercises, created_at";

fn row_to_workout(row: &Row) -> Result<Workout> {
    let exercises_json: String = row.get("exercises")?;
    let created_at: String = row.get("created_at")?;

    let exercises: Vec<Exercise> = serde_json::from_str(&exercises_json)
        .with_context(|| "failed to parse workout exercises")?;

    Ok(Workout {
        id: row.get("id")?,
        trainer_id: row.get("trainer_id")?,
        client_id: row.get("client_id")?,
        name: row.get("name")?,
        exercises,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_workout(&self, workout: &Workout) -> Result<()> {
        let record = workout.clone();
        self.execute(move |conn| {
            let exercises_json = serde_json::to_string(&record.exercises)
                .with_context(|| "failed to serialize workout exercises")?;

            conn.execute(
                "INSERT INTO workouts (id, trainer_id, client_id, name, exercises, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.trainer_id,
                    record.client_id,
                    record.name,
                    exercises_json,
                    record.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert workout")?;
            Ok(())
        })
        .await
    }

    pub async fn get_workout(&self, workout_id: &str) -> Result<Option<Workout>> {
        let workout_id = workout_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![workout_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_workout(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn workouts_for_client(&self, client_id: &str) -> Result<Vec<Workout>> {
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {WORKOUT_COLUMNS} FROM workouts
                 WHERE client_id = ?1
                 ORDER BY created_at DESC"
            ))?;

            let mut rows = stmt.query(params![client_id])?;
            let mut workouts = Vec::new();
            while let Some(row) = rows.next()? {
                workouts.push(row_to_workout(row)?);
            }

            Ok(workouts)
        })
        .await
    }
}
