use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::{Exercise, RelationStatus, Workout};
use crate::db::Database;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    pub client_id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// Workout assignment. Sessions reference workouts by name snapshot only, so
/// this stays a thin layer over the store.
#[derive(Clone)]
pub struct WorkoutService {
    db: Database,
}

impl WorkoutService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn assign_workout(
        &self,
        trainer_id: &str,
        new: NewWorkout,
        now: DateTime<Utc>,
    ) -> Result<Workout, AppError> {
        let relation = self.db.find_relation(trainer_id, &new.client_id).await?;
        if !matches!(relation, Some(ref r) if r.status == RelationStatus::Active) {
            return Err(AppError::NoActiveRelation);
        }

        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            trainer_id: trainer_id.to_string(),
            client_id: new.client_id,
            name: new.name,
            exercises: new.exercises,
            created_at: now,
        };
        self.db.insert_workout(&workout).await?;
        Ok(workout)
    }

    pub async fn get_workout(&self, workout_id: &str) -> Result<Workout, AppError> {
        self.db
            .get_workout(workout_id)
            .await?
            .ok_or(AppError::NotFound("workout"))
    }

    pub async fn workouts_for_client(&self, client_id: &str) -> Result<Vec<Workout>, AppError> {
        Ok(self.db.workouts_for_client(client_id).await?)
    }
}
