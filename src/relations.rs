use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::db::models::{Relation, RelationStatus, User};
use crate::db::Database;
use crate::error::AppError;

/// Relation lifecycle: invite acceptance, ending, and trainer-side client
/// listing. A (trainer, client) pair has at most one relation row; ended
/// relations are reactivated instead of duplicated.
#[derive(Clone)]
pub struct RelationService {
    db: Database,
}

impl RelationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Consume an invite token and activate the relation it belongs to.
    ///
    /// Token consumption and relation creation are two independent writes; a
    /// crash between them can leave a used token without a relation. The
    /// window is accepted rather than guarded.
    pub async fn accept_invite(
        &self,
        token: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Relation, AppError> {
        let invite = self
            .db
            .find_invite(token)
            .await?
            .ok_or(AppError::InvalidInvite)?;
        if invite.used {
            warn!("Rejected already-used invite token for client {client_id}");
            return Err(AppError::InvalidInvite);
        }

        self.db.mark_invite_used(token, now).await?;

        let relation = match self.db.find_relation(&invite.trainer_id, client_id).await? {
            Some(mut existing) => {
                if existing.status != RelationStatus::Active {
                    self.db
                        .set_relation_status(&existing.id, RelationStatus::Active, None)
                        .await?;
                    info!(
                        "Reactivated relation {} between trainer {} and client {}",
                        existing.id, invite.trainer_id, client_id
                    );
                }
                existing.status = RelationStatus::Active;
                existing.ended_at = None;
                existing
            }
            None => {
                let relation = Relation {
                    id: Uuid::new_v4().to_string(),
                    trainer_id: invite.trainer_id.clone(),
                    client_id: client_id.to_string(),
                    status: RelationStatus::Active,
                    created_at: now,
                    ended_at: None,
                };
                self.db.insert_relation(&relation).await?;
                info!(
                    "Created relation {} between trainer {} and client {}",
                    relation.id, invite.trainer_id, client_id
                );
                relation
            }
        };

        Ok(relation)
    }

    pub async fn end_relation(
        &self,
        trainer_id: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Relation, AppError> {
        let mut relation = self
            .db
            .find_relation(trainer_id, client_id)
            .await?
            .ok_or(AppError::NoActiveRelation)?;
        if relation.status != RelationStatus::Active {
            return Err(AppError::NoActiveRelation);
        }

        self.db
            .set_relation_status(&relation.id, RelationStatus::Ended, Some(now))
            .await?;
        relation.status = RelationStatus::Ended;
        relation.ended_at = Some(now);
        Ok(relation)
    }

    /// The clients a trainer currently works with.
    pub async fn active_clients(&self, trainer_id: &str) -> Result<Vec<User>, AppError> {
        let relations = self.db.active_relations_for_trainer(trainer_id).await?;
        let ids = relations
            .into_iter()
            .map(|relation| relation.client_id)
            .collect();
        Ok(self.db.get_users_by_ids(ids).await?)
    }
}
