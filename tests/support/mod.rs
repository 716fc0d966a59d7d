#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use coachbase::models::{
    ClientProfile, InviteToken, Relation, RelationStatus, Session, SessionStatus, SessionType,
    User, UserRole,
};
use coachbase::App;

/// Fresh app backed by a throwaway database under the system temp dir.
pub fn test_app() -> App {
    let data_dir = std::env::temp_dir().join(format!("coachbase-test-{}", Uuid::new_v4()));
    App::new(&data_dir).expect("failed to build test app")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Wednesday morning, used as the reference instant across suites.
pub fn wednesday_9am() -> DateTime<Utc> {
    at(2024, 3, 13, 9, 0)
}

pub async fn seed_user(app: &App, first_name: &str, last_name: &str, role: UserRole) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        role,
        profile: ClientProfile::default(),
        created_at: wednesday_9am(),
    };
    app.db.insert_user(&user).await.expect("seed user");
    user
}

pub async fn seed_trainer(app: &App) -> User {
    seed_user(app, "Tess", "Trainer", UserRole::Trainer).await
}

pub async fn seed_client(app: &App, first_name: &str, last_name: &str) -> User {
    seed_user(app, first_name, last_name, UserRole::Client).await
}

pub async fn seed_relation(
    app: &App,
    trainer_id: &str,
    client_id: &str,
    status: RelationStatus,
) -> Relation {
    let relation = Relation {
        id: Uuid::new_v4().to_string(),
        trainer_id: trainer_id.to_string(),
        client_id: client_id.to_string(),
        status,
        created_at: wednesday_9am(),
        ended_at: None,
    };
    app.db.insert_relation(&relation).await.expect("seed relation");
    relation
}

pub async fn seed_session(
    app: &App,
    trainer_id: &str,
    client_id: &str,
    start_time: DateTime<Utc>,
    status: SessionStatus,
) -> Session {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        trainer_id: trainer_id.to_string(),
        client_id: client_id.to_string(),
        workout_id: None,
        workout_name: None,
        session_type: SessionType::Studio,
        status,
        start_time,
        end_time: start_time + Duration::hours(1),
        created_at: wednesday_9am(),
        updated_at: wednesday_9am(),
    };
    app.db.insert_session(&session).await.expect("seed session");
    session
}

pub async fn seed_invite(app: &App, trainer_id: &str) -> InviteToken {
    let invite = InviteToken {
        token: Uuid::new_v4().to_string(),
        trainer_id: trainer_id.to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        used: false,
        created_at: wednesday_9am(),
        used_at: None,
    };
    app.db.insert_invite(&invite).await.expect("seed invite");
    invite
}
