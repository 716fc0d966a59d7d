mod support;

use chrono::Duration;

use coachbase::models::{RelationStatus, SessionStatus, SessionType};
use coachbase::scheduling::SessionFilters;
use coachbase::sessions::NewSession;
use coachbase::AppError;

use support::*;

fn filters(status: Option<&str>, range: Option<&str>, date: Option<&str>) -> SessionFilters {
    SessionFilters {
        status_filter: status.map(str::to_string),
        time_range: range.map(str::to_string),
        specific_date: date.map(str::to_string),
    }
}

#[tokio::test]
async fn trainer_sessions_come_back_in_ascending_start_order() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    // Insert out of order on purpose.
    seed_session(&app, &trainer.id, &client.id, now + Duration::days(2), SessionStatus::Scheduled).await;
    seed_session(&app, &trainer.id, &client.id, now - Duration::days(1), SessionStatus::Completed).await;
    seed_session(&app, &trainer.id, &client.id, now + Duration::hours(1), SessionStatus::Scheduled).await;

    let sessions = app
        .sessions
        .sessions_for_trainer(&trainer.id, None, &filters(None, None, None), now)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 3);
    for pair in sessions.windows(2) {
        assert!(pair[0].session.start_time <= pair[1].session.start_time);
    }
    assert_eq!(sessions[0].client_name, "Ada Lovelace");
}

#[tokio::test]
async fn overdue_includes_yesterdays_scheduled_session_and_upcoming_excludes_it() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let yesterday = seed_session(
        &app,
        &trainer.id,
        &client.id,
        now - Duration::days(1),
        SessionStatus::Scheduled,
    )
    .await;
    seed_session(&app, &trainer.id, &client.id, now + Duration::days(1), SessionStatus::Scheduled).await;

    let overdue = app
        .sessions
        .sessions_for_client(&client.id, &filters(Some("overdue"), None, None), now)
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].session.id, yesterday.id);

    let upcoming = app
        .sessions
        .sessions_for_client(&client.id, &filters(Some("upcoming"), None, None), now)
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_ne!(upcoming[0].session.id, yesterday.id);
}

#[tokio::test]
async fn overdue_composed_with_a_week_range_respects_both_bounds() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    // Before this (Monday-based) week: range lower bound must exclude it.
    seed_session(&app, &trainer.id, &client.id, now - Duration::days(4), SessionStatus::Scheduled).await;
    // This week, before now: the only expected hit.
    let hit = seed_session(&app, &trainer.id, &client.id, now - Duration::hours(2), SessionStatus::Scheduled).await;
    // This week, after now: overdue cutoff must exclude it.
    seed_session(&app, &trainer.id, &client.id, now + Duration::hours(2), SessionStatus::Scheduled).await;

    let sessions = app
        .sessions
        .sessions_for_trainer(&trainer.id, None, &filters(Some("overdue"), Some("week"), None), now)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session.id, hit.id);
}

#[tokio::test]
async fn specific_date_overrides_the_time_range_token() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let on_the_day = seed_session(&app, &trainer.id, &client.id, at(2024, 3, 1, 10, 0), SessionStatus::Completed).await;
    seed_session(&app, &trainer.id, &client.id, now + Duration::hours(1), SessionStatus::Scheduled).await;

    let sessions = app
        .sessions
        .sessions_for_trainer(
            &trainer.id,
            None,
            &filters(None, Some("week"), Some("2024-03-01")),
            now,
        )
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session.id, on_the_day.id);
}

#[tokio::test]
async fn malformed_specific_date_is_rejected() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;

    let err = app
        .sessions
        .sessions_for_trainer(
            &trainer.id,
            None,
            &filters(None, None, Some("garbage")),
            wednesday_9am(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn trainer_query_narrows_to_one_client() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let ada = seed_client(&app, "Ada", "Lovelace").await;
    let grace = seed_client(&app, "Grace", "Hopper").await;
    seed_relation(&app, &trainer.id, &ada.id, RelationStatus::Active).await;
    seed_relation(&app, &trainer.id, &grace.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    seed_session(&app, &trainer.id, &ada.id, now + Duration::hours(1), SessionStatus::Scheduled).await;
    seed_session(&app, &trainer.id, &grace.id, now + Duration::hours(2), SessionStatus::Scheduled).await;

    let sessions = app
        .sessions
        .sessions_for_trainer(&trainer.id, Some(grace.id.clone()), &filters(None, None, None), now)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session.client_id, grace.id);
    assert_eq!(sessions[0].client_name, "Grace Hopper");
}

#[tokio::test]
async fn clients_keep_reading_history_after_the_relation_ends() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    seed_session(&app, &trainer.id, &client.id, now - Duration::days(7), SessionStatus::Completed).await;
    app.relations.end_relation(&trainer.id, &client.id, now).await.unwrap();

    let sessions = app
        .sessions
        .sessions_for_client(&client.id, &filters(None, None, None), now)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn created_session_defaults_to_one_hour() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let start = now + Duration::days(1);
    let session = app
        .sessions
        .create_session(
            &trainer.id,
            NewSession {
                client_id: client.id.clone(),
                start_time: start,
                end_time: None,
                session_type: SessionType::Online,
                workout_id: None,
            },
            now,
        )
        .await
        .unwrap();

    assert_eq!(session.end_time, start + Duration::hours(1));
    assert_eq!(session.status, SessionStatus::Scheduled);

    let stored = app.db.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.end_time, session.end_time);
}

#[tokio::test]
async fn creating_a_session_requires_an_active_relation() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    // No relation seeded.

    let now = wednesday_9am();
    let err = app
        .sessions
        .create_session(
            &trainer.id,
            NewSession {
                client_id: client.id.clone(),
                start_time: now + Duration::days(1),
                end_time: None,
                session_type: SessionType::Studio,
                workout_id: None,
            },
            now,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoActiveRelation));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn end_before_start_is_rejected() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let start = now + Duration::days(1);
    let err = app
        .sessions
        .create_session(
            &trainer.id,
            NewSession {
                client_id: client.id.clone(),
                start_time: start,
                end_time: Some(start - Duration::minutes(30)),
                session_type: SessionType::Studio,
                workout_id: None,
            },
            now,
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn rescheduling_without_an_end_time_defaults_to_one_hour_and_persists() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let session =
        seed_session(&app, &trainer.id, &client.id, now + Duration::days(1), SessionStatus::Scheduled).await;

    let new_start = now + Duration::days(3);
    let moved = app
        .sessions
        .reschedule(&trainer.id, &session.id, new_start, None, now)
        .await
        .unwrap();

    assert_eq!(moved.start_time, new_start);
    assert_eq!(moved.end_time, new_start + Duration::hours(1));

    let stored = app.db.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.start_time, new_start);
    assert_eq!(stored.end_time, new_start + Duration::hours(1));
    assert_eq!(stored.updated_at, now);
}

#[tokio::test]
async fn rescheduling_rejects_an_end_at_or_before_the_start() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let session =
        seed_session(&app, &trainer.id, &client.id, now + Duration::days(1), SessionStatus::Scheduled).await;

    let new_start = now + Duration::days(3);
    let err = app
        .sessions
        .reschedule(&trainer.id, &session.id, new_start, Some(new_start), now)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    // Nothing moved.
    let stored = app.db.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.start_time, session.start_time);
}

#[tokio::test]
async fn only_the_owning_trainer_can_reschedule() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let other_trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let session =
        seed_session(&app, &trainer.id, &client.id, now + Duration::days(1), SessionStatus::Scheduled).await;

    let err = app
        .sessions
        .reschedule(&other_trainer.id, &session.id, now + Duration::days(2), None, now)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn created_session_snapshots_the_workout_name() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let workout = app
        .workouts
        .assign_workout(
            &trainer.id,
            coachbase::workouts::NewWorkout {
                client_id: client.id.clone(),
                name: "Lower body A".into(),
                exercises: vec![coachbase::models::Exercise {
                    name: "Squat".into(),
                    sets: 5,
                    reps: 5,
                    rest_seconds: 120,
                }],
            },
            now,
        )
        .await
        .unwrap();

    let session = app
        .sessions
        .create_session(
            &trainer.id,
            NewSession {
                client_id: client.id.clone(),
                start_time: now + Duration::days(1),
                end_time: None,
                session_type: SessionType::Studio,
                workout_id: Some(workout.id.clone()),
            },
            now,
        )
        .await
        .unwrap();

    assert_eq!(session.workout_name.as_deref(), Some("Lower body A"));

    let assigned = app.workouts.workouts_for_client(&client.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].exercises[0].name, "Squat");
}

#[tokio::test]
async fn only_the_owning_trainer_can_change_status() {
    let app = test_app();
    let trainer = seed_trainer(&app).await;
    let other_trainer = seed_trainer(&app).await;
    let client = seed_client(&app, "Ada", "Lovelace").await;
    seed_relation(&app, &trainer.id, &client.id, RelationStatus::Active).await;

    let now = wednesday_9am();
    let session =
        seed_session(&app, &trainer.id, &client.id, now + Duration::hours(1), SessionStatus::Scheduled).await;

    let err = app
        .sessions
        .update_status(&other_trainer.id, &session.id, SessionStatus::Completed, now)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let updated = app
        .sessions
        .update_status(&trainer.id, &session.id, SessionStatus::Completed, now)
        .await
        .unwrap();
    assert_eq!(updated.status, SessionStatus::Completed);
}
