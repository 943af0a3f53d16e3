//! Engagement tracking tests
//!
//! Covers the view dedup window, counter/event-log consistency, the session
//! noise threshold, and click recording.

use agenthub::config::init_config;
use agenthub::storage::models::ROLE_USER;
use agenthub::storage::{AgentCategory, ClickType, HubStorage, NewAgent};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait};
use tempfile::TempDir;

async fn create_temp_storage() -> (HubStorage, TempDir) {
    init_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = HubStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

/// One user + one approved agent fixture
async fn fixture(storage: &HubStorage) -> (i64, i64) {
    let user = storage
        .insert_user(
            "viewer@example.com",
            "viewer",
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA",
            &[ROLE_USER.to_string()],
        )
        .await
        .unwrap();

    let agent = storage
        .insert_agent(NewAgent {
            name: "Tracked".to_string(),
            description: "An agent under observation".to_string(),
            app_url: "https://tracked.example.com".to_string(),
            category: AgentCategory::Operations,
            author_id: user.id,
        })
        .await
        .unwrap();

    (agent.id, user.id)
}

fn hour() -> Duration {
    Duration::minutes(60)
}

// =============================================================================
// View dedup
// =============================================================================

#[tokio::test]
async fn test_first_view_is_counted() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    let counted = storage.record_view(agent_id, user_id, hour()).await.unwrap();
    assert!(counted);
    assert_eq!(storage.count_view_events(agent_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_second_view_inside_window_is_suppressed() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    assert!(storage.record_view(agent_id, user_id, hour()).await.unwrap());
    assert!(!storage.record_view(agent_id, user_id, hour()).await.unwrap());
    assert!(!storage.record_view(agent_id, user_id, hour()).await.unwrap());

    // At most one event and one counter increment
    assert_eq!(storage.count_view_events(agent_id).await.unwrap(), 1);
    let agent = storage.find_agent(agent_id).await.unwrap().unwrap();
    assert_eq!(agent.view_count, 1);
}

#[tokio::test]
async fn test_view_past_window_is_counted_again() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    // Backdate the previous view beyond the window instead of sleeping
    use migration::entities::agent_view;
    agent_view::ActiveModel {
        agent_id: Set(agent_id),
        user_id: Set(user_id),
        viewed_at: Set(Utc::now() - Duration::minutes(61)),
        ..Default::default()
    }
    .insert(storage.get_db())
    .await
    .unwrap();

    let counted = storage.record_view(agent_id, user_id, hour()).await.unwrap();
    assert!(counted, "a view older than the window must not suppress");
    assert_eq!(storage.count_view_events(agent_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_dedup_is_per_user_and_per_agent() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    let other = storage
        .insert_user(
            "other@example.com",
            "other",
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA",
            &[ROLE_USER.to_string()],
        )
        .await
        .unwrap();
    let second_agent = storage
        .insert_agent(NewAgent {
            name: "Another".to_string(),
            description: "A second agent".to_string(),
            app_url: "https://another.example.com".to_string(),
            category: AgentCategory::Hr,
            author_id: other.id,
        })
        .await
        .unwrap();

    assert!(storage.record_view(agent_id, user_id, hour()).await.unwrap());
    // Different user, same agent: counted
    assert!(storage.record_view(agent_id, other.id, hour()).await.unwrap());
    // Same user, different agent: counted
    assert!(
        storage
            .record_view(second_agent.id, user_id, hour())
            .await
            .unwrap()
    );

    assert_eq!(storage.count_view_events(agent_id).await.unwrap(), 2);
    assert_eq!(
        storage.count_view_events(second_agent.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_view_counter_never_drifts_from_event_log() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    // Zero-width window: every call counts
    for _ in 0..7 {
        storage
            .record_view(agent_id, user_id, Duration::zero())
            .await
            .unwrap();
    }
    // Suppressed calls must not touch the counter either
    for _ in 0..3 {
        storage.record_view(agent_id, user_id, hour()).await.unwrap();
    }

    let agent = storage.find_agent(agent_id).await.unwrap().unwrap();
    let events = storage.count_view_events(agent_id).await.unwrap();
    assert_eq!(agent.view_count as u64, events);
    assert_eq!(events, 7);
}

// =============================================================================
// Click recording
// =============================================================================

#[tokio::test]
async fn test_clicks_are_never_deduplicated() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    for _ in 0..3 {
        storage
            .insert_click(agent_id, user_id, ClickType::ModalOpen, None)
            .await
            .unwrap();
    }

    assert_eq!(storage.count_clicks(agent_id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_click_stores_type_and_referrer() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    let click = storage
        .insert_click(
            agent_id,
            user_id,
            ClickType::ExternalLink,
            Some("catalog".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(click.click_type, ClickType::ExternalLink);
    assert_eq!(click.referrer.as_deref(), Some("catalog"));
    assert_eq!(click.agent_id, agent_id);
}

// =============================================================================
// Session recording
// =============================================================================

#[tokio::test]
async fn test_session_start_is_backcomputed() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    let session = storage
        .insert_session(agent_id, user_id, 90.0)
        .await
        .unwrap();

    let span = session.session_end - session.session_start;
    assert_eq!(span.num_seconds(), 90);
    assert_eq!(session.duration_seconds, 90.0);
    assert_eq!(storage.count_sessions(agent_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_session_fractional_duration() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    let session = storage
        .insert_session(agent_id, user_id, 2.5)
        .await
        .unwrap();

    assert!((session.duration_seconds - 2.5).abs() < f64::EPSILON);
    let span = session.session_end - session.session_start;
    assert_eq!(span.num_milliseconds(), 2500);
}

// =============================================================================
// Aggregate counts
// =============================================================================

#[tokio::test]
async fn test_views_since_filters_by_timestamp() {
    let (storage, _dir) = create_temp_storage().await;
    let (agent_id, user_id) = fixture(&storage).await;

    use migration::entities::agent_view;
    agent_view::ActiveModel {
        agent_id: Set(agent_id),
        user_id: Set(user_id),
        viewed_at: Set(Utc::now() - Duration::days(10)),
        ..Default::default()
    }
    .insert(storage.get_db())
    .await
    .unwrap();
    storage.record_view(agent_id, user_id, hour()).await.unwrap();

    assert_eq!(storage.count_all_views().await.unwrap(), 2);
    assert_eq!(
        storage
            .count_views_since(Utc::now() - Duration::days(7))
            .await
            .unwrap(),
        1
    );

    // Cross-check the raw table
    let rows = agent_view::Entity::find()
        .all(storage.get_db())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}
