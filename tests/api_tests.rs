//! HTTP API tests
//!
//! End-to-end handler tests over actix test services with a temporary
//! SQLite database: auth bypass paths, bearer enforcement, tracking acks,
//! and the admin guard.

use std::sync::Arc;

use actix_web::{App, test, web};
use agenthub::api::jwt::get_jwt_service;
use agenthub::api::services::{api_v1_routes, health};
use agenthub::config::init_config;
use agenthub::services::notify::{LogNotifier, Notifier};
use agenthub::services::{AdminService, AuthService};
use agenthub::storage::models::{ROLE_ADMIN, ROLE_USER};
use agenthub::storage::{AgentCategory, AgentStatus, HubStorage, NewAgent, User};
use tempfile::TempDir;

async fn create_temp_storage() -> (Arc<HubStorage>, TempDir) {
    init_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = HubStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

macro_rules! init_app {
    ($storage:expr) => {{
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        let auth_service = Arc::new(AuthService::new($storage.clone(), notifier.clone()));
        let admin_service = Arc::new(AdminService::new($storage.clone(), notifier.clone()));
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(notifier))
                .app_data(web::Data::new(auth_service))
                .app_data(web::Data::new(admin_service))
                .service(api_v1_routes())
                .route("/health", web::get().to(health::health_check)),
        )
        .await
    }};
}

fn bearer(username: &str) -> String {
    let token = get_jwt_service()
        .generate_access_token(username)
        .expect("token generation");
    format!("Bearer {}", token)
}

async fn active_user(storage: &HubStorage, username: &str) -> User {
    let user = storage
        .insert_user(
            &format!("{}@example.com", username),
            username,
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA",
            &[ROLE_USER.to_string()],
        )
        .await
        .unwrap();
    storage.activate_user(user.id, user.id).await.unwrap()
}

async fn active_admin(storage: &HubStorage, username: &str) -> User {
    let user = active_user(storage, username).await;
    storage
        .set_user_roles(user.id, &[ROLE_USER.to_string(), ROLE_ADMIN.to_string()])
        .await
        .unwrap()
}

async fn approved_agent(storage: &HubStorage, author_id: i64, admin_id: i64) -> i64 {
    let agent = storage
        .insert_agent(NewAgent {
            name: "Live Agent".to_string(),
            description: "An approved catalog entry".to_string(),
            app_url: "https://live.example.com".to_string(),
            category: AgentCategory::Engineering,
            author_id,
        })
        .await
        .unwrap();
    storage
        .set_agent_review(agent.id, AgentStatus::Approved, admin_id, None)
        .await
        .unwrap();
    agent.id
}

// =============================================================================
// Health and auth boundary
// =============================================================================

#[actix_web::test]
async fn test_health_is_public() {
    let (storage, _dir) = create_temp_storage().await;
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
}

#[actix_web::test]
async fn test_protected_routes_require_bearer() {
    let (storage, _dir) = create_temp_storage().await;
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/api/v1/agents").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/v1/agents")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_deactivated_user_is_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let user = active_user(&storage, "ghost").await;
    storage.deactivate_user(user.id).await.unwrap();
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/agents")
        .insert_header(("Authorization", bearer("ghost")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

// =============================================================================
// Registration and OTP login over HTTP
// =============================================================================

#[actix_web::test]
async fn test_register_then_duplicate_conflicts() {
    let (storage, _dir) = create_temp_storage().await;
    let app = init_app!(storage);

    let payload = serde_json::json!({
        "email": "alice@example.com",
        "username": "alice",
        "password": "hunter2hunter2",
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert!(body["data"]["user_id"].as_i64().unwrap() > 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_otp_login_flow_over_http() {
    let (storage, _dir) = create_temp_storage().await;
    let _user = active_user(&storage, "bob").await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("127.0.0.1:40001".parse().unwrap())
        .set_json(serde_json::json!({ "username": "bob" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let code = body["data"]["otp_code"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-otp")
        .peer_addr("127.0.0.1:40002".parse().unwrap())
        .set_json(serde_json::json!({ "username": "bob", "otp_code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["token_type"], "bearer");

    // The minted token works against a protected route
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "bob");
}

// =============================================================================
// Tracking endpoints
// =============================================================================

#[actix_web::test]
async fn test_track_click_validates_enum() {
    let (storage, _dir) = create_temp_storage().await;
    let admin = active_admin(&storage, "root").await;
    let user = active_user(&storage, "clicker").await;
    let agent_id = approved_agent(&storage, user.id, admin.id).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/track-click", agent_id))
        .insert_header(("Authorization", bearer("clicker")))
        .set_json(serde_json::json!({ "click_type": "double_click" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/track-click", agent_id))
        .insert_header(("Authorization", bearer("clicker")))
        .set_json(serde_json::json!({ "click_type": "new_tab", "referrer": "catalog" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Click tracked successfully");
    assert_eq!(body["data"]["click_type"], "new_tab");

    assert_eq!(storage.count_clicks(agent_id).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_track_session_threshold() {
    let (storage, _dir) = create_temp_storage().await;
    let admin = active_admin(&storage, "root").await;
    let user = active_user(&storage, "sitter").await;
    let agent_id = approved_agent(&storage, user.id, admin.id).await;
    let app = init_app!(storage);

    // At the threshold: acknowledged but not persisted
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/track-session", agent_id))
        .insert_header(("Authorization", bearer("sitter")))
        .set_json(serde_json::json!({ "duration_seconds": 1.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["accepted"], false);

    // Negative durations are noise, not errors
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/track-session", agent_id))
        .insert_header(("Authorization", bearer("sitter")))
        .set_json(serde_json::json!({ "duration_seconds": -4.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["accepted"], false);

    assert_eq!(storage.count_sessions(agent_id).await.unwrap(), 0);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/track-session", agent_id))
        .insert_header(("Authorization", bearer("sitter")))
        .set_json(serde_json::json!({ "duration_seconds": 12.5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["accepted"], true);

    assert_eq!(storage.count_sessions(agent_id).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_agent_detail_dedups_views() {
    let (storage, _dir) = create_temp_storage().await;
    let admin = active_admin(&storage, "root").await;
    let user = active_user(&storage, "visitor").await;
    let agent_id = approved_agent(&storage, user.id, admin.id).await;
    let app = init_app!(storage);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/agents/{}", agent_id))
            .insert_header(("Authorization", bearer("visitor")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["view_count"], 1);
    }

    assert_eq!(storage.count_view_events(agent_id).await.unwrap(), 1);
}

// =============================================================================
// Reviews over HTTP
// =============================================================================

#[actix_web::test]
async fn test_review_validation_and_stats() {
    let (storage, _dir) = create_temp_storage().await;
    let admin = active_admin(&storage, "root").await;
    let user = active_user(&storage, "writer").await;
    let agent_id = approved_agent(&storage, user.id, admin.id).await;
    let app = init_app!(storage);

    // Out-of-range rating
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/review", agent_id))
        .insert_header(("Authorization", bearer("writer")))
        .set_json(serde_json::json!({ "rating": 6, "review_text": "Way beyond five stars" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5001);

    // Too-short text
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/review", agent_id))
        .insert_header(("Authorization", bearer("writer")))
        .set_json(serde_json::json!({ "rating": 4, "review_text": "nice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5002);

    // Valid review
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/agents/{}/review", agent_id))
        .insert_header(("Authorization", bearer("writer")))
        .set_json(serde_json::json!({ "rating": 4, "review_text": "Works great for my use case" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/agents/{}/rating-stats", agent_id))
        .insert_header(("Authorization", bearer("writer")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["average_rating"], 4.0);
    assert_eq!(body["data"]["rating_count"], 1);
    assert_eq!(body["data"]["rating_distribution"]["4"], 1);
}

#[actix_web::test]
async fn test_own_review_helpful_vote_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let admin = active_admin(&storage, "root").await;
    let writer = active_user(&storage, "writer").await;
    let _voter = active_user(&storage, "voter").await;
    let agent_id = approved_agent(&storage, writer.id, admin.id).await;

    let review = storage
        .upsert_review(agent_id, writer.id, 5, "Honestly pretty excellent")
        .await
        .unwrap();
    let app = init_app!(storage);

    let uri = format!(
        "/api/v1/agents/{}/reviews/{}/helpful",
        agent_id, review.id
    );

    // Author's own vote is refused and leaves the count unchanged
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", bearer("writer")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5003);

    let unchanged = storage
        .find_review_by_id(agent_id, review.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.helpful_count, 0);

    // Someone else's vote counts
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", bearer("voter")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["helpful_count"], 1);
}

// =============================================================================
// Admin guard
// =============================================================================

#[actix_web::test]
async fn test_admin_routes_require_admin_role() {
    let (storage, _dir) = create_temp_storage().await;
    let _admin = active_admin(&storage, "root").await;
    let _user = active_user(&storage, "pleb").await;
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/stats")
        .insert_header(("Authorization", bearer("pleb")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/stats")
        .insert_header(("Authorization", bearer("root")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["users"]["admins"], 1);
}

#[actix_web::test]
async fn test_admin_agent_approval_over_http() {
    let (storage, _dir) = create_temp_storage().await;
    let _admin = active_admin(&storage, "root").await;
    let user = active_user(&storage, "author").await;
    let agent = storage
        .insert_agent(NewAgent {
            name: "Submission".to_string(),
            description: "Freshly submitted".to_string(),
            app_url: "https://submission.example.com".to_string(),
            category: AgentCategory::Business,
            author_id: user.id,
        })
        .await
        .unwrap();
    let app = init_app!(storage);

    let uri = format!("/api/v1/admin/agents/{}/approve", agent.id);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(("Authorization", bearer("root")))
        .set_json(serde_json::json!({ "approve": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "approved");

    // Terminal state: a second decision is refused
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(("Authorization", bearer("root")))
        .set_json(serde_json::json!({ "approve": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3003);
}
