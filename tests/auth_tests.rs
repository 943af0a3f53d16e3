//! Authentication flow tests
//!
//! Registration uniqueness, the OTP handshake (expiry, wrong code,
//! single-use), refresh tokens, and password changes.

use std::sync::Arc;

use agenthub::config::init_config;
use agenthub::errors::AgentHubError;
use agenthub::services::AuthService;
use agenthub::services::notify::LogNotifier;
use agenthub::storage::HubStorage;
use chrono::{Duration, Utc};
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

fn auth_service(storage: &Arc<HubStorage>) -> AuthService {
    AuthService::new(storage.clone(), Arc::new(LogNotifier))
}

fn assert_authentication(err: AgentHubError) {
    assert!(
        matches!(err, AgentHubError::Authentication(_)),
        "expected authentication error, got {:?}",
        err
    );
}

/// Register and activate an account, returning its id
async fn active_account(storage: &Arc<HubStorage>, auth: &AuthService, username: &str) -> i64 {
    let user = auth
        .register(
            &format!("{}@example.com", username),
            username,
            "hunter2hunter2",
        )
        .await
        .unwrap();
    storage.activate_user(user.id, user.id).await.unwrap();
    user.id
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_creates_inactive_user_with_hashed_password() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);

    let user = auth
        .register("alice@example.com", "alice", "hunter2hunter2")
        .await
        .unwrap();

    assert!(!user.is_active);
    assert_eq!(user.roles, vec!["user"]);
    assert!(user.password_hash.starts_with("$argon2"));
    assert_ne!(user.password_hash, "hunter2hunter2");
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);

    auth.register("alice@example.com", "alice", "hunter2hunter2")
        .await
        .unwrap();

    let err = auth
        .register("alice@example.com", "alice2", "hunter2hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentHubError::Conflict(_)));

    let err = auth
        .register("alice2@example.com", "alice", "hunter2hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentHubError::Conflict(_)));
}

// =============================================================================
// OTP handshake
// =============================================================================

#[tokio::test]
async fn test_login_requires_active_account() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);

    auth.register("bob@example.com", "bob", "hunter2hunter2")
        .await
        .unwrap();

    assert_authentication(auth.initiate_login("bob").await.unwrap_err());
    assert_authentication(auth.initiate_login("nobody").await.unwrap_err());
}

#[tokio::test]
async fn test_full_otp_roundtrip() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    active_account(&storage, &auth, "carol").await;

    let issue = auth.initiate_login("carol").await.unwrap();
    // Log notifier echoes the code for development flows
    let code = issue.otp_code.expect("log backend echoes the OTP");
    assert_eq!(code.len(), 6);
    assert_eq!(issue.expires_in_minutes, 5);

    let (tokens, user) = auth.verify_otp("carol", &code).await.unwrap();
    assert_eq!(user.username, "carol");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());

    // OTP is single-use
    assert_authentication(auth.verify_otp("carol", &code).await.unwrap_err());
}

#[tokio::test]
async fn test_wrong_otp_rejected_and_not_cleared() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    active_account(&storage, &auth, "carol").await;

    let issue = auth.initiate_login("carol").await.unwrap();
    let code = issue.otp_code.unwrap();

    let wrong = if code == "000000" { "000001" } else { "000000" };
    assert_authentication(auth.verify_otp("carol", wrong).await.unwrap_err());

    // The correct code still works after a failed attempt
    auth.verify_otp("carol", &code).await.unwrap();
}

#[tokio::test]
async fn test_expired_otp_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    let user_id = active_account(&storage, &auth, "dave").await;

    storage
        .set_user_otp(user_id, "123456", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    assert_authentication(auth.verify_otp("dave", "123456").await.unwrap_err());
}

#[tokio::test]
async fn test_verify_without_pending_otp_rejected() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    active_account(&storage, &auth, "erin").await;

    assert_authentication(auth.verify_otp("erin", "123456").await.unwrap_err());
}

#[tokio::test]
async fn test_new_login_replaces_previous_otp() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    active_account(&storage, &auth, "fred").await;

    let first = auth.initiate_login("fred").await.unwrap().otp_code.unwrap();
    let second = auth.initiate_login("fred").await.unwrap().otp_code.unwrap();

    if first != second {
        assert_authentication(auth.verify_otp("fred", &first).await.unwrap_err());
    }
    auth.verify_otp("fred", &second).await.unwrap();
}

// =============================================================================
// Refresh tokens
// =============================================================================

#[tokio::test]
async fn test_refresh_roundtrip() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    active_account(&storage, &auth, "gina").await;

    let code = auth.initiate_login("gina").await.unwrap().otp_code.unwrap();
    let (tokens, _) = auth.verify_otp("gina", &code).await.unwrap();

    let (new_tokens, user) = auth.refresh(&tokens.refresh_token).await.unwrap();
    assert_eq!(user.username, "gina");
    assert!(!new_tokens.access_token.is_empty());

    // An access token is not accepted as a refresh token
    assert_authentication(auth.refresh(&tokens.access_token).await.unwrap_err());
    assert_authentication(auth.refresh("garbage.token.value").await.unwrap_err());
}

#[tokio::test]
async fn test_refresh_rejected_for_deactivated_account() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    let user_id = active_account(&storage, &auth, "hank").await;

    let code = auth.initiate_login("hank").await.unwrap().otp_code.unwrap();
    let (tokens, _) = auth.verify_otp("hank", &code).await.unwrap();

    storage.deactivate_user(user_id).await.unwrap();
    assert_authentication(auth.refresh(&tokens.refresh_token).await.unwrap_err());
}

// =============================================================================
// Password changes
// =============================================================================

#[tokio::test]
async fn test_change_password_verifies_current() {
    let (storage, _dir) = create_temp_storage().await;
    let auth = auth_service(&storage);
    let user_id = active_account(&storage, &auth, "iris").await;
    let user = storage.find_user(user_id).await.unwrap().unwrap();

    let err = auth
        .change_password(&user, "wrong-password", "new-password-123")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentHubError::Validation(_)));

    auth.change_password(&user, "hunter2hunter2", "new-password-123")
        .await
        .unwrap();

    // Old hash replaced
    let updated = storage.find_user(user_id).await.unwrap().unwrap();
    assert_ne!(updated.password_hash, user.password_hash);
    auth.change_password(&updated, "new-password-123", "hunter2hunter2")
        .await
        .unwrap();
}
