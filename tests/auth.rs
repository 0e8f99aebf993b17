mod common;

use std::sync::Arc;

use projecthub_server::auth::{AuthService, TokenIssuer};
use projecthub_server::db::models::{ProfileChanges, Role};
use projecthub_server::error::{AppError, AuthError};
use projecthub_server::Settings;

use common::MemoryStore;

fn auth_service() -> AuthService {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let store = Arc::new(MemoryStore::default());
    AuthService::new(
        store,
        TokenIssuer::from_settings(&config.auth),
        config.auth.bcrypt_cost,
    )
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let service = auth_service();

    let registered = service
        .register("A", "a@x.com", "secret1", Role::User)
        .await
        .unwrap();

    // Register does not open a session; refresh has nothing to work with
    let err = service.refresh(None).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::MissingToken)));

    let login = service.login("a@x.com", "secret1").await.unwrap();
    assert_eq!(login.user.id, registered.id);

    // Active session: the persisted token refreshes and rotates
    let refreshed = service.refresh(Some(&login.refresh_token)).await.unwrap();
    assert_ne!(refreshed.refresh_token, login.refresh_token);

    let claims = service
        .token_issuer()
        .verify_access(&refreshed.access_token)
        .unwrap();
    assert_eq!(claims.sub, registered.id.to_string());

    // Rotation revoked the previous token
    let err = service
        .refresh(Some(&login.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::SessionRevoked)));

    // Logout returns the user to NoSession
    service.logout(registered.id).await.unwrap();
    let err = service
        .refresh(Some(&refreshed.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::SessionRevoked)));

    // Logging out again is harmless
    service.logout(registered.id).await.unwrap();
}

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let service = auth_service();
    service
        .register("A", "a@x.com", "secret1", Role::User)
        .await
        .unwrap();

    let first = service.login("a@x.com", "secret1").await.unwrap();
    let second = service.login("a@x.com", "secret1").await.unwrap();

    let err = service.refresh(Some(&first.refresh_token)).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::SessionRevoked)));

    assert!(service.refresh(Some(&second.refresh_token)).await.is_ok());
}

#[tokio::test]
async fn test_change_password_swaps_which_password_verifies() {
    let service = auth_service();
    let user = service
        .register("A", "a@x.com", "secret1", Role::User)
        .await
        .unwrap();

    service
        .change_password(user.id, "secret1", "secret2")
        .await
        .unwrap();

    let err = service.login("a@x.com", "secret1").await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
    assert!(service.login("a@x.com", "secret2").await.is_ok());
}

#[tokio::test]
async fn test_update_profile_email_rules() {
    let service = auth_service();
    let a = service
        .register("A", "a@x.com", "secret1", Role::User)
        .await
        .unwrap();
    let b = service
        .register("B", "b@x.com", "secret1", Role::User)
        .await
        .unwrap();

    // Taking another user's email is a conflict
    let err = service
        .update_profile(
            b.id,
            ProfileChanges {
                email: Some("a@x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::EmailExists)));

    // Keeping one's own email is not
    let updated = service
        .update_profile(
            b.id,
            ProfileChanges {
                email: Some("b@x.com".to_string()),
                name: Some("B2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "B2");

    // A vanished user id surfaces as not-found
    let ghost = uuid::Uuid::new_v4();
    let err = service
        .update_profile(ghost, ProfileChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    let _ = a;
}
