//! Login, provisioning and readiness against a real PostgreSQL database

mod common;

use axum::http::StatusCode;
use portfolio_api::config::AdminConfig;
use portfolio_api::error::ApiError;
use portfolio_api::repositories::UserRepository;
use portfolio_api::services::UserService;
use secrecy::SecretString;
use serde_json::json;

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, uuid::Uuid::new_v4())
}

async fn provision(app: &common::TestApp, email: &str, password: &str, roles: &[&str]) {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    UserService::provision(&app.pool, email, SecretString::new(password.to_string()), &roles)
        .await
        .expect("Failed to provision user");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_success_returns_token_with_roles() {
    let app = common::TestApp::new().await;
    let email = unique_email("login");
    provision(&app, &email, "SecurePassword123!", &["admin"]).await;

    let body = json!({ "email": email, "password": "SecurePassword123!" });
    let (status, response) = app.post("/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let token = response["access_token"].as_str().unwrap();

    let (status, profile) = app.get("/auth/profile", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    let profile: serde_json::Value = serde_json::from_str(&profile).unwrap();
    assert_eq!(profile["email"], email);
    assert_eq!(profile["roles"], json!(["admin"]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_wrong_password_and_unknown_email_match() {
    let app = common::TestApp::new().await;
    let email = unique_email("wrong");
    provision(&app, &email, "SecurePassword123!", &[]).await;

    let wrong = json!({ "email": email, "password": "WrongPassword123!" });
    let unknown = json!({ "email": unique_email("ghost"), "password": "SecurePassword123!" });

    let (wrong_status, wrong_body) = app.post("/auth/login", &wrong.to_string()).await;
    let (unknown_status, unknown_body) = app.post("/auth/login", &unknown.to_string()).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_roles_are_a_login_time_snapshot() {
    let app = common::TestApp::new().await;
    let email = unique_email("snapshot");
    provision(&app, &email, "SecurePassword123!", &["admin"]).await;

    let body = json!({ "email": email, "password": "SecurePassword123!" });
    let (_, response) = app.post("/auth/login", &body.to_string()).await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let token = response["access_token"].as_str().unwrap().to_string();

    // Deleting the account does not revoke the issued token
    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, _) = app.get("/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_provision_duplicate_email_conflicts() {
    let app = common::TestApp::new().await;
    let email = unique_email("duplicate");
    provision(&app, &email, "SecurePassword123!", &[]).await;

    let result = UserService::provision(
        &app.pool,
        &email,
        SecretString::new("SecurePassword123!".to_string()),
        &[],
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_ensure_admin_is_idempotent() {
    let app = common::TestApp::new().await;
    let admin = AdminConfig {
        email: Some(unique_email("admin")),
        password: Some("AdminPassword123!".to_string()),
    };

    assert!(UserService::ensure_admin(&app.pool, &admin).await.unwrap());
    assert!(!UserService::ensure_admin(&app.pool, &admin).await.unwrap());

    let user = UserRepository::find_by_email(&app.pool, admin.email.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.roles, vec!["admin".to_string()]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_readiness_reports_database_up() {
    let app = common::TestApp::new().await;

    let (status, body) = app.get("/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "up");
}
