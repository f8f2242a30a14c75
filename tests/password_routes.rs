use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::{Duration, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use evently::{db::entities::user, routes::router, test_helpers::test_state};

fn app(db: DatabaseConnection) -> axum::Router {
    router(test_state(db))
}

fn user_model(email: &str) -> user::Model {
    let now = FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp should be valid");
    user::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: "attendee".to_string(),
        reset_token: None,
        reset_token_expires_at: None,
    }
}

async fn json_response(
    app: axum::Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn request_reset_rejects_unknown_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json("/password/password-reset", json!({"email": "nobody@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "No account with that email");
}

#[tokio::test]
async fn request_reset_acknowledges_known_email() {
    let account = user_model("alice@example.com");
    let mut updated = account.clone();
    updated.reset_token = Some("stored-token".to_string());
    updated.reset_token_expires_at = Some(Utc::now().fixed_offset() + Duration::hours(1));

    // Lookup by email, then the token update (find + returning row). With no
    // mail config the reset link goes to the log.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account.clone()], vec![account], vec![updated]])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json("/password/password-reset", json!({"email": "alice@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reset email sent");
}

#[tokio::test]
async fn reset_with_unknown_token_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json(
            "/password/reset-password/no-such-token",
            json!({"password": "pw123456"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");
}

#[tokio::test]
async fn reset_with_expired_token_is_rejected() {
    let mut holder = user_model("alice@example.com");
    holder.reset_token = Some("expired-token".to_string());
    holder.reset_token_expires_at = Some(Utc::now().fixed_offset() - Duration::minutes(1));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![holder]])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json(
            "/password/reset-password/expired-token",
            json!({"password": "pw123456"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");
}

#[tokio::test]
async fn reset_with_valid_token_updates_password() {
    let mut holder = user_model("alice@example.com");
    holder.reset_token = Some("valid-token".to_string());
    holder.reset_token_expires_at = Some(Utc::now().fixed_offset() + Duration::hours(1));
    let mut cleared = holder.clone();
    cleared.reset_token = None;
    cleared.reset_token_expires_at = None;

    // Token lookup, then the password update (find + returning row).
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![holder.clone()], vec![holder], vec![cleared]])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json(
            "/password/reset-password/valid-token",
            json!({"password": "pw123456"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated");
}

#[tokio::test]
async fn reset_rejects_short_replacement_password() {
    let mut holder = user_model("alice@example.com");
    holder.reset_token = Some("valid-token".to_string());
    holder.reset_token_expires_at = Some(Utc::now().fixed_offset() + Duration::hours(1));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![holder]])
        .into_connection();

    let (status, body) = json_response(
        app(db),
        post_json(
            "/password/reset-password/valid-token",
            json!({"password": "short"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password too short");
}
