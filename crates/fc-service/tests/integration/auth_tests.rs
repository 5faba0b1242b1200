//! E2E tests for registration, login and `/auth/me`.
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use fc_test_utils::{TestFeedbackServer, TokenAssertions};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Registration
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_happy_path(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    let response = server
        .client()
        .post(format!("{}/auth/register", server.url()))
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await?;
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["subscription_type"], "free");
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body.to_string().contains("$2b$"));

    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse()?;
    body["token"]
        .as_str()
        .unwrap()
        .to_string()
        .assert_valid_jwt()
        .assert_for_user(user_id);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_duplicate_email_returns_409(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    server.register("a@x.com", "secret1").await?;

    let response = server
        .client()
        .post(format!("{}/auth/register", server.url()))
        .json(&json!({ "email": "a@x.com", "password": "other1" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "EMAIL_TAKEN");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_invalid_input_returns_400(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    for payload in [
        json!({ "email": "not-an-email", "password": "secret1" }),
        json!({ "email": "a@x.com", "password": "123" }),
        json!({ "email": "a@x.com" }),
        json!({}),
    ] {
        let response = server
            .client()
            .post(format!("{}/auth/register", server.url()))
            .json(&payload)
            .send()
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload {payload} should be rejected"
        );
    }

    // Wrong types, bad JSON and a missing content type answer with the
    // same envelope as validation failures, without serde detail.
    for (body, content_type) in [
        (r#"{"email":5,"password":"secret1"}"#, Some("application/json")),
        (r#"{"email":"a@x.com","password":null}"#, Some("application/json")),
        ("not json", Some("application/json")),
        (r#"{"email":"a@x.com","password":"secret1"}"#, None),
    ] {
        let mut request = server
            .client()
            .post(format!("{}/auth/register", server.url()))
            .body(body);
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }
        let response = request.send().await?;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "body {body:?} should be rejected"
        );
        let envelope: Value = response.json().await?;
        assert_eq!(envelope["error"]["code"], "BAD_REQUEST");
        assert_eq!(envelope["error"]["message"], "Invalid request body");
        assert!(!envelope.to_string().contains("deserialize"));
    }

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_concurrent_same_email_one_winner(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let url = format!("{}/auth/register", server.url());

    let attempts = (0..2).map(|i| {
        let client = server.client().clone();
        let url = url.clone();
        async move {
            client
                .post(url)
                .json(&json!({ "email": "race@x.com", "password": format!("secret{i}") }))
                .send()
                .await
                .map(|r| r.status())
        }
    });

    let mut statuses = Vec::new();
    for handle in attempts.map(tokio::spawn).collect::<Vec<_>>() {
        statuses.push(handle.await??);
    }
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    Ok(())
}

// ============================================================================
// Login
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_scenario(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (first_token, user) = server.register("a@x.com", "secret1").await?;
    let user_id: Uuid = user["id"].as_str().unwrap().parse()?;

    let wrong = server
        .client()
        .post(format!("{}/auth/login", server.url()))
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let right = server
        .client()
        .post(format!("{}/auth/login", server.url()))
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(right.status(), StatusCode::OK);

    let body: Value = right.json().await?;
    let fresh_token = body["token"].as_str().unwrap().to_string();
    fresh_token.assert_valid_jwt().assert_for_user(user_id);

    // Both tokens stand on their own
    for token in [&first_token, &fresh_token] {
        let me = server
            .client()
            .get(format!("{}/auth/me", server.url()))
            .bearer_auth(token)
            .send()
            .await?;
        assert_eq!(me.status(), StatusCode::OK);
    }

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_unknown_email_matches_wrong_password(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    server.register("a@x.com", "secret1").await?;

    let mut bodies = Vec::new();
    for (email, password) in [("a@x.com", "wrong1"), ("nobody@x.com", "secret1")] {
        let response = server
            .client()
            .post(format!("{}/auth/login", server.url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.json::<Value>().await?);
    }

    assert_eq!(bodies[0], bodies[1]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_email_is_case_insensitive(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    server.register("a@x.com", "secret1").await?;

    let response = server
        .client()
        .post(format!("{}/auth/login", server.url()))
        .json(&json!({ "email": "  A@X.com ", "password": "secret1" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

// ============================================================================
// /auth/me
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_me_with_token_returns_account(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, user) = server.register("a@x.com", "secret1").await?;

    let response = server
        .client()
        .get(format!("{}/auth/me", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["id"], user["id"]);
    assert!(body.get("password_hash").is_none());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_me_without_token_returns_401(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    let response = server
        .client()
        .get(format!("{}/auth/me", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_me_with_malformed_header_returns_401(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, _) = server.register("a@x.com", "secret1").await?;

    for header in [
        format!("Token {token}"),
        format!("bearer {token}"),
        format!("Bearer  {token}"),
        "Bearer".to_string(),
    ] {
        let response = server
            .client()
            .get(format!("{}/auth/me", server.url()))
            .header("Authorization", header.as_str())
            .send()
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {header:?} should be rejected"
        );
    }

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_me_for_deleted_account_returns_404(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, user) = server.register("a@x.com", "secret1").await?;
    let user_id: Uuid = user["id"].as_str().unwrap().parse()?;

    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(user_id)
        .execute(server.pool())
        .await?;

    let response = server
        .client()
        .get(format!("{}/auth/me", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_api_prefix_serves_same_endpoints(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    let response = server
        .client()
        .post(format!("{}/api/auth/register", server.url()))
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await?;
    let token = body["token"].as_str().unwrap();

    let response = server
        .client()
        .get(format!("{}/auth/me", server.url()))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
