//! E2E tests for room creation, lookup and join.

use fc_test_utils::{TestFeedbackServer, TEST_ROOM_INVALID, TEST_ROOM_UNKNOWN};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn join(
    server: &TestFeedbackServer,
    room_id: &str,
    body: Option<Value>,
) -> Result<reqwest::Response, anyhow::Error> {
    let mut request = server
        .client()
        .post(format!("{}/rooms/{}/join", server.url(), room_id));
    if let Some(body) = body {
        request = request.json(&body);
    }
    Ok(request.send().await?)
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_room_join_scenario(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, _) = server.register("owner@x.com", "secret1").await?;

    let locked = server.create_room(&token, "Retro", Some("topsecret")).await?;
    assert_eq!(locked["is_password_protected"], true);
    assert!(locked.get("password_hash").is_none());
    let locked_id = locked["id"].as_str().unwrap();
    assert_eq!(locked_id.len(), 6);

    let ok = join(&server, locked_id, Some(json!({ "password": "topsecret" }))).await?;
    assert_eq!(ok.status(), StatusCode::OK);
    let body: Value = ok.json().await?;
    assert_eq!(body["id"], locked_id);
    assert!(!body.to_string().contains("$2b$"));

    let wrong = join(&server, locked_id, Some(json!({ "password": "nope" }))).await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_ROOM_PASSWORD");

    let open = server.create_room(&token, "Open", None).await?;
    assert_eq!(open["is_password_protected"], false);
    let open_id = open["id"].as_str().unwrap();

    for body in [
        Some(json!({ "password": "" })),
        Some(json!({ "password": "anything" })),
        Some(json!({})),
        None,
    ] {
        let response = join(&server, open_id, body).await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_join_ignores_caller_identity(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (owner_token, _) = server.register("owner@x.com", "secret1").await?;
    let room = server
        .create_room(&owner_token, "Retro", Some("topsecret"))
        .await?;
    let room_id = room["id"].as_str().unwrap();

    // Even the owner needs the secret
    let response = server
        .client()
        .post(format!("{}/rooms/{}/join", server.url(), room_id))
        .bearer_auth(&owner_token)
        .json(&json!({ "password": "" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // And an anonymous caller with the secret gets in
    let response = join(&server, room_id, Some(json!({ "password": "topsecret" }))).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_join_unknown_room_returns_404(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    for room_id in [TEST_ROOM_UNKNOWN, TEST_ROOM_INVALID] {
        let response = join(&server, room_id, Some(json!({ "password": "x" }))).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{room_id}");
    }

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_room_requires_auth(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;

    let response = server
        .client()
        .post(format!("{}/rooms", server.url()))
        .json(&json!({ "name": "Retro" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
        .fetch_one(server.pool())
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_room_without_name_returns_400(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, _) = server.register("owner@x.com", "secret1").await?;

    let response = server
        .client()
        .post(format!("{}/rooms", server.url()))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_and_get_rooms(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (alice, _) = server.register("alice@x.com", "secret1").await?;
    let (bob, _) = server.register("bob@x.com", "secret1").await?;

    let first = server.create_room(&alice, "One", None).await?;
    server.create_room(&alice, "Two", Some("pw1234")).await?;
    server.create_room(&bob, "Bob's", None).await?;

    let response = server
        .client()
        .get(format!("{}/rooms", server.url()))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let rooms: Vec<Value> = response.json().await?;
    assert_eq!(rooms.len(), 2);
    assert!(rooms.iter().all(|r| r.get("password_hash").is_none()));

    let first_id = first["id"].as_str().unwrap();
    let response = server
        .client()
        .get(format!("{}/rooms/{}", server.url(), first_id))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["name"], "One");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_public_prefix_serves_room_access(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (token, _) = server.register("owner@x.com", "secret1").await?;
    let room = server.create_room(&token, "Retro", Some("topsecret")).await?;
    let room_id = room["id"].as_str().unwrap();
    let public = format!("{}/api/public/rooms/{}", server.url(), room_id);

    let lookup = server.client().get(&public).send().await?;
    assert_eq!(lookup.status(), StatusCode::OK);

    let joined = server
        .client()
        .post(format!("{public}/join"))
        .json(&json!({ "password": "topsecret" }))
        .send()
        .await?;
    assert_eq!(joined.status(), StatusCode::OK);

    let submitted = server
        .client()
        .post(format!("{public}/feedback"))
        .json(&json!({ "content": "hello" }))
        .send()
        .await?;
    assert_eq!(submitted.status(), StatusCode::CREATED);

    // Listing feedback stays owner-only and is not part of the public subset
    let listed = server
        .client()
        .get(format!("{public}/feedback"))
        .send()
        .await?;
    assert_eq!(listed.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
