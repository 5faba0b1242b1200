//! E2E tests for anonymous feedback.

use fc_test_utils::{TestFeedbackServer, TEST_ROOM_UNKNOWN};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_anonymous_feedback_and_owner_lists(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (owner, _) = server.register("owner@x.com", "secret1").await?;
    let room = server.create_room(&owner, "Retro", None).await?;
    let room_id = room["id"].as_str().unwrap();

    let response = server
        .client()
        .post(format!("{}/rooms/{}/feedback", server.url(), room_id))
        .json(&json!({ "content": "<b>More</b> snacks " }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await?;
    assert_eq!(created["content"], "More snacks");
    assert_eq!(created["room_id"], room_id);

    let response = server
        .client()
        .get(format!("{}/rooms/{}/feedback", server.url(), room_id))
        .bearer_auth(&owner)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Value> = response.json().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["content"], "More snacks");

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_feedback_access_control(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (owner, _) = server.register("owner@x.com", "secret1").await?;
    let (stranger, _) = server.register("stranger@x.com", "secret1").await?;
    let room = server.create_room(&owner, "Retro", None).await?;
    let url = format!("{}/rooms/{}/feedback", server.url(), room["id"].as_str().unwrap());

    let anonymous = server.client().get(&url).send().await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let other = server.client().get(&url).bearer_auth(&stranger).send().await?;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_feedback_validation(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestFeedbackServer::spawn(pool).await?;
    let (owner, _) = server.register("owner@x.com", "secret1").await?;
    let room = server.create_room(&owner, "Retro", None).await?;
    let room_id = room["id"].as_str().unwrap();

    let empty = server
        .client()
        .post(format!("{}/rooms/{}/feedback", server.url(), room_id))
        .json(&json!({ "content": "  <p></p> " }))
        .send()
        .await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let wrong_type = server
        .client()
        .post(format!("{}/rooms/{}/feedback", server.url(), room_id))
        .json(&json!({ "content": ["hello"] }))
        .send()
        .await?;
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
    let body: Value = wrong_type.json().await?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let unknown = server
        .client()
        .post(format!("{}/rooms/{}/feedback", server.url(), TEST_ROOM_UNKNOWN))
        .json(&json!({ "content": "hello" }))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    Ok(())
}
