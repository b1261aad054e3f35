//! Integration tests for the reqwest task API adapter.
//!
//! Each test runs a local mock server and checks the exact requests the
//! adapter sends and how it classifies the responses.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use tasklist_application::ports::{ApiError, TaskApi};
use tasklist_application::{AuthTokenProvider, TaskError, TaskRepository};
use tasklist_domain::{IdToken, Task, TaskTitle};
use tasklist_infrastructure::{ReqwestTaskApi, StaticIdentityProvider};

const TASK_JSON: &str = r#"{
    "__v": 0,
    "_id": "65f1c0",
    "completed": false,
    "createdAt": "2024-03-13T10:00:00.000Z",
    "title": "Buy milk",
    "userId": "uid-42"
}"#;

fn token() -> IdToken {
    IdToken::new("test-token", None)
}

fn expected_task(completed: bool) -> Task {
    Task {
        id: "65f1c0".to_string(),
        title: "Buy milk".to_string(),
        completed,
        created_at: "2024-03-13T10:00:00.000Z".to_string(),
        owner_id: "uid-42".to_string(),
        version: 0,
    }
}

#[tokio::test]
async fn test_list_sends_bearer_token_and_decodes_tasks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/apikey/tasks")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{TASK_JSON}]"))
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    let tasks = api.list(&token()).await.unwrap();

    assert_eq!(tasks, vec![expected_task(false)]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_posts_title_only() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/apikey/tasks")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "title": "Buy milk" })))
        .with_status(201)
        .with_body(TASK_JSON)
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    let title = TaskTitle::parse("Buy milk").unwrap();
    let task = api.create(&token(), &title).await.unwrap();

    assert_eq!(task, expected_task(false));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_patches_completed_flag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/apikey/tasks/65f1c0")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({ "completed": true })))
        .with_status(200)
        .with_body(TASK_JSON.replace("\"completed\": false", "\"completed\": true"))
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    let task = api.update_completed(&token(), "65f1c0", true).await.unwrap();

    assert_eq!(task, expected_task(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_completed_accepts_no_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/apikey/tasks")
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    api.delete_completed(&token()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_completed_ignores_summary_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/apikey/tasks")
        .with_status(200)
        .with_body(r#"{"deletedCount": 2}"#)
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    assert_eq!(api.delete_completed(&token()).await, Ok(()));
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _unauthorized = server
        .mock("GET", "/apikey/tasks")
        .with_status(401)
        .with_body(r#"{"message":"invalid token"}"#)
        .create_async()
        .await;
    let _failing = server
        .mock("PATCH", "/apikey/tasks/1")
        .with_status(500)
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();

    assert_eq!(
        api.list(&token()).await,
        Err(ApiError::Status { status: 401 })
    );
    assert_eq!(
        api.update_completed(&token(), "1", true).await,
        Err(ApiError::Status { status: 500 })
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/apikey/tasks")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let api = ReqwestTaskApi::new(&server.url()).unwrap();
    assert!(matches!(api.list(&token()).await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let api = ReqwestTaskApi::new("http://127.0.0.1:9").unwrap();
    let result = api.list(&token()).await;
    assert!(
        matches!(result, Err(ApiError::Connection(_) | ApiError::Timeout { .. })),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_silent_server_times_out_as_network_error() {
    // Accepted by the kernel backlog but never answered.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let api = ReqwestTaskApi::with_timeout(&url, 50).unwrap();
    assert_eq!(
        api.list(&token()).await,
        Err(ApiError::Timeout { timeout_ms: 50 })
    );

    let repository = TaskRepository::new(
        api,
        AuthTokenProvider::new(StaticIdentityProvider::new("test-token")),
    );
    assert_eq!(
        repository.list().await,
        Err(TaskError::Network(
            "request timed out after 50ms".to_string()
        ))
    );
    drop(listener);
}
