mod common;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tavern_client::api::ApiResponse;
use tavern_client::ClientError;
use tavern_client::chats::LOAD_FAILED;
use tavern_client::models::{Chat, Message};

/// A backend where Bob's archive fails with a 500 and Dave's comes back as a
/// failure envelope.
fn flaky_backend() -> Router {
    async fn names() -> Json<ApiResponse<Vec<String>>> {
        let names = ["Carol", "Bob", "Alice", "Dave"].map(String::from).to_vec();
        Json(ApiResponse::ok(names, "Chat names retrieved successfully"))
    }

    async fn chat(Path(slug): Path<String>) -> Response {
        match slug.as_str() {
            "bob" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "dave" => Json(ApiResponse::<Chat>::failure("disk on fire")).into_response(),
            "alice" => Json(ApiResponse::ok(
                Chat {
                    character: "Alice".into(),
                    messages: vec![Message {
                        text: vec!["a".into(), "b".into()],
                        ..Default::default()
                    }],
                },
                "ok",
            ))
            .into_response(),
            _ => Json(ApiResponse::ok(Chat::new("Carol"), "ok")).into_response(),
        }
    }

    Router::new()
        .route("/api/chats", get(names))
        .route("/api/chats/{slug}", get(chat))
}

#[tokio::test]
async fn test_failed_fetch_yields_degraded_row() -> anyhow::Result<()> {
    let client = common::serve(flaky_backend()).await?;
    let summaries = client.chats().list_summaries().await?;

    let order: Vec<_> = summaries.iter().map(|s| s.character.as_str()).collect();
    assert_eq!(order, ["Alice", "Bob", "Carol", "Dave"]);

    let alice = &summaries[0];
    assert_eq!(alice.last_message.as_deref(), Some("a b"));
    assert_eq!(alice.message_count, 1);
    assert_eq!(alice.unread_count, Some(1));

    for degraded in [&summaries[1], &summaries[3]] {
        assert_eq!(degraded.last_message.as_deref(), Some(LOAD_FAILED));
        assert_eq!(degraded.message_count, 0);
    }

    assert_eq!(summaries[2].message_count, 0);
    assert_ne!(summaries[2].last_message.as_deref(), Some(LOAD_FAILED));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_pass_isolates_failures_too() -> anyhow::Result<()> {
    let client = common::serve(flaky_backend()).await?;
    let sequential = client.chats().list_summaries().await?;
    let concurrent = client.chats().list_summaries_concurrent(3).await?;
    assert_eq!(concurrent, sequential);
    Ok(())
}

#[tokio::test]
async fn test_name_listing_failure_fails_the_pass() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/api/chats",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let client = common::serve(app).await?;

    let err = client.chats().list_summaries().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Failed to fetch chats: Service Unavailable");
    Ok(())
}

#[tokio::test]
async fn test_name_listing_without_data_is_malformed() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/api/chats",
        get(|| async { Json(ApiResponse::<Vec<String>>::empty("Chats retrieved")) }),
    );
    let client = common::serve(app).await?;

    let err = client.chats().list_summaries().await.unwrap_err();
    assert!(matches!(err, ClientError::Malformed(_)), "got {err:?}");
    assert_eq!(err.status(), None);
    Ok(())
}
