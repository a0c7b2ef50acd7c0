#![allow(dead_code)]

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tavern_api::generate::{GenerateError, Generator};
use tavern_api::{AppState, AppStateInner};
use tavern_client::api::{CreateCharacterRequest, CreatePromptRequest};
use tavern_client::{ApiClient, ClientConfig};
use tavern_db::Database;

/// Answers every prompt with the same two-line reply.
pub struct CannedGenerator;

pub const CANNED_REPLY: &str = "Good morning!<br>Lovely day.";

impl Generator for CannedGenerator {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
        _max_length: u32,
    ) -> BoxFuture<'a, Result<String, GenerateError>> {
        Box::pin(async { Ok(CANNED_REPLY.to_string()) })
    }
}

pub struct Backend {
    pub client: ApiClient,
    pub state: AppState,
}

/// The real router over an in-memory store, on an ephemeral port.
pub async fn spawn_backend() -> anyhow::Result<Backend> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let state = AppStateInner::new(Database::open_in_memory()?, Arc::new(CannedGenerator));
    let app = tavern_api::router(state.clone());
    let client = serve(app).await?;
    Ok(Backend { client, state })
}

pub async fn serve(app: axum::Router) -> anyhow::Result<ApiClient> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(ApiClient::new(&ClientConfig::new(format!("http://{addr}")))?)
}

pub fn character(name: &str) -> CreateCharacterRequest {
    CreateCharacterRequest {
        name: name.to_string(),
        description: "A cheerful neighbour".into(),
        personality: "Warm".into(),
        background: "Grew up by the sea".into(),
        voice: None,
    }
}

pub fn prompt(title: &str) -> CreatePromptRequest {
    CreatePromptRequest {
        title: title.to_string(),
        description: "Start the day".into(),
        context: "It is early morning".into(),
        setup: vec!["Greet the user".into()],
        create_audio: false,
        create_images: false,
    }
}
