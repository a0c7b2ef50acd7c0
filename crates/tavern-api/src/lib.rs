//! HTTP handlers for the tavern backend.

pub mod characters;
pub mod chats;
pub mod error;
pub mod execute;
pub mod generate;
pub mod jobs;
pub mod prompts;
pub mod state;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use tavern_types::api::ApiResponse;

pub use state::{AppState, AppStateInner};

pub async fn health() -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok("OK".to_string(), "Server is running"))
}

/// Every `/api` route plus `/health`. Layers are left to the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/characters",
            get(characters::list_characters).post(characters::create_character),
        )
        .route(
            "/api/characters/{slug}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route("/api/prompts", get(prompts::list_prompts).post(prompts::create_prompt))
        .route(
            "/api/prompts/{slug}",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        // static segment wins over {key}: a legacy slug of "run" is unreachable here
        .route("/api/jobs/run", post(jobs::run_job))
        .route(
            "/api/jobs/{key}",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/{key}/run", post(jobs::run_stored_job))
        .route("/api/test/prompt", post(jobs::test_prompt))
        .route("/api/test/character", post(jobs::test_character))
        .route("/api/chats", get(chats::list_chats).post(chats::create_chat))
        .route(
            "/api/chats/{character}",
            get(chats::get_chat)
                .put(chats::update_chat)
                .delete(chats::delete_chat),
        )
        .route("/api/chats/{character}/messages", post(chats::add_message))
        .route(
            "/api/chats/{character}/messages/{index}",
            put(chats::update_message).delete(chats::delete_message),
        )
        .route(
            "/api/chats/{character}/messages/{index}/read",
            put(chats::set_message_read),
        )
        .route("/api/chats/{character}/read-all", put(chats::mark_all_read))
        .with_state(state)
}
