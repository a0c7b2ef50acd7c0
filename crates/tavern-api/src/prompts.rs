use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tavern_types::api::{ApiResponse, CreatePromptRequest, UpdatePromptRequest};
use tavern_types::models::Prompt;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

pub async fn list_prompts(State(state): State<AppState>) -> ApiResult<Vec<Prompt>> {
    let prompts = blocking(&state, |db| db.list_prompts()).await?;
    Ok(Json(ApiResponse::ok(prompts, "Prompts retrieved successfully")))
}

pub async fn get_prompt(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Prompt> {
    let prompt = blocking(&state, move |db| db.get_prompt(&slug)).await?;
    Ok(Json(ApiResponse::ok(prompt, "Prompt retrieved successfully")))
}

pub async fn create_prompt(
    State(state): State<AppState>,
    Json(req): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Prompt>>), ApiError> {
    let prompt = blocking(&state, move |db| db.create_prompt(req.into())).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(prompt, "Prompt created successfully")),
    ))
}

pub async fn update_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdatePromptRequest>,
) -> ApiResult<Prompt> {
    let prompt = blocking(&state, move |db| db.update_prompt(&slug, req)).await?;
    Ok(Json(ApiResponse::ok(prompt, "Prompt updated successfully")))
}

pub async fn delete_prompt(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<()> {
    blocking(&state, move |db| db.delete_prompt(&slug)).await?;
    Ok(Json(ApiResponse::empty("Prompt deleted successfully")))
}
