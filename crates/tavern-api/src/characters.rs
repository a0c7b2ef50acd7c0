use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tavern_types::api::{ApiResponse, CreateCharacterRequest, UpdateCharacterRequest};
use tavern_types::models::Character;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

pub async fn list_characters(State(state): State<AppState>) -> ApiResult<Vec<Character>> {
    let characters = blocking(&state, |db| db.list_characters()).await?;
    Ok(Json(ApiResponse::ok(characters, "Characters retrieved successfully")))
}

pub async fn get_character(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Character> {
    let character = blocking(&state, move |db| db.get_character(&slug)).await?;
    Ok(Json(ApiResponse::ok(character, "Character retrieved successfully")))
}

pub async fn create_character(
    State(state): State<AppState>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Character>>), ApiError> {
    let character = blocking(&state, move |db| db.create_character(req.into())).await?;
    info!("Created character '{}'", character.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(character, "Character created successfully")),
    ))
}

pub async fn update_character(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateCharacterRequest>,
) -> ApiResult<Character> {
    let character = blocking(&state, move |db| db.update_character(&slug, req)).await?;
    Ok(Json(ApiResponse::ok(character, "Character updated successfully")))
}

pub async fn delete_character(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<()> {
    blocking(&state, move |db| db.delete_character(&slug)).await?;
    Ok(Json(ApiResponse::empty("Character deleted successfully")))
}
