use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tavern_types::api::{
    AddMessageRequest, ApiResponse, CreateChatRequest, SetReadRequest, UpdateChatRequest,
    UpdateMessageRequest,
};
use tavern_types::models::{Chat, Message};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

/// Archive display names, sorted.
pub async fn list_chats(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let names = blocking(&state, |db| db.list_chat_names()).await?;
    Ok(Json(ApiResponse::ok(names, "Chat names retrieved successfully")))
}

pub async fn get_chat(State(state): State<AppState>, Path(character): Path<String>) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| db.get_chat(&character)).await?;
    Ok(Json(ApiResponse::ok(chat, "Chat retrieved successfully")))
}

pub async fn create_chat(
    State(state): State<AppState>,
    Json(req): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Chat>>), ApiError> {
    let chat = blocking(&state, move |db| db.create_chat(&req.character)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(chat, "Chat created successfully")),
    ))
}

/// Only the character name can change; an empty body is a no-op.
pub async fn update_chat(
    State(state): State<AppState>,
    Path(character): Path<String>,
    Json(req): Json<UpdateChatRequest>,
) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| match req.character {
        Some(new_character) => db.rename_chat(&character, &new_character),
        None => db.get_chat(&character),
    })
    .await?;
    Ok(Json(ApiResponse::ok(chat, "Chat updated successfully")))
}

pub async fn delete_chat(State(state): State<AppState>, Path(character): Path<String>) -> ApiResult<()> {
    blocking(&state, move |db| db.delete_chat(&character)).await?;
    Ok(Json(ApiResponse::empty("Chat deleted successfully")))
}

pub async fn add_message(
    State(state): State<AppState>,
    Path(character): Path<String>,
    Json(req): Json<AddMessageRequest>,
) -> ApiResult<Chat> {
    let message = Message {
        text: req.text,
        audio: req.audio,
        images: req.images,
        read: req.read,
        timestamp: Some(req.timestamp.unwrap_or_else(Utc::now)),
    };
    let chat = blocking(&state, move |db| db.append_message(&character, message)).await?;
    Ok(Json(ApiResponse::ok(chat, "Message added successfully")))
}

pub async fn update_message(
    State(state): State<AppState>,
    Path((character, index)): Path<(String, usize)>,
    Json(req): Json<UpdateMessageRequest>,
) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| db.update_message(&character, index, req)).await?;
    Ok(Json(ApiResponse::ok(chat, "Message updated successfully")))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path((character, index)): Path<(String, usize)>,
) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| db.delete_message(&character, index)).await?;
    Ok(Json(ApiResponse::ok(chat, "Message deleted successfully")))
}

pub async fn set_message_read(
    State(state): State<AppState>,
    Path((character, index)): Path<(String, usize)>,
    Json(req): Json<SetReadRequest>,
) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| db.set_message_read(&character, index, req.read)).await?;
    Ok(Json(ApiResponse::ok(chat, "Message read status updated successfully")))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(character): Path<String>,
) -> ApiResult<Chat> {
    let chat = blocking(&state, move |db| db.mark_all_read(&character)).await?;
    Ok(Json(ApiResponse::ok(chat, "All messages marked as read")))
}
