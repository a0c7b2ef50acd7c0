use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tavern_types::api::{
    ApiResponse, CreateJobRequest, RunJobRequest, TestCharacterRequest, TestPromptRequest,
    UpdateJobRequest,
};
use tavern_types::models::{Job, Message};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::execute;
use crate::state::{AppState, blocking};

pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Vec<Job>> {
    let jobs = blocking(&state, |db| db.list_jobs()).await?;
    Ok(Json(ApiResponse::ok(jobs, "Jobs retrieved successfully")))
}

/// `key` is a job ID or a legacy `character-prompt` slug.
pub async fn get_job(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Job> {
    let job = blocking(&state, move |db| db.get_job(&key)).await?;
    Ok(Json(ApiResponse::ok(job, "Job retrieved successfully")))
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Job>>), ApiError> {
    let job = blocking(&state, move |db| db.create_job(req)).await?;
    let message = match job.id {
        Some(id) => format!("Job created successfully with ID '{id}'"),
        None => "Job created successfully".to_string(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(job, message))))
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> ApiResult<Job> {
    let job = blocking(&state, move |db| db.update_job(&key, req)).await?;
    Ok(Json(ApiResponse::ok(job, "Job updated successfully")))
}

pub async fn delete_job(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<()> {
    blocking(&state, move |db| db.delete_job(&key)).await?;
    Ok(Json(ApiResponse::empty("Job deleted successfully")))
}

/// Run a stored job. The result always goes to the chat archive.
pub async fn run_stored_job(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Message> {
    let job = blocking(&state, move |db| db.get_job(&key)).await?;
    info!("Running stored job {:?}", job.id);
    let message = execute::run_job(&state, job, true).await?;
    Ok(Json(ApiResponse::ok(message, "Job executed successfully")))
}

/// Run a job definition carried in the body.
pub async fn run_job(
    State(state): State<AppState>,
    Json(req): Json<RunJobRequest>,
) -> ApiResult<Message> {
    let message = execute::run_job(&state, req.job, req.save_to_chat_history).await?;
    Ok(Json(ApiResponse::ok(message, "Job executed successfully")))
}

pub async fn test_prompt(
    State(state): State<AppState>,
    Json(req): Json<TestPromptRequest>,
) -> ApiResult<Message> {
    let message =
        execute::test_prompt(&state, req.prompt, req.character_name, req.save_to_chat_history)
            .await?;
    Ok(Json(ApiResponse::ok(message, "Prompt test completed successfully")))
}

pub async fn test_character(
    State(state): State<AppState>,
    Json(req): Json<TestCharacterRequest>,
) -> ApiResult<Message> {
    let message =
        execute::test_character(&state, req.character, req.prompt_name, req.save_to_chat_history)
            .await?;
    Ok(Json(ApiResponse::ok(message, "Character test completed successfully")))
}
