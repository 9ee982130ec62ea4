use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    error::{AppError, AppResult},
    models::{CommandCreated, CommandRecord, CreateCommandRequest},
    state::AppState,
};

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_command(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommandRequest>,
) -> AppResult<(StatusCode, Json<CommandCreated>)> {
    let (device_id, command) = validate_submission(payload)?;

    let record = state.engine.submit(device_id, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommandCreated {
            id: record.id,
            status: record.status,
        }),
    ))
}

pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommandRecord>> {
    let record = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| AppError::not_found("Command not found"))?;

    Ok(Json(record))
}

/// `device_id` is checked before `command`, so its message wins when both
/// fields are invalid. Any non-empty command string is accepted.
fn validate_submission(payload: CreateCommandRequest) -> AppResult<(String, String)> {
    let device_id = payload
        .device_id
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::validation("device_id is empty or missing"))?;

    let command = payload
        .command
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::validation("command is empty or missing"))?;

    Ok((device_id, command))
}
