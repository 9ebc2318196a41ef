use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use chirp_types::Message;
use chirp_types::api::{NewMessage, UpdateMessageRequest};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;

/// 200 with a JSON body, or 200 with no body at all when there is nothing to
/// report. Absence on lookups is not an error.
fn json_or_empty<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(req) = payload?;
    let message = run_blocking(&state, move |s| s.messages.create_message(&req)).await?;
    Ok(Json(message))
}

pub async fn get_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run_blocking(&state, |s| s.messages.get_all_messages()).await?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let message = run_blocking(&state, move |s| s.messages.get_message_by_id(message_id)).await?;
    Ok(json_or_empty(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, ApiError> {
    let removed =
        run_blocking(&state, move |s| s.messages.delete_message_by_id(message_id)).await?;
    Ok(json_or_empty(removed))
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<usize>, ApiError> {
    let Json(req) = payload?;
    let updated = run_blocking(&state, move |s| {
        s.messages.update_message_by_id(message_id, &req.message_text)
    })
    .await?;
    Ok(Json(updated))
}

pub async fn get_account_messages(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages =
        run_blocking(&state, move |s| s.messages.get_all_messages_by_account_id(account_id))
            .await?;
    Ok(Json(messages))
}
