//! API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::api::{ApiError, AppState};
use crate::types::{Comment, Fields};

/// Health check
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        collection: state.collection,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub collection: String,
}

/// List every comment
pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.store.find_all().await?;
    Ok(Json(comments))
}

/// Create a comment from an arbitrary JSON object
///
/// A body sent without a JSON content type is not parsed at all and the
/// comment is created with no caller fields.
pub async fn create_comment(
    State(state): State<AppState>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let fields = match payload {
        Ok(Json(fields)) => fields,
        Err(JsonRejection::MissingJsonContentType(_)) => Fields::new(),
        Err(rejection) => {
            // Unparseable and non-object bodies are the caller's fault; anything
            // else (e.g. an oversize body) keeps the extractor's status
            let status = match rejection {
                JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => rejection.status(),
            };
            return Err(ApiError::BadRequest {
                status,
                detail: rejection.body_text(),
            });
        }
    };

    let comment = state.store.insert_one(fields).await?;
    tracing::info!(id = %comment.id, "Comment created");

    Ok(Json(comment))
}

/// Delete a comment by id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.store.delete_by_id(&id).await? {
        Some(comment) => {
            tracing::info!(id = %comment.id, "Comment deleted");
            Ok(Json(MessageResponse {
                message: "Comment deleted",
            }))
        }
        None => Err(ApiError::NotFound),
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
