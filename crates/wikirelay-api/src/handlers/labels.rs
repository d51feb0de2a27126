//! Label HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use wikirelay_core::{AddLabelsRequest, Error};

use crate::{ApiError, AppState};

/// List labels attached to a page.
pub async fn get_labels(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let data = state.content.get_labels(&page_id).await?;
    Ok(Json(data))
}

/// Attach labels to a page. A non-empty labels array is required.
pub async fn add_labels(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(req): Json<AddLabelsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let labels = req
        .labels
        .as_deref()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::InvalidInput("Labels array is required".to_string()))?;

    let data = state.content.add_labels(&page_id, labels).await?;
    Ok((StatusCode::CREATED, Json(data)))
}
