//! Page HTTP handlers.
//!
//! Each handler validates its input, delegates to the content gateway for
//! exactly one outbound call, and returns the platform's JSON (reshaped
//! only for the single-page read).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use wikirelay_core::{defaults, Error};
use wikirelay_core::{CopyPageRequest, CreatePageRequest, PageView, UpdatePageRequest};

use super::{require, PaginationQuery};
use crate::{ApiError, AppState};

/// Query parameters for `GET /api/pages/:pageId`.
#[derive(Debug, Deserialize)]
pub struct GetPageQuery {
    /// Comma-separated expansion fields; defaults to rendered body,
    /// version, and space.
    pub expand: Option<String>,
}

/// Fetch a page and reshape it into the simplified view.
pub async fn get_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Query(query): Query<GetPageQuery>,
) -> Result<Json<PageView>, ApiError> {
    let expand = query.expand.as_deref().unwrap_or(defaults::PAGE_EXPAND);
    let data = state.content.get_page(&page_id, expand).await?;
    Ok(Json(PageView::from_platform(&data)))
}

/// List all pages (fixed large page-size cap).
pub async fn get_all_pages(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let data = state.content.list_all_pages().await?;
    Ok(Json(data))
}

/// Create a page. Title is required; content, parent, and space key are
/// optional with gateway-side defaults.
pub async fn create_page(
    State(state): State<AppState>,
    Json(req): Json<CreatePageRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let title = require(&req.title, "Title is required")?;

    let data = state
        .content
        .create_page(
            title,
            req.content.as_deref(),
            req.parent_id.as_deref(),
            req.space_key.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// Update a page. The caller supplies the version it just read; the
/// gateway sends that version incremented by one.
pub async fn update_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(req): Json<UpdatePageRequest>,
) -> Result<Json<Value>, ApiError> {
    const MESSAGE: &str = "Title, content, and version are required";
    let title = require(&req.title, MESSAGE)?;
    let content = require(&req.content, MESSAGE)?;
    let Some(version) = req.version else {
        return Err(Error::InvalidInput(MESSAGE.to_string()).into());
    };

    let data = state
        .content
        .update_page(&page_id, title, content, version)
        .await?;
    Ok(Json(data))
}

/// Delete a page. Success requires an upstream 204 exactly.
pub async fn delete_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut data = state.content.delete_page(&page_id).await?;
    if let Some(obj) = data.as_object_mut() {
        obj.insert(
            "message".to_string(),
            json!(format!("Page {page_id} deleted successfully")),
        );
    }
    Ok(Json(data))
}

/// List child pages, paginated.
pub async fn get_child_pages(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Value>, ApiError> {
    let data = state
        .content
        .get_child_pages(&page_id, query.limit(), query.start())
        .await?;
    Ok(Json(data))
}

/// List all attachments of a page.
pub async fn get_attachments(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let data = state.content.get_attachments(&page_id).await?;
    Ok(Json(data))
}

/// List pages in a space, paginated.
pub async fn get_space_pages(
    State(state): State<AppState>,
    Path(space_key): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Value>, ApiError> {
    let data = state
        .content
        .get_space_pages(&space_key, query.limit(), query.start())
        .await?;
    Ok(Json(data))
}

/// Copy a page (never its descendants) to a parent page or space.
pub async fn copy_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(req): Json<CopyPageRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_title = require(&req.new_title, "New title is required")?;

    let data = state
        .content
        .copy_page(
            &page_id,
            new_title,
            req.parent_id.as_deref(),
            req.space_key.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(data)))
}
