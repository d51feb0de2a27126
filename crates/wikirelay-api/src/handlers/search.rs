//! Search HTTP handlers.
//!
//! `GET /api/search` is a raw CQL passthrough. `POST /api/search/intelligent`
//! runs the three-stage pipeline: query synthesis, platform search, then AI
//! re-ranking. Synthesis and ranking degrade silently; only the platform
//! search itself can fail the request.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use wikirelay_core::IntelligentSearchRequest;

use super::{require, PaginationQuery};
use crate::{ApiError, AppState};

/// Query parameters for `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct RawSearchQuery {
    pub cql: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

/// Execute a caller-supplied CQL query unchanged.
pub async fn raw_search(
    State(state): State<AppState>,
    Query(query): Query<RawSearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let cql = require(&query.cql, "CQL query parameter is required")?;
    let pagination = PaginationQuery {
        limit: query.limit,
        start: query.start,
    };

    let data = state
        .content
        .search(cql, pagination.limit(), pagination.start())
        .await?;
    Ok(Json(data))
}

/// Natural-language search: synthesize CQL, run the platform search, then
/// re-rank the results.
pub async fn intelligent_search(
    State(state): State<AppState>,
    Json(req): Json<IntelligentSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    let query = require(&req.query, "Query parameter is required")?;
    let pagination = PaginationQuery {
        limit: req.limit,
        start: req.start,
    };

    // Stage 1: free text → CQL. Never fails; a model failure yields the
    // literal-text fallback spec.
    let spec = state.synthesizer.synthesize(query).await.into_spec();

    // Stage 2: the only fallible stage. Upstream search failures propagate
    // with the platform's status.
    let search_results = state
        .content
        .search(&spec.cql, pagination.limit(), pagination.start())
        .await?;
    let total_results = search_results
        .get("size")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    // Stage 3: re-rank. A ranking failure returns the results unchanged.
    let ranked = state.ranker.rank(query, search_results).await;

    Ok(Json(json!({
        "originalQuery": query,
        "generatedCQL": spec.cql,
        "aiInsights": spec.insights,
        "results": ranked,
        "metadata": {
            "totalResults": total_results,
            "limit": pagination.limit(),
            "start": pagination.start(),
        }
    })))
}
