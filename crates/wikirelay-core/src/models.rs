//! Transient DTOs for the façade.
//!
//! Nothing here is persisted: every value is constructed per request and
//! discarded after the response is written. Inbound bodies use camelCase
//! field names to match the JSON wire convention.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// INBOUND REQUEST BODIES
// =============================================================================

/// Body of `POST /api/pages`.
///
/// Required fields are `Option` so that handlers can reject missing input
/// with a 400 validation error before any outbound call is made.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub parent_id: Option<String>,
    pub space_key: Option<String>,
}

/// Body of `PUT /api/pages/:pageId`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Version read immediately prior to the update. The outbound payload
    /// sends this value incremented by exactly one.
    pub version: Option<i64>,
}

/// Body of `POST /api/pages/:pageId/copy`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPageRequest {
    pub new_title: Option<String>,
    pub parent_id: Option<String>,
    pub space_key: Option<String>,
}

/// Body of `POST /api/labels/:pageId`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddLabelsRequest {
    pub labels: Option<Vec<String>>,
}

/// Body of `POST /api/search/intelligent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntelligentSearchRequest {
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

// =============================================================================
// QUERY SYNTHESIS
// =============================================================================

/// A synthesized structured query plus explanatory metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuerySpec {
    /// CQL query string, ready to send to the platform search resource.
    pub cql: String,
    /// Human-readable explanation of the search.
    pub insights: String,
    /// Keyword entities extracted from the user's query.
    pub entities: Vec<String>,
}

// =============================================================================
// PAGE VIEW (reshaped get-page response)
// =============================================================================

/// Simplified page representation returned by `GET /api/pages/:pageId`.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub id: Value,
    #[serde(rename = "type")]
    pub page_type: Value,
    pub title: Value,
    pub version: PageVersion,
    pub space: PageSpace,
    pub body: PageBody,
}

/// Version metadata of a page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageVersion {
    pub number: Option<i64>,
    pub minor_edit: Option<bool>,
    /// Display name of the author of this version.
    pub by: Option<String>,
    pub when: Option<String>,
}

/// Space reference of a page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSpace {
    pub id: Value,
    pub key: Option<String>,
    pub name: Option<String>,
}

/// Rendered page body.
#[derive(Debug, Clone, Serialize)]
pub struct PageBody {
    /// Rendered view markup (storage markup is write-only).
    pub content: Option<String>,
}

impl PageView {
    /// Reshape a raw platform page object into the simplified view.
    ///
    /// Absent upstream fields become JSON nulls rather than errors; the
    /// façade does not own the upstream schema.
    pub fn from_platform(data: &Value) -> Self {
        let str_at = |ptr: &str| data.pointer(ptr).and_then(Value::as_str).map(String::from);
        Self {
            id: data.get("id").cloned().unwrap_or(Value::Null),
            page_type: data.get("type").cloned().unwrap_or(Value::Null),
            title: data.get("title").cloned().unwrap_or(Value::Null),
            version: PageVersion {
                number: data.pointer("/version/number").and_then(Value::as_i64),
                minor_edit: data.pointer("/version/minorEdit").and_then(Value::as_bool),
                by: str_at("/version/by/displayName"),
                when: str_at("/version/when"),
            },
            space: PageSpace {
                id: data.pointer("/space/id").cloned().unwrap_or(Value::Null),
                key: str_at("/space/key"),
                name: str_at("/space/name"),
            },
            body: PageBody {
                content: str_at("/body/view/value"),
            },
        }
    }
}
