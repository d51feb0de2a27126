//! Content platform REST client.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use wikirelay_core::defaults;
use wikirelay_core::{ContentConfig, Error, Result};

use crate::normalize::{normalize, parse_body};

/// Gateway to the content platform.
///
/// Holds read-only configuration fixed at process start: the Basic
/// credential and API base are computed once in the constructor. Each
/// method issues exactly one outbound call and returns whatever the
/// response normalizer yields.
pub struct ContentClient {
    client: Client,
    base_url: String,
    api_base: String,
    auth_header: String,
    space_key: String,
}

impl ContentClient {
    /// Create a client from explicit configuration.
    pub fn new(config: ContentConfig) -> Self {
        Self {
            client: Client::new(),
            auth_header: config.auth_header(),
            api_base: config.api_base(),
            base_url: config.base_url,
            space_key: config.space_key,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
    }

    /// Fetch a page by id with the given expansion fields.
    #[instrument(skip(self), fields(component = "gateway", op = "get_page"))]
    pub async fn get_page(&self, page_id: &str, expand: &str) -> Result<Value> {
        let url = format!("{}/{}", self.api_base, page_id);
        let response = self.get(&url).query(&[("expand", expand)]).send().await?;
        normalize(response).await
    }

    /// List all pages, capped at the fixed large page size.
    #[instrument(skip(self), fields(component = "gateway", op = "list_all_pages"))]
    pub async fn list_all_pages(&self) -> Result<Value> {
        let response = self
            .get(&self.api_base)
            .query(&[("limit", defaults::LIST_ALL_LIMIT)])
            .send()
            .await?;
        normalize(response).await
    }

    /// Create a page. Content defaults to a placeholder body; the space key
    /// falls back to the configured default; a parent id becomes an
    /// ancestor reference.
    #[instrument(skip(self, content), fields(component = "gateway", op = "create_page"))]
    pub async fn create_page(
        &self,
        title: &str,
        content: Option<&str>,
        parent_id: Option<&str>,
        space_key: Option<&str>,
    ) -> Result<Value> {
        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": { "key": space_key.unwrap_or(&self.space_key) },
            "body": {
                "storage": {
                    "value": content.unwrap_or(defaults::PLACEHOLDER_BODY),
                    "representation": "storage"
                }
            }
        });
        if let Some(parent) = parent_id {
            payload["ancestors"] = json!([{ "id": parent }]);
        }

        let response = self
            .client
            .post(&self.api_base)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        normalize(response).await
    }

    /// Update a page. The outbound payload carries `version + 1`; the
    /// caller must supply the version it just read (the platform rejects
    /// stale versions).
    #[instrument(skip(self, content), fields(component = "gateway", op = "update_page", version))]
    pub async fn update_page(
        &self,
        page_id: &str,
        title: &str,
        content: &str,
        version: i64,
    ) -> Result<Value> {
        let payload = json!({
            "id": page_id,
            "type": "page",
            "title": title,
            "version": { "number": version + 1 },
            "body": {
                "storage": {
                    "value": content,
                    "representation": "storage"
                }
            }
        });

        let response = self
            .client
            .put(format!("{}/{}", self.api_base, page_id))
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        normalize(response).await
    }

    /// Delete a page. Success is defined as HTTP 204 exactly; any other
    /// status, including a 200 with a body, is an upstream failure.
    #[instrument(skip(self), fields(component = "gateway", op = "delete_page"))]
    pub async fn delete_page(&self, page_id: &str) -> Result<Value> {
        let response = self
            .client
            .delete(format!("{}/{}", self.api_base, page_id))
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 204 {
            debug!(page_id, "Page deleted");
            return Ok(json!({ "success": true, "pageId": page_id }));
        }

        let text = response.text().await?;
        Err(Error::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            details: parse_body(&text),
        })
    }

    /// List child pages, paginated.
    #[instrument(skip(self), fields(component = "gateway", op = "get_child_pages"))]
    pub async fn get_child_pages(&self, page_id: &str, limit: u32, start: u32) -> Result<Value> {
        let url = format!("{}/{}/child/page", self.api_base, page_id);
        let response = self
            .get(&url)
            .query(&[("limit", limit), ("start", start)])
            .send()
            .await?;
        normalize(response).await
    }

    /// List all attachment children of a page.
    #[instrument(skip(self), fields(component = "gateway", op = "get_attachments"))]
    pub async fn get_attachments(&self, page_id: &str) -> Result<Value> {
        let url = format!("{}/{}/child/attachment", self.api_base, page_id);
        let response = self.get(&url).send().await?;
        normalize(response).await
    }

    /// List pages in a space, paginated.
    #[instrument(skip(self), fields(component = "gateway", op = "get_space_pages"))]
    pub async fn get_space_pages(&self, space_key: &str, limit: u32, start: u32) -> Result<Value> {
        let response = self
            .get(&self.api_base)
            .query(&[
                ("spaceKey", space_key),
                ("limit", &limit.to_string()),
                ("start", &start.to_string()),
                ("expand", defaults::SPACE_PAGE_EXPAND),
            ])
            .send()
            .await?;
        normalize(response).await
    }

    /// Copy a single page (never its descendants) to a new parent page or
    /// space. A parent id wins over a space key when both are given.
    #[instrument(skip(self), fields(component = "gateway", op = "copy_page"))]
    pub async fn copy_page(
        &self,
        page_id: &str,
        new_title: &str,
        parent_id: Option<&str>,
        space_key: Option<&str>,
    ) -> Result<Value> {
        let destination = match parent_id {
            Some(parent) => json!({ "type": "parent_page", "value": parent }),
            None => json!({
                "type": "space",
                "value": space_key.unwrap_or(&self.space_key)
            }),
        };
        let payload = json!({
            "destination": destination,
            "pageTitle": new_title,
            "copyDescendants": false
        });

        let url = format!("{}/rest/api/content/{}/copy", self.base_url, page_id);
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        normalize(response).await
    }

    /// Execute a raw CQL search against the platform's search resource.
    #[instrument(skip(self), fields(component = "gateway", op = "search", cql))]
    pub async fn search(&self, cql: &str, limit: u32, start: u32) -> Result<Value> {
        debug!(cql, limit, start, "Executing CQL search");
        let url = format!("{}/rest/api/content/search", self.base_url);
        let response = self
            .get(&url)
            .query(&[
                ("cql", cql),
                ("limit", &limit.to_string()),
                ("start", &start.to_string()),
            ])
            .send()
            .await?;
        normalize(response).await
    }

    /// List labels attached to a page.
    #[instrument(skip(self), fields(component = "gateway", op = "get_labels"))]
    pub async fn get_labels(&self, page_id: &str) -> Result<Value> {
        let url = format!("{}/{}/label", self.api_base, page_id);
        let response = self.get(&url).send().await?;
        normalize(response).await
    }

    /// Attach labels to a page under the `global` prefix.
    #[instrument(skip(self, labels), fields(component = "gateway", op = "add_labels", label_count = labels.len()))]
    pub async fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<Value> {
        let payload: Vec<Value> = labels
            .iter()
            .map(|label| json!({ "prefix": "global", "name": label }))
            .collect();

        let url = format!("{}/{}/label", self.api_base, page_id);
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        normalize(response).await
    }
}
