//! Shared test support: scripted generation backend, router construction
//! against a mocked platform, and a oneshot request helper.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use wikirelay_api::{router, AppState};
use wikirelay_core::{ContentConfig, Error, GenerationBackend, Result};
use wikirelay_gateway::ContentClient;
use wikirelay_inference::{QuerySynthesizer, ResultRanker};

/// Generation backend that replays a fixed script of responses.
///
/// Each `generate` call pops the next entry: `Some(text)` succeeds with
/// that text, `None` fails, and an exhausted script always fails. An empty
/// script therefore models a model that is down.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedBackend {
    pub fn new<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
        })
    }

    /// A backend whose every call fails.
    pub fn down() -> Arc<Self> {
        Self::new([])
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| Error::Inference("model unavailable".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Build the router against a mocked platform and the given backend.
pub fn app(server: &MockServer, backend: Arc<dyn GenerationBackend>) -> axum::Router {
    let state = AppState {
        content: Arc::new(ContentClient::new(ContentConfig {
            base_url: server.uri(),
            email: "user@example.com".to_string(),
            api_token: "token123".to_string(),
            space_key: "ENG".to_string(),
        })),
        synthesizer: Arc::new(QuerySynthesizer::new(Arc::clone(&backend))),
        ranker: Arc::new(ResultRanker::new(backend)),
    };
    router(state)
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(
    app: axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
