//! AI re-ranking of search results.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use wikirelay_core::defaults::{
    DEFAULT_RELEVANCE_REASON, DEFAULT_RELEVANCE_SCORE, EXCERPT_MAX_CHARS, RANK_WINDOW,
};
use wikirelay_core::{GenerationBackend, Result};

use crate::cleanup::strip_code_fences;

/// Attaches model-assigned relevance scores to a search result set and
/// reorders it. Never changes which items exist, only their score fields
/// and the order; any failure returns the input unchanged.
pub struct ResultRanker {
    backend: Arc<dyn GenerationBackend>,
}

impl ResultRanker {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Rank the `results` array inside a raw search response.
    ///
    /// Only the first [`RANK_WINDOW`] items are summarized for the model;
    /// every item beyond the window receives the default score. The full
    /// collection is then stable-sorted descending by score.
    pub async fn rank(&self, query: &str, mut search: Value) -> Value {
        let results = match search.get("results").and_then(Value::as_array) {
            Some(results) if !results.is_empty() => results.clone(),
            _ => return search,
        };

        match self.try_rank(query, &results).await {
            Ok(ranked) => {
                debug!(result_count = ranked.len(), "Results ranked");
                search["results"] = Value::Array(ranked);
                search
            }
            Err(e) => {
                warn!(error = %e, "Ranking failed, returning unranked results");
                search
            }
        }
    }

    async fn try_rank(&self, query: &str, results: &[Value]) -> Result<Vec<Value>> {
        let summary = results
            .iter()
            .take(RANK_WINDOW)
            .enumerate()
            .map(|(i, item)| summarize(i, item))
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = build_prompt(query, &summary, results.len().min(RANK_WINDOW));

        let response = self.backend.generate(&prompt).await?;
        let cleaned = strip_code_fences(&response);
        let entries: Vec<Value> = serde_json::from_str(&cleaned)?;

        let mut rankings: HashMap<usize, &Value> = HashMap::new();
        for entry in &entries {
            if let Some(index) = entry["index"].as_u64() {
                rankings.insert(index as usize, entry);
            }
        }

        let mut ranked: Vec<(u32, Value)> = results
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let entry = rankings.get(&i);
                // Scores are contractually 0-100; clamp whatever the model sent.
                let score = entry
                    .and_then(|e| e["relevanceScore"].as_u64())
                    .map(|s| s.min(100) as u32)
                    .unwrap_or(DEFAULT_RELEVANCE_SCORE);
                let reason = entry
                    .and_then(|e| e["reason"].as_str())
                    .unwrap_or(DEFAULT_RELEVANCE_REASON);

                let mut item = item.clone();
                if let Some(obj) = item.as_object_mut() {
                    obj.insert("relevanceScore".to_string(), json!(score));
                    obj.insert("relevanceReason".to_string(), json!(reason));
                }
                (score, item)
            })
            .collect();

        // sort_by is stable: ties keep merge order.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(ranked.into_iter().map(|(_, item)| item).collect())
    }
}

/// One line of the prompt's result summary: title plus excerpt, falling
/// back to a truncated body snippet.
fn summarize(index: usize, item: &Value) -> String {
    let title = item["title"].as_str().unwrap_or("Untitled");
    let excerpt = item["excerpt"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| {
            item.pointer("/body/view/value")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|s| truncate_chars(s, EXCERPT_MAX_CHARS))
        })
        .unwrap_or_else(|| "No content available".to_string());

    format!("{index}. Title: {title}\n   Excerpt: {excerpt}")
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn build_prompt(query: &str, summary: &str, count: usize) -> String {
    format!(
        r#"Given the user's search query and the following wiki search results,
rank them by relevance and provide a relevance score (0-100) for each.

User Query: "{query}"

Search Results:
{summary}

Respond ONLY with a valid JSON array (no markdown, no code blocks):
[
  {{
    "index": 0,
    "relevanceScore": 95,
    "reason": "why this is relevant"
  }}
]

Provide scores for all {count} results."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wikirelay_core::Error;

    struct CannedBackend {
        response: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedBackend {
        fn new(response: Option<&str>) -> Self {
            Self {
                response: response.map(String::from),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for CannedBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .ok_or_else(|| Error::Inference("model unavailable".to_string()))
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn results(n: usize) -> Value {
        let items: Vec<Value> = (0..n)
            .map(|i| json!({"title": format!("Page {i}"), "excerpt": format!("excerpt {i}")}))
            .collect();
        json!({"results": items, "size": n})
    }

    #[tokio::test]
    async fn test_results_beyond_window_get_defaults_and_sort_is_stable() {
        // Model scores only indices 0-9; score index 3 highest so order changes.
        let entries: Vec<Value> = (0..10)
            .map(|i| {
                json!({
                    "index": i,
                    "relevanceScore": if i == 3 { 99 } else { 60 },
                    "reason": format!("match {i}")
                })
            })
            .collect();
        let backend = Arc::new(CannedBackend::new(Some(
            &serde_json::to_string(&entries).unwrap(),
        )));
        let ranker = ResultRanker::new(backend);

        let ranked = ranker.rank("query", results(12)).await;
        let items = ranked["results"].as_array().unwrap();
        assert_eq!(items.len(), 12, "ranking must not add or drop items");

        // Highest score first.
        assert_eq!(items[0]["title"], json!("Page 3"));
        assert_eq!(items[0]["relevanceScore"], json!(99));

        // Ties at 60 keep their original relative order (stable sort).
        let sixty: Vec<&str> = items
            .iter()
            .filter(|i| i["relevanceScore"] == json!(60))
            .map(|i| i["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            sixty,
            vec![
                "Page 0", "Page 1", "Page 2", "Page 4", "Page 5", "Page 6", "Page 7", "Page 8",
                "Page 9"
            ]
        );

        // Items 10 and 11 were outside the window: default score and reason.
        let defaults: Vec<&Value> = items
            .iter()
            .filter(|i| i["relevanceScore"] == json!(50))
            .collect();
        assert_eq!(defaults.len(), 2);
        for item in defaults {
            assert_eq!(item["relevanceReason"], json!("Standard match"));
        }
    }

    #[tokio::test]
    async fn test_partial_entry_defaults_per_field() {
        // Entry 0 has an index but no score; entry 1 has no reason.
        let backend = Arc::new(CannedBackend::new(Some(
            r#"[{"index": 0, "reason": "topical"}, {"index": 1, "relevanceScore": 80}]"#,
        )));
        let ranker = ResultRanker::new(backend);

        let ranked = ranker.rank("q", results(2)).await;
        let items = ranked["results"].as_array().unwrap();
        assert_eq!(items[0]["relevanceScore"], json!(80));
        assert_eq!(items[0]["relevanceReason"], json!("Standard match"));
        assert_eq!(items[1]["relevanceScore"], json!(50));
        assert_eq!(items[1]["relevanceReason"], json!("topical"));
    }

    #[tokio::test]
    async fn test_out_of_range_scores_are_clamped_to_100() {
        // A score that would wrap under a 32-bit truncation must neither
        // wrap nor exceed the 0-100 contract.
        let backend = Arc::new(CannedBackend::new(Some(
            r#"[{"index": 0, "relevanceScore": 4294967397, "reason": "huge"},
                {"index": 1, "relevanceScore": 80, "reason": "sane"}]"#,
        )));
        let ranker = ResultRanker::new(backend);

        let ranked = ranker.rank("q", results(2)).await;
        let items = ranked["results"].as_array().unwrap();
        assert_eq!(items[0]["relevanceScore"], json!(100));
        assert_eq!(items[0]["title"], json!("Page 0"));
        assert_eq!(items[1]["relevanceScore"], json!(80));
    }

    #[tokio::test]
    async fn test_malformed_model_output_returns_input_unchanged() {
        let backend = Arc::new(CannedBackend::new(Some("I cannot rank these results.")));
        let ranker = ResultRanker::new(backend);

        let input = results(3);
        let output = ranker.rank("q", input.clone()).await;
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_backend_failure_returns_input_unchanged() {
        let ranker = ResultRanker::new(Arc::new(CannedBackend::new(None)));
        let input = results(3);
        let output = ranker.rank("q", input.clone()).await;
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_empty_results_skip_the_model_entirely() {
        let backend = Arc::new(CannedBackend::new(Some("[]")));
        let ranker = ResultRanker::new(Arc::clone(&backend) as Arc<dyn GenerationBackend>);

        let input = json!({"results": [], "size": 0});
        let output = ranker.rank("q", input.clone()).await;
        assert_eq!(output, input);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_summarize_prefers_excerpt_then_body_snippet() {
        let with_excerpt = json!({"title": "T", "excerpt": "E"});
        assert_eq!(summarize(0, &with_excerpt), "0. Title: T\n   Excerpt: E");

        let body = "x".repeat(300);
        let with_body = json!({"title": "T", "body": {"view": {"value": body}}});
        let line = summarize(1, &with_body);
        assert!(line.ends_with(&"x".repeat(200)));
        assert!(!line.contains(&"x".repeat(201)));

        let bare = json!({});
        assert_eq!(
            summarize(2, &bare),
            "2. Title: Untitled\n   Excerpt: No content available"
        );
    }

    #[test]
    fn test_truncate_chars_respects_codepoints() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }

    #[test]
    fn test_prompt_names_window_size() {
        let prompt = build_prompt("q", "0. Title: T", 7);
        assert!(prompt.contains("all 7 results"));
        assert!(prompt.contains(r#"User Query: "q""#));
    }
}
