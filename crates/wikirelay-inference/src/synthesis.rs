//! Natural-language → CQL query synthesis.

use chrono::{DateTime, Datelike, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use wikirelay_core::{GenerationBackend, QuerySpec, Result};

use crate::cleanup::strip_code_fences;

/// Pre-computed relative-date anchors embedded in the synthesis prompt.
///
/// The model is instructed to use only these exact dates for recency
/// filters, never ones it invents itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAnchors {
    pub today: String,
    pub last_week: String,
    pub recent30: String,
    pub recent60: String,
    pub recent90: String,
    pub start_of_year: String,
}

impl DateAnchors {
    /// Compute anchors relative to the given instant.
    pub fn compute(now: DateTime<Utc>) -> Self {
        let day = |days_back: i64| (now - Duration::days(days_back)).format("%Y-%m-%d").to_string();
        Self {
            today: day(0),
            last_week: day(7),
            recent30: day(30),
            recent60: day(60),
            recent90: day(90),
            start_of_year: format!("{}-01-01", now.year()),
        }
    }
}

/// Outcome of a synthesis attempt.
///
/// Both variants carry a [`QuerySpec`] satisfying the same downstream
/// contract; the variant records whether the model produced it or the
/// deterministic fallback did.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis {
    /// The model returned a usable query.
    Generated(QuerySpec),
    /// The model call or its output failed; the literal-text fallback
    /// was substituted.
    Fallback(QuerySpec),
}

impl Synthesis {
    pub fn spec(&self) -> &QuerySpec {
        match self {
            Synthesis::Generated(spec) | Synthesis::Fallback(spec) => spec,
        }
    }

    pub fn into_spec(self) -> QuerySpec {
        match self {
            Synthesis::Generated(spec) | Synthesis::Fallback(spec) => spec,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Synthesis::Fallback(_))
    }
}

/// Converts a free-text query into a CQL query plus explanatory metadata
/// via a single model prompt.
pub struct QuerySynthesizer {
    backend: Arc<dyn GenerationBackend>,
}

impl QuerySynthesizer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Synthesize a query. Never fails: any model or parse failure yields
    /// the [`Synthesis::Fallback`] variant built from the literal input.
    pub async fn synthesize(&self, query: &str) -> Synthesis {
        match self.try_synthesize(query).await {
            Ok(spec) => {
                debug!(cql = %spec.cql, "CQL synthesized");
                Synthesis::Generated(spec)
            }
            Err(e) => {
                warn!(error = %e, "CQL synthesis failed, using basic text search");
                Synthesis::Fallback(fallback_spec(query))
            }
        }
    }

    async fn try_synthesize(&self, query: &str) -> Result<QuerySpec> {
        let anchors = DateAnchors::compute(Utc::now());
        let prompt = build_prompt(query, &anchors);
        let response = self.backend.generate(&prompt).await?;
        let cleaned = strip_code_fences(&response);
        let parsed: serde_json::Value = serde_json::from_str(&cleaned)?;

        // Missing fields individually fall back to the literal-text
        // defaults without discarding the rest of the model's output.
        let cql = parsed["cql"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| basic_text_query(query));
        let insights = parsed["insights"]
            .as_str()
            .filter(|s| !s.is_empty())
            .unwrap_or("Basic text search")
            .to_string();
        let entities = parsed["entities"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![query.to_string()]);

        Ok(QuerySpec {
            cql,
            insights,
            entities,
        })
    }
}

/// Plain text-contains query built from the literal input.
fn basic_text_query(query: &str) -> String {
    format!(r#"text ~ "{}""#, query)
}

/// The terminal recovery path: a basic text search that never fails.
fn fallback_spec(query: &str) -> QuerySpec {
    QuerySpec {
        cql: basic_text_query(query),
        insights: "Basic text search (AI generation failed)".to_string(),
        entities: vec![query.to_string()],
    }
}

/// Build the synthesis prompt: current date, the pre-computed anchors,
/// the literal query, and the fixed rule set for CQL the platform's REST
/// API actually accepts.
pub(crate) fn build_prompt(query: &str, anchors: &DateAnchors) -> String {
    format!(
        r#"You are an expert Confluence CQL builder for a team wiki powered by the REST API.

Current date: {today}

User query: "{query}"

Generate the BEST possible CQL that works reliably with Confluence Cloud REST API.

CRITICAL RULES:
- NEVER use creator = currentUser() → it does NOT work in API calls
- NEVER use functions like startOfMonth(), startOfWeek(), endOfDay() → they cause 400 errors
- When user says "I wrote", "my page", "I created", "recently I made" → interpret as "recent pages on this topic" and add a recent date filter
- Always search BOTH title and text → use (title ~ "x" OR text ~ "x")
- Be smart with keywords:
   → "nodejs" or "node" → search for "node.js" OR "nodejs" OR "node js"
   → acronyms like "api" → search "api" only (case-insensitive by default)
- Only add date filters when time is implied ("recently", "yesterday", "last week", "my page" etc.)
- Default type = page unless "blog" or "post" is mentioned

Date mapping (use exact dates below):
- "recently", "recent", "lately", "the other day" → created >= "{recent60}"
- "my page", "I wrote", "I created" (no explicit time) → created >= "{recent60}"
- "last week" → created >= "{last_week}"
- "last month" or "last 30 days" → created >= "{recent30}"
- "last 3 months" → created >= "{recent90}"
- "this year" → created >= "{start_of_year}"
- If NO time reference → do NOT add any date filter

Examples you must follow:
- "nodejs page I wrote recently" → type = page AND (title ~ "node" OR text ~ "node") AND created >= "{recent60}"
- "my google calendar integration" → type = page AND (title ~ "calendar" OR text ~ "calendar" OR title ~ "google" OR text ~ "google") AND created >= "{recent60}"
- "old kubernetes deployment guide" → type = page AND (title ~ "kubernetes" OR text ~ "kubernetes")
- "rest api with fetch" → type = page AND (text ~ "fetch" OR text ~ "rest api")

Respond ONLY with valid JSON (no markdown, no extra text, no code blocks):
{{
  "cql": "exact working CQL string",
  "insights": "short, user-friendly explanation of the search",
  "entities": ["main", "keywords", "detected"]
}}"#,
        today = anchors.today,
        query = query,
        recent60 = anchors.recent60,
        last_week = anchors.last_week,
        recent30 = anchors.recent30,
        recent90 = anchors.recent90,
        start_of_year = anchors.start_of_year,
    )
}
