//! # wikirelay-inference
//!
//! Text-generation integration for wikirelay:
//!
//! - [`GeminiBackend`]: reqwest client for the Gemini `generateContent`
//!   endpoint, implementing [`wikirelay_core::GenerationBackend`].
//! - [`QuerySynthesizer`]: free text → CQL query plus insight metadata,
//!   with an infallible deterministic fallback.
//! - [`ResultRanker`]: model-assigned relevance scores merged onto a
//!   search result set.

mod cleanup;
mod gemini;
mod ranking;
mod synthesis;

pub use gemini::GeminiBackend;
pub use ranking::ResultRanker;
pub use synthesis::{DateAnchors, QuerySynthesizer, Synthesis};
