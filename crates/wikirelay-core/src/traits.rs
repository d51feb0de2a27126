//! Core traits for wikirelay abstractions.

use async_trait::async_trait;

use crate::error::Result;

/// Single-turn text generation against an external model.
///
/// The synthesis and ranking services depend on this trait rather than a
/// concrete client, so tests can substitute a canned backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one prompt and return the model's raw text response.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the generation model in use.
    fn model_name(&self) -> &str;
}
