//! # wikirelay-core
//!
//! Core types, configuration, and trait definitions for wikirelay.
//!
//! This crate provides the error type, environment-driven configuration,
//! shared default constants, and the DTOs that flow between the HTTP
//! surface and the outbound gateways.

pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{ContentConfig, GeminiConfig};
pub use error::{Error, Result};
pub use models::*;
pub use traits::GenerationBackend;
