//! # wikirelay-gateway
//!
//! Outbound gateway to the content platform's REST API.
//!
//! Every logical operation maps to exactly one HTTP call; responses are
//! funneled through [`normalize`] so that callers uniformly receive parsed
//! JSON or an [`Error::Upstream`](wikirelay_core::Error::Upstream) carrying
//! the upstream status and body.

mod client;
mod normalize;

pub use client::ContentClient;
pub use normalize::normalize;
