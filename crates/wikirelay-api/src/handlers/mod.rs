//! Handler modules for wikirelay-api.

pub mod labels;
pub mod pages;
pub mod search;

use serde::Deserialize;

use wikirelay_core::{defaults, Error};

/// Shared `limit`/`start` pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

impl PaginationQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(defaults::PAGE_LIMIT)
    }

    pub fn start(&self) -> u32 {
        self.start.unwrap_or(defaults::PAGE_START)
    }
}

/// Reject `None` and empty strings with a validation error.
///
/// Validation runs before any gateway call is constructed, so a missing
/// required field never produces an outbound request. The returned
/// [`Error::InvalidInput`] converts to a 400 at the handler boundary.
pub(crate) fn require<'a>(field: &'a Option<String>, message: &str) -> Result<&'a str, Error> {
    field
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidInput(message.to_string()))
}
