//! Centralized default constants for wikirelay.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates should reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// CONTENT PLATFORM
// =============================================================================

/// Default expansion fields when fetching a single page.
pub const PAGE_EXPAND: &str = "body.view,version,space";

/// Expansion fields for space page listings.
pub const SPACE_PAGE_EXPAND: &str = "version,space";

/// Placeholder storage body for pages created without content.
pub const PLACEHOLDER_BODY: &str = "<p>New page</p>";

/// Fixed page-size cap for the list-all-pages operation.
pub const LIST_ALL_LIMIT: u32 = 1000;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated listings and searches.
pub const PAGE_LIMIT: u32 = 25;

/// Default pagination offset.
pub const PAGE_START: u32 = 0;

// =============================================================================
// RANKING
// =============================================================================

/// Number of leading results summarized for the ranking prompt.
/// Results beyond this window always receive the default score.
pub const RANK_WINDOW: usize = 10;

/// Relevance score applied when the model omits an index.
pub const DEFAULT_RELEVANCE_SCORE: u32 = 50;

/// Relevance reason applied when the model omits an index.
pub const DEFAULT_RELEVANCE_REASON: &str = "Standard match";

/// Character cap for body snippets embedded in the ranking prompt.
pub const EXCERPT_MAX_CHARS: usize = 200;

// =============================================================================
// TEXT GENERATION
// =============================================================================

/// Default Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

// =============================================================================
// SERVER
// =============================================================================

/// Default listening port.
pub const PORT: u16 = 3000;
