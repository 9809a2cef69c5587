//! Utility modules supporting the data adapters and CLI.
//!
//! - [`HttpClient`]: shared HTTP client with sensible defaults
//! - [`CacheService`]: opaque disk cache for archive responses
//! - [`best_match`]: fuzzy name matching for Grands Prix, drivers, and teams
//! - [`validate_year`] / [`current_season`]: season bounds checking

mod cache;
mod fuzzy;
mod http;
mod validate;

pub use cache::{CacheResult, CacheService};
pub use fuzzy::best_match;
pub use http::HttpClient;
pub use validate::{current_season, validate_year, FIRST_SEASON};
