//! Data adapters for the two upstream sources.
//!
//! Exactly two adapters exist and the set is fixed:
//!
//! - [`HistoricalArchive`]: seasons 1950 to present from an Ergast-compatible
//!   archive API, fronted by an opaque on-disk cache.
//! - [`OpenF1Client`]: current-season and near-live data from the OpenF1 REST
//!   API, via a generic query builder plus typed convenience calls.
//!
//! Adapters surface errors unmodified; the tool registry turns them into
//! structured payloads. No adapter retries anything.

mod historical;
mod live;
mod registry;

pub use historical::HistoricalArchive;
pub use live::OpenF1Client;
pub use registry::{
    openf1_registry, EndpointRegistry, Filter, FilterKind, FilterOp, FilterSpec, ValueKind,
};

/// Errors that can occur when querying a data source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested year/event/session/driver does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// The query was well-formed but matched no records where at least one
    /// was required
    #[error("No records matched the query")]
    EmptyResult,

    /// Network failure or upstream outage
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    /// Parameter failed schema or bounds validation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Upstream responded with something we could not decode
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (telemetry store, cache directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Stable wire name for structured error payloads. Decode and IO failures
    /// surface as upstream unavailability: the caller can't do anything
    /// different about them.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::EmptyResult => "empty_result",
            Self::Upstream(_) | Self::Parse(_) | Self::Io(_) => "upstream_unavailable",
            Self::InvalidParameter(_) => "invalid_parameter",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SourceError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(SourceError::EmptyResult.kind(), "empty_result");
        assert_eq!(SourceError::Upstream("x".into()).kind(), "upstream_unavailable");
        assert_eq!(SourceError::Parse("x".into()).kind(), "upstream_unavailable");
        assert_eq!(
            SourceError::InvalidParameter("x".into()).kind(),
            "invalid_parameter"
        );
    }
}
