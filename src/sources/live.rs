//! Live data adapter backed by the OpenF1 REST API.
//!
//! One generic query path (`query`) serves the exploratory tools, and a few
//! typed wrappers cover the common calls. Responses are JSON arrays of flat
//! records; an empty array is a valid answer for the generic path and only
//! the typed wrappers that promise a record treat it as an error.

use serde_json::Value;
use tracing::debug;

use crate::sources::registry::{openf1_registry, EndpointRegistry, Filter};
use crate::sources::SourceError;
use crate::utils::HttpClient;

/// Client for the OpenF1 API.
#[derive(Debug, Clone)]
pub struct OpenF1Client {
    http: HttpClient,
    registry: EndpointRegistry,
}

impl OpenF1Client {
    /// Create a client against the given base URL (e.g.
    /// `https://api.openf1.org/v1/`).
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            http,
            registry: openf1_registry(base_url),
        }
    }

    /// The endpoint/filter registry this client validates against.
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Query an endpoint with a set of filters. Filters are validated against
    /// the registry before any network traffic. An empty result set is
    /// returned as-is.
    pub async fn query(
        &self,
        endpoint: &str,
        filters: &[Filter],
    ) -> Result<Vec<Value>, SourceError> {
        let url = self.registry.build_query(endpoint, filters)?;
        debug!("openf1 query: {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "OpenF1 returned {} for {}",
                response.status(),
                endpoint
            )));
        }
        let records: Vec<Value> = response.json().await?;
        Ok(records)
    }

    /// Drivers entered in the latest session.
    pub async fn current_drivers(&self) -> Result<Vec<Value>, SourceError> {
        self.query("drivers", &[Filter::eq("session_key", "latest")])
            .await
    }

    /// The latest (or currently running) session. Errors if the API has no
    /// session to report.
    pub async fn latest_session(&self) -> Result<Value, SourceError> {
        let mut sessions = self
            .query("sessions", &[Filter::eq("session_key", "latest")])
            .await?;
        sessions.pop().ok_or(SourceError::EmptyResult)
    }

    /// Lap records for a session, optionally narrowed to one driver.
    pub async fn session_laps(
        &self,
        session_key: &str,
        driver_number: Option<u32>,
    ) -> Result<Vec<Value>, SourceError> {
        let mut filters = vec![Filter::eq("session_key", session_key)];
        if let Some(number) = driver_number {
            filters.push(Filter::eq("driver_number", number));
        }
        self.query("laps", &filters).await
    }

    /// Pit stop records for a session.
    pub async fn pit_stops(&self, session_key: &str) -> Result<Vec<Value>, SourceError> {
        self.query("pit", &[Filter::eq("session_key", session_key)])
            .await
    }
}
