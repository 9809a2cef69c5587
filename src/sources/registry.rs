//! Registry of OpenF1 API endpoints and their filter parameters.
//!
//! The registry is static metadata: which resources exist, which filters each
//! one accepts, and enough description to generate help text and query
//! examples for agents exploring the API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::sources::SourceError;

/// How a filter compares against records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Exact match only
    Equality,
    /// Supports >, <, >=, <= as well as =
    Comparison,
}

/// The value type a filter expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Integer,
    DateTime,
    Boolean,
}

/// Specification for one API filter parameter.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSpec {
    pub name: &'static str,
    pub kind: FilterKind,
    pub value: ValueKind,
    pub description: &'static str,
    /// Restricted value set for equality filters, where one applies
    pub allowed: &'static [&'static str],
}

impl FilterSpec {
    /// Example query fragments for this filter.
    pub fn examples(&self) -> Vec<String> {
        match (self.kind, self.value) {
            (_, ValueKind::Boolean) => {
                vec![format!("{}=true", self.name), format!("{}=false", self.name)]
            }
            (FilterKind::Equality, _) if !self.allowed.is_empty() => self
                .allowed
                .iter()
                .take(2)
                .map(|v| format!("{}={}", self.name, v))
                .collect(),
            (FilterKind::Equality, ValueKind::String) => {
                vec![format!("{}=example_value", self.name)]
            }
            (FilterKind::Equality, ValueKind::Integer) => vec![format!("{}=42", self.name)],
            (FilterKind::Equality, ValueKind::DateTime) => {
                vec![format!("{}=2024-01-01T00:00:00Z", self.name)]
            }
            (FilterKind::Comparison, ValueKind::Integer) => vec![
                format!("{}>=10", self.name),
                format!("{}<100", self.name),
            ],
            (FilterKind::Comparison, ValueKind::DateTime) => vec![
                format!("{}>=2024-01-01T00:00:00Z", self.name),
                format!("{}<2024-12-31T00:00:00Z", self.name),
            ],
            (FilterKind::Comparison, ValueKind::String) => {
                vec![format!("{}>M", self.name), format!("{}<Z", self.name)]
            }
        }
    }

    /// Multi-line help text for this filter.
    pub fn help_text(&self) -> String {
        let mut text = format!("Filter: {}\n", self.name);
        text.push_str(&format!("  Type: {:?} ({:?})\n", self.kind, self.value));
        if !self.description.is_empty() {
            text.push_str(&format!("  Description: {}\n", self.description));
        }
        if !self.allowed.is_empty() {
            text.push_str(&format!("  Allowed values: {}\n", self.allowed.join(", ")));
        }
        let examples = self.examples();
        if !examples.is_empty() {
            text.push_str(&format!("  Examples: {}", examples.join(", ")));
        }
        text.trim_end().to_string()
    }
}

/// Comparison operator in a concrete filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOp {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

/// A concrete filter to apply to a query: name, operator, value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub name: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    /// Equality filter.
    pub fn eq(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            op: FilterOp::Eq,
            value: value.to_string(),
        }
    }

    /// Parse a filter value that may carry a leading comparison operator,
    /// e.g. `">=10"`, `"<2024-12-31"`, or a bare value meaning equality.
    pub fn parse(name: &str, raw: &str) -> Self {
        let raw = raw.trim();
        let (op, value) = if let Some(rest) = raw.strip_prefix(">=") {
            (FilterOp::Ge, rest)
        } else if let Some(rest) = raw.strip_prefix("<=") {
            (FilterOp::Le, rest)
        } else if let Some(rest) = raw.strip_prefix('>') {
            (FilterOp::Gt, rest)
        } else if let Some(rest) = raw.strip_prefix('<') {
            (FilterOp::Lt, rest)
        } else if let Some(rest) = raw.strip_prefix('=') {
            (FilterOp::Eq, rest)
        } else {
            (FilterOp::Eq, raw)
        };
        Self {
            name: name.to_string(),
            op,
            value: value.trim().to_string(),
        }
    }

    /// Render as a query-string fragment, value percent-encoded.
    pub fn to_query_fragment(&self) -> String {
        format!(
            "{}{}{}",
            self.name,
            self.op.as_str(),
            urlencoding::encode(&self.value)
        )
    }
}

/// Registry of endpoints and the filters each supports.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    base_url: String,
    endpoints: BTreeMap<&'static str, Vec<&'static str>>,
    filters: BTreeMap<&'static str, FilterSpec>,
}

impl EndpointRegistry {
    /// Create an empty registry with the given base URL (trailing slash
    /// expected, e.g. `https://api.openf1.org/v1/`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: BTreeMap::new(),
            filters: BTreeMap::new(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn define_filter(
        mut self,
        name: &'static str,
        kind: FilterKind,
        value: ValueKind,
        description: &'static str,
    ) -> Self {
        self.filters.insert(
            name,
            FilterSpec {
                name,
                kind,
                value,
                description,
                allowed: &[],
            },
        );
        self
    }

    fn define_filter_allowed(
        mut self,
        name: &'static str,
        kind: FilterKind,
        value: ValueKind,
        description: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        self.filters.insert(
            name,
            FilterSpec {
                name,
                kind,
                value,
                description,
                allowed,
            },
        );
        self
    }

    fn register_endpoint(mut self, endpoint: &'static str, filter_names: &[&'static str]) -> Self {
        for name in filter_names {
            assert!(
                self.filters.contains_key(name),
                "filter '{}' must be defined before endpoint '{}'",
                name,
                endpoint
            );
        }
        self.endpoints.insert(endpoint, filter_names.to_vec());
        self
    }

    /// All registered endpoint names, sorted.
    pub fn endpoints(&self) -> Vec<&'static str> {
        self.endpoints.keys().copied().collect()
    }

    /// Whether an endpoint is registered.
    pub fn has_endpoint(&self, endpoint: &str) -> bool {
        self.endpoints.contains_key(endpoint)
    }

    /// Full URL for an endpoint without filters.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<String, SourceError> {
        if !self.has_endpoint(endpoint) {
            return Err(SourceError::InvalidParameter(format!(
                "unknown endpoint '{}'; available: {}",
                endpoint,
                self.endpoints().join(", ")
            )));
        }
        Ok(format!("{}{}", self.base_url, endpoint))
    }

    /// The filter specs an endpoint supports, sorted by name.
    pub fn endpoint_filters(&self, endpoint: &str) -> Vec<&FilterSpec> {
        let mut specs: Vec<&FilterSpec> = self
            .endpoints
            .get(endpoint)
            .map(|names| names.iter().filter_map(|n| self.filters.get(n)).collect())
            .unwrap_or_default();
        specs.sort_by_key(|s| s.name);
        specs
    }

    /// Spec for a single filter, if defined.
    pub fn filter(&self, name: &str) -> Option<&FilterSpec> {
        self.filters.get(name)
    }

    /// Help text for one filter.
    pub fn filter_help(&self, name: &str) -> String {
        match self.filters.get(name) {
            Some(spec) => spec.help_text(),
            None => format!("Filter '{}' not found.", name),
        }
    }

    /// Help text for every filter an endpoint supports.
    pub fn endpoint_help(&self, endpoint: &str) -> String {
        let specs = self.endpoint_filters(endpoint);
        if specs.is_empty() {
            return format!("Endpoint '{}' has no registered filters.", endpoint);
        }
        let mut text = format!("API Endpoint: {}{}\n", self.base_url, endpoint);
        text.push_str(&format!("Supported filters ({}):\n\n", specs.len()));
        for spec in specs {
            text.push_str(&spec.help_text());
            text.push_str("\n\n");
        }
        text.trim_end().to_string()
    }

    /// Validate a resource name and filter set, then build the query URL.
    pub fn build_query(&self, endpoint: &str, filters: &[Filter]) -> Result<String, SourceError> {
        let mut url = self.endpoint_url(endpoint)?;
        let allowed = self.endpoints.get(endpoint).cloned().unwrap_or_default();
        let mut fragments = Vec::with_capacity(filters.len());
        for filter in filters {
            if !allowed.contains(&filter.name.as_str()) {
                return Err(SourceError::InvalidParameter(format!(
                    "filter '{}' not supported by endpoint '{}'; supported: {}",
                    filter.name,
                    endpoint,
                    allowed.join(", ")
                )));
            }
            fragments.push(filter.to_query_fragment());
        }
        if !fragments.is_empty() {
            url.push('?');
            url.push_str(&fragments.join("&"));
        }
        Ok(url)
    }
}

/// Build the OpenF1 registry: every endpoint and filter the v1 API exposes.
pub fn openf1_registry(base_url: impl Into<String>) -> EndpointRegistry {
    use FilterKind::{Comparison, Equality};
    use ValueKind::{Boolean, DateTime, Integer, String as Str};

    EndpointRegistry::new(base_url)
        .define_filter("date", Comparison, DateTime, "The UTC date and time, in ISO 8601 format.")
        .define_filter("driver_number", Equality, Integer, "The unique number assigned to an F1 driver.")
        .define_filter("meeting_key", Equality, Str, "The unique identifier for the meeting. Use 'latest' for the latest or current meeting.")
        .define_filter("session_key", Equality, Str, "The unique identifier for the session. Use 'latest' for the latest or current session.")
        .define_filter("speed", Comparison, Integer, "Velocity of the car in km/h.")
        .define_filter("country_code", Equality, Str, "A code that uniquely identifies the country.")
        .define_filter("first_name", Equality, Str, "The first name of the driver.")
        .define_filter("last_name", Equality, Str, "The last name of the driver.")
        .define_filter("full_name", Equality, Str, "The full name of the driver.")
        .define_filter("name_acronym", Equality, Str, "Three-letter acronym of the driver's name.")
        .define_filter("team_name", Equality, Str, "The name of the driver's team.")
        .define_filter("gap_to_leader", Comparison, Integer, "The time gap to the race leader in seconds, +1 LAP if lapped, or null for the race leader.")
        .define_filter("interval", Comparison, Integer, "The time gap to the car ahead in seconds, +1 LAP if lapped, or null for the race leader.")
        .define_filter("date_start", Comparison, DateTime, "The UTC starting date and time, in ISO 8601 format.")
        .define_filter("date_end", Comparison, DateTime, "The UTC ending date and time, in ISO 8601 format.")
        .define_filter("is_pit_out_lap", Equality, Boolean, "Whether the lap is an out lap from the pit.")
        .define_filter("lap_duration", Comparison, Integer, "The total time taken, in seconds, to complete the entire lap.")
        .define_filter("lap_number", Equality, Integer, "The sequential number of the lap within the session (starts at 1).")
        .define_filter("circuit_key", Equality, Str, "The unique identifier for the circuit where the event takes place.")
        .define_filter("circuit_short_name", Equality, Str, "The short or common name of the circuit where the event takes place.")
        .define_filter("country_key", Equality, Str, "The unique identifier for the country where the event takes place.")
        .define_filter("country_name", Equality, Str, "The name of the country where the event takes place.")
        .define_filter("location", Equality, Str, "The city or geographical location where the event takes place.")
        .define_filter("meeting_name", Equality, Str, "The name of the meeting.")
        .define_filter("meeting_official_name", Equality, Str, "The official name of the meeting.")
        .define_filter("year", Equality, Integer, "The year of the event.")
        .define_filter("pit_duration", Comparison, Integer, "The time spent in the pit, from entering to leaving the pit lane, in seconds.")
        .define_filter_allowed("position", Equality, Integer, "Position of the driver (starts at 1).", &[
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
            "16", "17", "18", "19", "20",
        ])
        .define_filter_allowed("category", Equality, Str, "The category of the event.", &["CarEvent", "Drs", "Flag", "SafetyCar"])
        .define_filter_allowed("flag", Equality, Str, "The flag displayed to the drivers.", &["Green", "Yellow", "Red", "Black", "White", "Blue", "Checkered"])
        .define_filter("message", Equality, Str, "Description of the event or action.")
        .define_filter("session_name", Equality, Str, "The name of the session (Practice 1, Qualifying, Race, ...).")
        .define_filter("session_type", Equality, Str, "The type of the session (Practice, Qualifying, Race, ...).")
        .define_filter_allowed("compound", Equality, Str, "The tyre compound used during the stint.", &["SOFT", "MEDIUM", "HARD", "INTERMEDIATE", "WET"])
        .define_filter("lap_end", Comparison, Integer, "Number of the last completed lap in this stint.")
        .define_filter("lap_start", Comparison, Integer, "Number of the initial lap in this stint (starts at 1).")
        .define_filter("stint_number", Equality, Integer, "The sequential number of the stint within the session (starts at 1).")
        .define_filter("tyre_age_at_start", Comparison, Integer, "The age of the tyres at the start of the stint, in laps completed.")
        .define_filter("air_temperature", Comparison, Integer, "Air temperature (\u{b0}C).")
        .define_filter("humidity", Comparison, Integer, "Humidity percentage.")
        .define_filter("pressure", Comparison, Integer, "Air pressure (mbar).")
        .define_filter("rainfall", Comparison, Integer, "Whether there is rainfall.")
        .define_filter("track_temperature", Comparison, Integer, "Track temperature (\u{b0}C).")
        .define_filter("wind_direction", Comparison, Integer, "Wind direction (\u{b0}), from 0\u{b0} to 359\u{b0}.")
        .define_filter("wind_speed", Comparison, Integer, "Wind speed (m/s).")
        .register_endpoint("car_data", &["date", "driver_number", "meeting_key", "session_key", "speed"])
        .register_endpoint("drivers", &["session_key", "meeting_key", "country_code", "driver_number", "first_name", "last_name", "full_name", "name_acronym", "team_name"])
        .register_endpoint("intervals", &["date", "driver_number", "meeting_key", "session_key", "gap_to_leader", "interval"])
        .register_endpoint("laps", &["date_start", "driver_number", "meeting_key", "session_key", "lap_duration", "lap_number", "is_pit_out_lap"])
        .register_endpoint("location", &["date", "driver_number", "meeting_key", "session_key"])
        .register_endpoint("meetings", &["circuit_key", "circuit_short_name", "country_code", "country_key", "country_name", "date_start", "location", "meeting_key", "meeting_name", "meeting_official_name", "year"])
        .register_endpoint("pit", &["date", "driver_number", "lap_number", "meeting_key", "session_key", "pit_duration"])
        .register_endpoint("position", &["date", "driver_number", "meeting_key", "session_key", "position"])
        .register_endpoint("race_control", &["category", "date", "driver_number", "meeting_key", "session_key", "flag", "message", "lap_number"])
        .register_endpoint("sessions", &["circuit_key", "circuit_short_name", "country_code", "country_key", "country_name", "date_start", "date_end", "location", "session_name", "session_type", "session_key", "meeting_key", "year"])
        .register_endpoint("stints", &["compound", "driver_number", "lap_end", "lap_start", "meeting_key", "session_key", "stint_number", "tyre_age_at_start"])
        .register_endpoint("team_radio", &["date", "driver_number", "meeting_key", "session_key"])
        .register_endpoint("weather", &["air_temperature", "date", "humidity", "pressure", "rainfall", "track_temperature", "wind_direction", "wind_speed", "meeting_key", "session_key"])
}
