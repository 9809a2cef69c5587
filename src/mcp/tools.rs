//! Tool registry.
//!
//! The registry owns the full tool menu: names, descriptions, input schemas,
//! and handlers. Execution validates arguments against the schema first, then
//! runs the handler; a handler error becomes a structured error payload in
//! the result, never a protocol-level failure.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::handlers::*;
use super::schema::validate_args;
use crate::sources::{HistoricalArchive, OpenF1Client, SourceError};
use crate::utils::{current_season, FIRST_SEASON};

/// Which data source a tool draws on; drives the UI tab grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Historical,
    Live,
}

impl ToolCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Historical => "Historical",
            Self::Live => "Live",
        }
    }
}

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "session_results")
    pub name: String,

    pub category: ToolCategory,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, SourceError>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create the registry and register the full tool menu against the two
    /// adapters.
    pub fn new(archive: Arc<HistoricalArchive>, live: Arc<OpenF1Client>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register_historical_tools(&archive);
        registry.register_live_tools(&live);
        registry
    }

    fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// All tools, sorted by name.
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Tools in one category, sorted by name.
    pub fn by_category(&self, category: ToolCategory) -> Vec<&Tool> {
        self.all()
            .into_iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool. Arguments are validated against the tool's schema
    /// before the handler runs. Handler errors come back as a structured
    /// error payload in the result.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, SourceError> {
        let tool = self.get(name).ok_or_else(|| {
            SourceError::InvalidParameter(format!("unknown tool '{}'", name))
        })?;

        let outcome = match validate_args(&args, &tool.input_schema) {
            Ok(()) => tool.handler.execute(args).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(payload) => Ok(payload),
            Err(e) => {
                debug!("tool {} failed: {}", name, e);
                Ok(json!({
                    "error": {
                        "kind": e.kind(),
                        "message": e.to_string(),
                    }
                }))
            }
        }
    }

    fn year_schema() -> Value {
        json!({
            "type": "integer",
            "description": format!("Championship season, {} to present", FIRST_SEASON),
            "minimum": FIRST_SEASON,
            "maximum": current_season(),
        })
    }

    fn round_schema() -> Value {
        json!({
            "type": "string",
            "description": "Round number or Grand Prix name (e.g., '7' or 'Monaco')",
        })
    }

    fn register_historical_tools(&mut self, archive: &Arc<HistoricalArchive>) {
        self.register(Tool {
            name: "season_calendar".to_string(),
            category: ToolCategory::Historical,
            description: "List every Grand Prix of a season with round, circuit, location, and date".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"year": Self::year_schema()},
                "required": ["year"]
            }),
            handler: Arc::new(SeasonCalendarHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "event_info".to_string(),
            category: ToolCategory::Historical,
            description: "Details of one Grand Prix weekend, found by round number or fuzzy name".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "year": Self::year_schema(),
                    "round": Self::round_schema(),
                },
                "required": ["year", "round"]
            }),
            handler: Arc::new(EventInfoHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "session_results".to_string(),
            category: ToolCategory::Historical,
            description: "Classification of a qualifying, sprint, or race session".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "year": Self::year_schema(),
                    "round": Self::round_schema(),
                    "session": {
                        "type": "string",
                        "description": "Session to classify",
                        "enum": ["qualifying", "sprint", "race"],
                    },
                },
                "required": ["year", "round", "session"]
            }),
            handler: Arc::new(SessionResultsHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "driver_standings".to_string(),
            category: ToolCategory::Historical,
            description: "Driver championship standings for a season, optionally for one driver".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "year": Self::year_schema(),
                    "driver": {
                        "type": "string",
                        "description": "Narrow to one driver by name or code (fuzzy)",
                    },
                },
                "required": ["year"]
            }),
            handler: Arc::new(DriverStandingsHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "constructor_standings".to_string(),
            category: ToolCategory::Historical,
            description: "Constructor championship standings for a season, optionally for one team".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "year": Self::year_schema(),
                    "constructor": {
                        "type": "string",
                        "description": "Narrow to one constructor by name (fuzzy)",
                    },
                },
                "required": ["year"]
            }),
            handler: Arc::new(ConstructorStandingsHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "track_visualization".to_string(),
            category: ToolCategory::Historical,
            description: "Fastest race lap of an event as a track trace colored by speed or gear".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "year": Self::year_schema(),
                    "round": Self::round_schema(),
                    "channel": {
                        "type": "string",
                        "description": "Telemetry channel to plot",
                        "enum": ["speed", "gear"],
                        "default": "speed",
                    },
                },
                "required": ["year", "round"]
            }),
            handler: Arc::new(TrackVisualizationHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "driver_info".to_string(),
            category: ToolCategory::Historical,
            description: "Profile of a current-grid driver: team, number, nationality, career summary".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Driver name, code, or team (fuzzy)",
                    },
                },
                "required": ["name"]
            }),
            handler: Arc::new(DriverInfoHandler {
                archive: archive.clone(),
            }),
        });

        self.register(Tool {
            name: "constructor_info".to_string(),
            category: ToolCategory::Historical,
            description: "Profile of a current-grid constructor: base, principal, drivers, power unit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Constructor or driver name (fuzzy)",
                    },
                },
                "required": ["name"]
            }),
            handler: Arc::new(ConstructorInfoHandler {
                archive: archive.clone(),
            }),
        });
    }

    fn register_live_tools(&mut self, live: &Arc<OpenF1Client>) {
        self.register(Tool {
            name: "list_endpoints".to_string(),
            category: ToolCategory::Live,
            description: "Catalogue of live API endpoints and the filters each accepts".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            handler: Arc::new(ListEndpointsHandler { live: live.clone() }),
        });

        self.register(Tool {
            name: "endpoint_info".to_string(),
            category: ToolCategory::Live,
            description: "Help text for one live API endpoint: every supported filter with examples".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "endpoint": {
                        "type": "string",
                        "description": "Endpoint name (e.g., 'laps', 'sessions')",
                    },
                },
                "required": ["endpoint"]
            }),
            handler: Arc::new(EndpointInfoHandler { live: live.clone() }),
        });

        self.register(Tool {
            name: "filter_info".to_string(),
            category: ToolCategory::Live,
            description: "Help text for one live API filter: type, allowed values, examples".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filter": {
                        "type": "string",
                        "description": "Filter name (e.g., 'driver_number', 'session_key')",
                    },
                },
                "required": ["filter"]
            }),
            handler: Arc::new(FilterInfoHandler { live: live.clone() }),
        });

        self.register(Tool {
            name: "live_query".to_string(),
            category: ToolCategory::Live,
            description: "Query any live API endpoint with filters. String filter values may carry a comparison operator (e.g., \">=300\").".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "endpoint": {
                        "type": "string",
                        "description": "Endpoint to query",
                    },
                    "filters": {
                        "type": "object",
                        "description": "Filter name to value map; values may be strings, numbers, or booleans",
                    },
                },
                "required": ["endpoint"]
            }),
            handler: Arc::new(LiveQueryHandler { live: live.clone() }),
        });

        self.register(Tool {
            name: "current_drivers".to_string(),
            category: ToolCategory::Live,
            description: "Drivers entered in the latest session".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            handler: Arc::new(CurrentDriversHandler { live: live.clone() }),
        });

        self.register(Tool {
            name: "latest_session".to_string(),
            category: ToolCategory::Live,
            description: "The latest or currently running session".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
            handler: Arc::new(LatestSessionHandler { live: live.clone() }),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{CacheService, HttpClient};

    fn registry() -> ToolRegistry {
        let tmp = std::env::temp_dir();
        let archive = Arc::new(HistoricalArchive::new(
            "http://127.0.0.1:1",
            HttpClient::new(),
            CacheService::new(tmp, false),
            None,
        ));
        let live = Arc::new(OpenF1Client::new("http://127.0.0.1:1/", HttpClient::new()));
        ToolRegistry::new(archive, live)
    }

    #[test]
    fn test_full_tool_menu() {
        let registry = registry();
        assert_eq!(registry.len(), 14);
        assert_eq!(registry.by_category(ToolCategory::Historical).len(), 8);
        assert_eq!(registry.by_category(ToolCategory::Live).len(), 6);
        for name in [
            "season_calendar",
            "event_info",
            "session_results",
            "driver_standings",
            "constructor_standings",
            "track_visualization",
            "driver_info",
            "constructor_info",
            "list_endpoints",
            "endpoint_info",
            "filter_info",
            "live_query",
            "current_drivers",
            "latest_session",
        ] {
            assert!(registry.get(name).is_some(), "missing {}", name);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let err = registry()
            .execute("no_such_tool", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_invalid_args_become_error_payload() {
        // Adapters point at unroutable hosts: validation must trip before
        // any network attempt.
        let payload = registry()
            .execute("season_calendar", json!({"year": 1800}))
            .await
            .unwrap();
        assert_eq!(payload["error"]["kind"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_handler_error_becomes_error_payload() {
        let payload = registry()
            .execute("current_drivers", json!({}))
            .await
            .unwrap();
        assert_eq!(payload["error"]["kind"], "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_catalogue_tools_work_offline() {
        let registry = registry();
        let payload = registry.execute("list_endpoints", json!({})).await.unwrap();
        assert_eq!(payload["type"], "endpoints");
        assert_eq!(payload["endpoints"].as_array().unwrap().len(), 13);

        let payload = registry
            .execute("filter_info", json!({"filter": "driver_number"}))
            .await
            .unwrap();
        assert!(payload["text"].as_str().unwrap().contains("driver_number"));

        let payload = registry
            .execute("driver_info", json!({"name": "verstappen"}))
            .await
            .unwrap();
        assert!(payload["text"].as_str().unwrap().contains("Max Verstappen"));
    }
}
