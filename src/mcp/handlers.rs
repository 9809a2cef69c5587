//! Tool handler implementations.
//!
//! Each handler owns an `Arc` to the adapter it queries and converts the
//! adapter's typed result into a normalized JSON payload: a table, a track
//! series, or plain text. Handlers never construct error payloads; they
//! return `SourceError` and the registry does the wrapping.

use std::sync::Arc;

use serde_json::{json, Value};

use super::tools::ToolHandler;
use crate::models::{RoundRef, SessionType, StandingRow, Standings, PROFILE_SEASON};
use crate::normalize::{Channel, DataTable, TrackSeries};
use crate::sources::{Filter, HistoricalArchive, OpenF1Client, SourceError};
use crate::utils::{best_match, current_season};

fn table_payload(table: DataTable) -> Result<Value, SourceError> {
    Ok(json!({"type": "table", "table": table}))
}

fn text_payload(text: String) -> Result<Value, SourceError> {
    Ok(json!({"type": "text", "text": text}))
}

fn arg_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, SourceError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| SourceError::InvalidParameter(format!("missing '{}'", key)))
}

fn arg_year(args: &Value) -> Result<i32, SourceError> {
    args.get("year")
        .and_then(|v| v.as_i64())
        .map(|y| y as i32)
        .ok_or_else(|| SourceError::InvalidParameter("missing 'year'".to_string()))
}

fn arg_round(args: &Value) -> Result<RoundRef, SourceError> {
    match args.get("round") {
        Some(Value::String(s)) => Ok(RoundRef::parse(s)),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| RoundRef::Number(n as u32))
            .ok_or_else(|| SourceError::InvalidParameter("invalid 'round'".to_string())),
        _ => Err(SourceError::InvalidParameter("missing 'round'".to_string())),
    }
}

/// Find one standings entry by fuzzy name or code.
fn standings_entry<'a>(
    standings: &'a Standings,
    query: &str,
) -> Result<&'a StandingRow, SourceError> {
    best_match(query, &standings.rows, |r| {
        let mut c = vec![r.name.as_str()];
        if let Some(code) = &r.code {
            c.push(code.as_str());
        }
        c
    })
    .ok_or_else(|| {
        SourceError::NotFound(format!(
            "no {} standings entry matching '{}'",
            standings.year, query
        ))
    })
}

/// Full calendar for a season.
#[derive(Debug)]
pub struct SeasonCalendarHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for SeasonCalendarHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let calendar = self.archive.season_calendar(arg_year(&args)?).await?;
        table_payload(DataTable::from_calendar(&calendar))
    }
}

/// One event of a season, by round number or name.
#[derive(Debug)]
pub struct EventInfoHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for EventInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let event = self
            .archive
            .event(arg_year(&args)?, &arg_round(&args)?)
            .await?;
        Ok(json!({"type": "text", "text": event.summary(), "event": event}))
    }
}

/// Classification of one session.
#[derive(Debug)]
pub struct SessionResultsHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for SessionResultsHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let session = SessionType::parse(arg_str(&args, "session")?).ok_or_else(|| {
            SourceError::InvalidParameter("unrecognized session type".to_string())
        })?;
        let results = self
            .archive
            .session_results(arg_year(&args)?, &arg_round(&args)?, session)
            .await?;
        table_payload(DataTable::from_session_results(&results))
    }
}

/// Driver championship standings, optionally narrowed to one driver.
#[derive(Debug)]
pub struct DriverStandingsHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for DriverStandingsHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let standings = self.archive.driver_standings(arg_year(&args)?).await?;
        if let Some(driver) = args.get("driver").and_then(|v| v.as_str()) {
            let row = standings_entry(&standings, driver)?;
            return text_payload(standings.describe_entry(row, current_season()));
        }
        table_payload(DataTable::from_standings(&standings))
    }
}

/// Constructor championship standings, optionally narrowed to one team.
#[derive(Debug)]
pub struct ConstructorStandingsHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for ConstructorStandingsHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let standings = self.archive.constructor_standings(arg_year(&args)?).await?;
        if let Some(team) = args.get("constructor").and_then(|v| v.as_str()) {
            let row = standings_entry(&standings, team)?;
            return text_payload(standings.describe_entry(row, current_season()));
        }
        table_payload(DataTable::from_standings(&standings))
    }
}

/// Fastest-lap trace of an event, colored by one telemetry channel.
#[derive(Debug)]
pub struct TrackVisualizationHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for TrackVisualizationHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let channel = match args.get("channel").and_then(|v| v.as_str()) {
            Some("gear") => Channel::Gear,
            _ => Channel::Speed,
        };
        let lap = self
            .archive
            .fastest_lap_telemetry(arg_year(&args)?, &arg_round(&args)?)
            .await?;
        let series = TrackSeries::from_fastest_lap(&lap, channel);
        Ok(json!({"type": "series", "series": series}))
    }
}

/// Profile card for a current-grid driver.
#[derive(Debug)]
pub struct DriverInfoHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for DriverInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let profile = self.archive.driver_profile(arg_str(&args, "name")?)?;
        Ok(json!({
            "type": "text",
            "text": profile.describe(),
            "profile": profile,
            "season": PROFILE_SEASON,
        }))
    }
}

/// Profile card for a current-grid constructor.
#[derive(Debug)]
pub struct ConstructorInfoHandler {
    pub archive: Arc<HistoricalArchive>,
}

#[async_trait::async_trait]
impl ToolHandler for ConstructorInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let profile = self.archive.constructor_profile(arg_str(&args, "name")?)?;
        Ok(json!({
            "type": "text",
            "text": profile.describe(),
            "profile": profile,
            "season": PROFILE_SEASON,
        }))
    }
}

/// Catalogue of live API endpoints and the filters each accepts.
#[derive(Debug)]
pub struct ListEndpointsHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for ListEndpointsHandler {
    async fn execute(&self, _args: Value) -> Result<Value, SourceError> {
        let registry = self.live.registry();
        let endpoints: Vec<Value> = registry
            .endpoints()
            .iter()
            .map(|endpoint| {
                let filters: Vec<&str> = registry
                    .endpoint_filters(endpoint)
                    .iter()
                    .map(|f| f.name)
                    .collect();
                json!({"endpoint": endpoint, "filters": filters})
            })
            .collect();
        Ok(json!({"type": "endpoints", "endpoints": endpoints}))
    }
}

/// Help text for one live endpoint.
#[derive(Debug)]
pub struct EndpointInfoHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for EndpointInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let endpoint = arg_str(&args, "endpoint")?;
        let registry = self.live.registry();
        if !registry.has_endpoint(endpoint) {
            return Err(SourceError::InvalidParameter(format!(
                "unknown endpoint '{}'; available: {}",
                endpoint,
                registry.endpoints().join(", ")
            )));
        }
        text_payload(registry.endpoint_help(endpoint))
    }
}

/// Help text for one live filter.
#[derive(Debug)]
pub struct FilterInfoHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for FilterInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let name = arg_str(&args, "filter")?;
        let registry = self.live.registry();
        if registry.filter(name).is_none() {
            return Err(SourceError::InvalidParameter(format!(
                "unknown filter '{}'",
                name
            )));
        }
        text_payload(registry.filter_help(name))
    }
}

/// Generic filtered query against any live endpoint.
#[derive(Debug)]
pub struct LiveQueryHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for LiveQueryHandler {
    async fn execute(&self, args: Value) -> Result<Value, SourceError> {
        let endpoint = arg_str(&args, "endpoint")?;
        let mut filters = Vec::new();
        if let Some(map) = args.get("filters").and_then(|v| v.as_object()) {
            for (name, value) in map {
                let filter = match value {
                    // String values may carry a leading comparison operator
                    Value::String(s) => Filter::parse(name, s),
                    Value::Number(n) => Filter::eq(name, n),
                    Value::Bool(b) => Filter::eq(name, b),
                    other => {
                        return Err(SourceError::InvalidParameter(format!(
                            "filter '{}' has unsupported value {}",
                            name, other
                        )))
                    }
                };
                filters.push(filter);
            }
        }
        let records = self.live.query(endpoint, &filters).await?;
        table_payload(DataTable::from_records(endpoint, &records))
    }
}

/// Drivers entered in the latest session.
#[derive(Debug)]
pub struct CurrentDriversHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for CurrentDriversHandler {
    async fn execute(&self, _args: Value) -> Result<Value, SourceError> {
        let records = self.live.current_drivers().await?;
        table_payload(DataTable::from_records("drivers", &records))
    }
}

/// The latest or currently running session.
#[derive(Debug)]
pub struct LatestSessionHandler {
    pub live: Arc<OpenF1Client>,
}

#[async_trait::async_trait]
impl ToolHandler for LatestSessionHandler {
    async fn execute(&self, _args: Value) -> Result<Value, SourceError> {
        let session = self.live.latest_session().await?;
        Ok(json!({"type": "record", "record": session}))
    }
}
