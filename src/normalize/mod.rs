//! Response normalization.
//!
//! Both adapters produce differently shaped payloads; everything the server
//! returns to a client passes through here first and comes out as either a
//! [`DataTable`] or a [`TrackSeries`]. Normalization is pure: no network, no
//! clock, no state, and a given input always yields the same output.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{FastestLap, SeasonCalendar, SessionResults, SessionType, Standings, StandingsKind};

/// Cell value shown where a record has no data for a column.
pub const PLACEHOLDER: &str = "-";

/// Which adapter a normalized payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Historical,
    Live,
}

/// A uniform tabular payload: ordered columns, stringified cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub origin: DataOrigin,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Tabulate a season calendar.
    pub fn from_calendar(calendar: &SeasonCalendar) -> Self {
        Self {
            origin: DataOrigin::Historical,
            title: format!("{} season calendar", calendar.year),
            columns: ["Round", "Event", "Circuit", "Location", "Country", "Date"]
                .map(String::from)
                .to_vec(),
            rows: calendar
                .events
                .iter()
                .map(|e| {
                    vec![
                        e.round.to_string(),
                        e.name.clone(),
                        e.circuit.clone(),
                        e.location.clone(),
                        e.country.clone(),
                        e.date.clone().unwrap_or_else(|| PLACEHOLDER.into()),
                    ]
                })
                .collect(),
        }
    }

    /// Tabulate a session classification. Column set depends on the session:
    /// qualifying shows segment times, competitive sessions show grid, points,
    /// and status.
    pub fn from_session_results(results: &SessionResults) -> Self {
        let qualifying = matches!(
            results.session,
            SessionType::Qualifying | SessionType::SprintQualifying
        );
        let mut columns = vec!["Pos".to_string(), "Driver".to_string(), "Team".to_string()];
        if qualifying {
            columns.extend(["Q1", "Q2", "Q3"].map(String::from));
        } else {
            columns.extend(["Grid", "Points", "Status"].map(String::from));
        }

        let rows = results
            .rows
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.position
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| PLACEHOLDER.into()),
                    r.display_name(),
                    r.constructor.clone(),
                ];
                if qualifying {
                    for time in [&r.q1, &r.q2, &r.q3] {
                        row.push(time.clone().unwrap_or_else(|| PLACEHOLDER.into()));
                    }
                } else {
                    row.push(
                        r.grid
                            .map(|g| g.to_string())
                            .unwrap_or_else(|| PLACEHOLDER.into()),
                    );
                    row.push(crate::models::format_points(r.points));
                    row.push(r.status.clone().unwrap_or_else(|| PLACEHOLDER.into()));
                }
                row
            })
            .collect();

        Self {
            origin: DataOrigin::Historical,
            title: format!(
                "{} {} \u{2014} {}",
                results.year, results.event_name, results.session
            ),
            columns,
            rows,
        }
    }

    /// Tabulate championship standings.
    pub fn from_standings(standings: &Standings) -> Self {
        let entrant = match standings.kind {
            StandingsKind::Drivers => "Driver",
            StandingsKind::Constructors => "Constructor",
        };
        Self {
            origin: DataOrigin::Historical,
            title: format!(
                "{} {} championship standings",
                standings.year,
                standings.kind.name()
            ),
            columns: ["Pos", entrant, "Points", "Wins"].map(String::from).to_vec(),
            rows: standings
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.position.to_string(),
                        match &r.code {
                            Some(code) => format!("{} ({})", r.name, code),
                            None => r.name.clone(),
                        },
                        crate::models::format_points(r.points),
                        r.wins.to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// Tabulate a list of flat JSON records, as the live API returns them.
    /// Columns are the union of all keys in stable sorted order; records
    /// missing a key get the placeholder.
    pub fn from_records(title: impl Into<String>, records: &[Value]) -> Self {
        let mut keys = BTreeSet::new();
        for record in records {
            if let Some(map) = record.as_object() {
                for key in map.keys() {
                    keys.insert(key.clone());
                }
            }
        }
        let columns: Vec<String> = keys.into_iter().collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|key| {
                        record
                            .get(key)
                            .map(render_cell)
                            .unwrap_or_else(|| PLACEHOLDER.into())
                    })
                    .collect()
            })
            .collect();

        Self {
            origin: DataOrigin::Live,
            title: title.into(),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render one JSON value as a table cell.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Nested structures stay JSON-encoded
        other => other.to_string(),
    }
}

/// The telemetry channel a track series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Speed,
    Gear,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Speed => "Speed (km/h)",
            Self::Gear => "Gear",
        }
    }
}

/// One point along a lap trace: track-plane position plus a channel value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// A plottable lap trace for one telemetry channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSeries {
    pub origin: DataOrigin,
    pub title: String,
    pub channel: Channel,
    pub points: Vec<TrackPoint>,
}

impl TrackSeries {
    /// Extract one channel of a fastest-lap trace.
    pub fn from_fastest_lap(lap: &FastestLap, channel: Channel) -> Self {
        let points = lap
            .samples
            .iter()
            .map(|s| TrackPoint {
                x: s.x,
                y: s.y,
                value: match channel {
                    Channel::Speed => s.speed,
                    Channel::Gear => f64::from(s.gear),
                },
            })
            .collect();
        let time = lap.lap_time.as_deref().unwrap_or("no time");
        Self {
            origin: DataOrigin::Historical,
            title: format!(
                "{} {} \u{2014} fastest lap by {} (lap {}, {})",
                lap.year, lap.event_name, lap.driver_code, lap.lap_number, time
            ),
            channel,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, ResultRow, StandingRow, TelemetrySample};
    use serde_json::json;

    #[test]
    fn test_calendar_table() {
        let calendar = SeasonCalendar {
            year: 2024,
            events: vec![Event {
                round: 7,
                name: "Monaco Grand Prix".into(),
                circuit: "Circuit de Monaco".into(),
                location: "Monte-Carlo".into(),
                country: "Monaco".into(),
                date: None,
            }],
        };
        let table = DataTable::from_calendar(&calendar);
        assert_eq!(table.origin, DataOrigin::Historical);
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.rows[0][5], PLACEHOLDER);
    }

    #[test]
    fn test_records_table_key_union_and_placeholder() {
        let records = vec![
            json!({"driver_number": 1, "lap_duration": 95.3}),
            json!({"driver_number": 16, "is_pit_out_lap": true}),
        ];
        let table = DataTable::from_records("laps", &records);
        assert_eq!(table.origin, DataOrigin::Live);
        assert_eq!(table.columns, ["driver_number", "is_pit_out_lap", "lap_duration"]);
        assert_eq!(table.rows[0], ["1", "-", "95.3"]);
        assert_eq!(table.rows[1], ["16", "true", "-"]);
    }

    #[test]
    fn test_records_table_null_cell() {
        let records = vec![json!({"gap_to_leader": null, "position": 1})];
        let table = DataTable::from_records("intervals", &records);
        assert_eq!(table.rows[0], ["-", "1"]);
    }

    #[test]
    fn test_records_table_is_deterministic() {
        let records = vec![json!({"b": 2, "a": 1}), json!({"c": 3})];
        let first = DataTable::from_records("x", &records);
        let second = DataTable::from_records("x", &records);
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn test_qualifying_columns_differ_from_race() {
        let row = ResultRow {
            position: Some(1),
            driver_number: Some(16),
            driver_code: "LEC".into(),
            driver_name: "Charles Leclerc".into(),
            constructor: "Ferrari".into(),
            grid: None,
            points: 0.0,
            status: None,
            q1: Some("1:11.584".into()),
            q2: Some("1:11.056".into()),
            q3: Some("1:10.270".into()),
        };
        let quali = SessionResults {
            year: 2024,
            round: 7,
            event_name: "Monaco Grand Prix".into(),
            session: SessionType::Qualifying,
            rows: vec![row.clone()],
        };
        let table = DataTable::from_session_results(&quali);
        assert!(table.columns.contains(&"Q3".to_string()));
        assert!(!table.columns.contains(&"Points".to_string()));

        let race = SessionResults {
            session: SessionType::Race,
            rows: vec![row],
            ..quali
        };
        let table = DataTable::from_session_results(&race);
        assert!(table.columns.contains(&"Points".to_string()));
        assert!(!table.columns.contains(&"Q1".to_string()));
    }

    #[test]
    fn test_standings_table() {
        let standings = Standings {
            year: 2023,
            kind: StandingsKind::Drivers,
            rows: vec![StandingRow {
                position: 1,
                name: "Max Verstappen".into(),
                code: Some("VER".into()),
                points: 575.0,
                wins: 19,
            }],
        };
        let table = DataTable::from_standings(&standings);
        assert_eq!(table.rows[0], ["1", "Max Verstappen (VER)", "575", "19"]);
    }

    #[test]
    fn test_track_series_channels() {
        let lap = FastestLap {
            year: 2024,
            round: 7,
            event_name: "Monaco Grand Prix".into(),
            driver_code: "LEC".into(),
            driver_number: Some(16),
            lap_number: 51,
            lap_time: Some("1:14.165".into()),
            samples: vec![TelemetrySample {
                distance: 0.0,
                x: 10.0,
                y: 20.0,
                speed: 280.0,
                gear: 7,
            }],
        };
        let speed = TrackSeries::from_fastest_lap(&lap, Channel::Speed);
        assert_eq!(speed.points[0].value, 280.0);
        let gear = TrackSeries::from_fastest_lap(&lap, Channel::Gear);
        assert_eq!(gear.points[0].value, 7.0);
        assert!(speed.title.contains("LEC"));
    }
}
