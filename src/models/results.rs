//! Session results, championship standings, and lap telemetry models.

use serde::{Deserialize, Serialize};

use super::SessionType;

/// One classified driver in a session. At most one row per driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    /// Finishing position (None for unclassified entries)
    pub position: Option<u32>,

    /// Permanent car number
    pub driver_number: Option<u32>,

    /// Three-letter driver code (e.g., "VER")
    pub driver_code: String,

    /// Full driver name
    pub driver_name: String,

    /// Constructor name
    pub constructor: String,

    /// Grid position (race/sprint only)
    pub grid: Option<u32>,

    /// Points scored in this session
    pub points: f64,

    /// Finishing status ("Finished", "+1 Lap", "Collision", ...)
    pub status: Option<String>,

    /// Qualifying segment times (qualifying sessions only)
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
}

impl ResultRow {
    /// Display label combining name, code, and number, matching the
    /// "Name (VER • 1)" column the results table shows.
    pub fn display_name(&self) -> String {
        match self.driver_number {
            Some(n) => format!("{} ({} \u{2022} {})", self.driver_name, self.driver_code, n),
            None => format!("{} ({})", self.driver_name, self.driver_code),
        }
    }
}

/// The full classification of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResults {
    pub year: i32,
    pub round: u32,
    pub event_name: String,
    pub session: SessionType,
    /// Rows ordered by finishing position ascending
    pub rows: Vec<ResultRow>,
}

/// Which championship a standings table ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingsKind {
    Drivers,
    Constructors,
}

impl StandingsKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drivers => "Drivers",
            Self::Constructors => "Constructors",
        }
    }
}

/// One entry in a championship standings table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: u32,
    /// Driver full name or constructor name
    pub name: String,
    /// Driver code, where applicable
    pub code: Option<String>,
    pub points: f64,
    pub wins: u32,
}

/// Ranked cumulative points table for a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standings {
    pub year: i32,
    pub kind: StandingsKind,
    /// Rows ordered by position ascending
    pub rows: Vec<StandingRow>,
}

impl Standings {
    /// One-line summary for a single entrant, e.g.
    /// "Max Verstappen was 1st with 575 points and 19 wins".
    pub fn describe_entry(&self, row: &StandingRow, current_year: i32) -> String {
        let tense = match (self.kind, self.year == current_year) {
            (StandingsKind::Drivers, true) => "is",
            (StandingsKind::Drivers, false) => "was",
            (StandingsKind::Constructors, true) => "are",
            (StandingsKind::Constructors, false) => "were",
        };
        format!(
            "{} {} {} with {} points and {} wins",
            row.name,
            tense,
            ordinal(row.position),
            format_points(row.points),
            row.wins
        )
    }
}

/// English ordinal: 1 -> "1st", 2 -> "2nd", 11 -> "11th", 22 -> "22nd".
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Render points without a trailing ".0" for whole values (half points exist:
/// shortened races award them).
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{}", points)
    }
}

/// One telemetry sample along the fastest lap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Distance from the start line, in metres
    pub distance: f64,
    /// Track-plane position
    pub x: f64,
    pub y: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Selected gear (1..=8)
    pub gear: u8,
}

/// The fastest race lap of an event with its telemetry trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastestLap {
    pub year: i32,
    pub round: u32,
    pub event_name: String,
    pub driver_code: String,
    pub driver_number: Option<u32>,
    pub lap_number: u32,
    /// Lap time as "M:SS.mmm", when recorded
    pub lap_time: Option<String>,
    pub samples: Vec<TelemetrySample>,
}
