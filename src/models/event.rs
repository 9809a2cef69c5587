//! Season, event, and session identification types.
//!
//! Seasons contain events, events contain sessions, in a strict containment
//! hierarchy. All of these are read-only views over upstream data.

use serde::{Deserialize, Serialize};

/// One discrete on-track activity within a Grand Prix weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Practice1,
    Practice2,
    Practice3,
    SprintQualifying,
    Sprint,
    Qualifying,
    Race,
}

impl SessionType {
    /// Parse a session type from the many spellings users and agents produce
    /// ("fp1", "Practice 1", "q", "race", "sprint shootout", ...).
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "fp1" | "p1" | "practice 1" | "free practice 1" => Some(Self::Practice1),
            "fp2" | "p2" | "practice 2" | "free practice 2" => Some(Self::Practice2),
            "fp3" | "p3" | "practice 3" | "free practice 3" => Some(Self::Practice3),
            "sq" | "sprint qualifying" | "sprint shootout" => Some(Self::SprintQualifying),
            "sprint" | "sprint race" | "s" => Some(Self::Sprint),
            "q" | "quali" | "qualifying" => Some(Self::Qualifying),
            "r" | "race" | "grand prix" => Some(Self::Race),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Practice1 => "Practice 1",
            Self::Practice2 => "Practice 2",
            Self::Practice3 => "Practice 3",
            Self::SprintQualifying => "Sprint Qualifying",
            Self::Sprint => "Sprint",
            Self::Qualifying => "Qualifying",
            Self::Race => "Race",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reference to a Grand Prix within a season: either the round number or a
/// (possibly partial) name. Name resolution is fuzzy and happens in the
/// historical adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoundRef {
    Number(u32),
    Name(String),
}

impl RoundRef {
    /// Parse a round reference; numeric strings become round numbers, exactly
    /// as the UI accepts "7" and "Monaco" in the same field.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<u32>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Name(input.trim().to_string()),
        }
    }
}

impl From<u32> for RoundRef {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for RoundRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "round {}", n),
            Self::Name(s) => write!(f, "{}", s),
        }
    }
}

/// One race weekend within a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Round number within the season (starts at 1)
    pub round: u32,

    /// Event name (e.g., "Monaco Grand Prix")
    pub name: String,

    /// Circuit name
    pub circuit: String,

    /// City or locality
    pub location: String,

    /// Country
    pub country: String,

    /// Race date (ISO format), when known
    pub date: Option<String>,
}

impl Event {
    /// One-line human summary, matching the calendar line format:
    /// `Round 7 : Monaco Grand Prix - Monte-Carlo, Monaco (2024-05-26)`.
    pub fn summary(&self) -> String {
        let date = self.date.as_deref().unwrap_or("date TBC");
        format!(
            "Round {} : {} - {}, {} ({})",
            self.round, self.name, self.location, self.country, date
        )
    }
}

/// An ordered season calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonCalendar {
    pub year: i32,
    /// Events in round order
    pub events: Vec<Event>,
}
