//! Core data structures shared by the adapters, normalizer, and tools.

mod event;
mod profiles;
mod results;

pub use event::{Event, RoundRef, SeasonCalendar, SessionType};
pub use profiles::{
    builtin_constructors, builtin_drivers, ConstructorProfile, DriverProfile, PROFILE_SEASON,
};
pub use results::{
    format_points, ordinal, FastestLap, ResultRow, SessionResults, StandingRow, Standings,
    StandingsKind, TelemetrySample,
};
