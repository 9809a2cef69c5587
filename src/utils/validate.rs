//! Season bounds validation.

use chrono::Datelike;

use crate::sources::SourceError;

/// The first Formula 1 World Championship season.
pub const FIRST_SEASON: i32 = 1950;

/// The current season year.
pub fn current_season() -> i32 {
    chrono::Utc::now().year()
}

/// Reject years outside [1950, current] before any upstream call is made.
pub fn validate_year(year: i32) -> Result<(), SourceError> {
    let current = current_season();
    if year < FIRST_SEASON || year > current {
        return Err(SourceError::InvalidParameter(format!(
            "year {} out of range [{}, {}]",
            year, FIRST_SEASON, current
        )));
    }
    Ok(())
}
