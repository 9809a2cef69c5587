//! Historical data adapter backed by an Ergast-compatible archive API.
//!
//! Covers every championship season from 1950 to the present: calendars,
//! session classifications, and standings. Every request goes through the
//! disk cache first; past seasons never change so their entries never expire,
//! while current-season entries get a short TTL.
//!
//! Lap telemetry is not served by the archive API. Fastest-lap traces come
//! from a local telemetry store (a directory of JSON files) when one is
//! configured.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::models::{
    ConstructorProfile, DriverProfile, Event, FastestLap, ResultRow, RoundRef, SeasonCalendar,
    SessionResults, SessionType, StandingRow, Standings, StandingsKind,
};
use crate::models::{builtin_constructors, builtin_drivers};
use crate::sources::SourceError;
use crate::utils::{best_match, current_season, validate_year, CacheResult, CacheService, HttpClient};

/// How long current-season archive responses stay fresh.
const CURRENT_SEASON_TTL: Duration = Duration::from_secs(30 * 60);

/// Row cap for archive queries; the default page size truncates full seasons.
const PAGE_LIMIT: u32 = 100;

/// Adapter for archived championship data.
#[derive(Debug, Clone)]
pub struct HistoricalArchive {
    base_url: String,
    http: HttpClient,
    cache: CacheService,
    telemetry_dir: Option<PathBuf>,
}

impl HistoricalArchive {
    /// Create an adapter against the given archive base URL (e.g.
    /// `https://api.jolpi.ca/ergast/f1`).
    pub fn new(
        base_url: impl Into<String>,
        http: HttpClient,
        cache: CacheService,
        telemetry_dir: Option<PathBuf>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            cache,
            telemetry_dir,
        }
    }

    /// The cache backing this adapter.
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    fn ttl_for(year: i32) -> Option<Duration> {
        if year >= current_season() {
            Some(CURRENT_SEASON_TTL)
        } else {
            None
        }
    }

    /// Fetch a JSON document from the archive, cache-first.
    async fn fetch(&self, path: &str, ttl: Option<Duration>) -> Result<String, SourceError> {
        let url = format!("{}/{}?limit={}", self.base_url, path, PAGE_LIMIT);
        if let CacheResult::Hit(body) = self.cache.get(&url, ttl) {
            debug!("archive cache hit: {}", path);
            return Ok(body);
        }

        debug!("archive fetch: {}", url);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!("archive has no data at {}", path)));
        }
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "archive returned {} for {}",
                response.status(),
                path
            )));
        }
        let body = response.text().await?;
        self.cache.set(&url, &body);
        Ok(body)
    }

    /// The full calendar for a season, in round order.
    pub async fn season_calendar(&self, year: i32) -> Result<SeasonCalendar, SourceError> {
        validate_year(year)?;
        let body = self.fetch(&format!("{}.json", year), Self::ttl_for(year)).await?;
        let parsed: ErgastResponse = serde_json::from_str(&body)?;
        let races = parsed.races();
        if races.is_empty() {
            return Err(SourceError::NotFound(format!(
                "no calendar published for {}",
                year
            )));
        }

        let mut events: Vec<Event> = races.iter().map(ErgastRace::to_event).collect();
        events.sort_by_key(|e| e.round);
        Ok(SeasonCalendar { year, events })
    }

    /// Resolve one event of a season by round number or fuzzy name.
    pub async fn event(&self, year: i32, round: &RoundRef) -> Result<Event, SourceError> {
        let calendar = self.season_calendar(year).await?;
        match round {
            RoundRef::Number(n) => calendar
                .events
                .iter()
                .find(|e| e.round == *n)
                .cloned()
                .ok_or_else(|| {
                    SourceError::NotFound(format!(
                        "{} has no round {} (last round is {})",
                        year,
                        n,
                        calendar.events.last().map(|e| e.round).unwrap_or(0)
                    ))
                }),
            RoundRef::Name(name) => {
                best_match(name, &calendar.events, |e| {
                    vec![e.name.as_str(), e.location.as_str(), e.country.as_str()]
                })
                .cloned()
                .ok_or_else(|| {
                    SourceError::NotFound(format!("no {} event matching '{}'", year, name))
                })
            }
        }
    }

    /// Classification for one session of one event. The archive only holds
    /// competitive and qualifying classifications; practice has none.
    pub async fn session_results(
        &self,
        year: i32,
        round: &RoundRef,
        session: SessionType,
    ) -> Result<SessionResults, SourceError> {
        validate_year(year)?;
        let event = self.event(year, round).await?;

        let path_segment = match session {
            SessionType::Race => "results",
            SessionType::Qualifying => "qualifying",
            SessionType::Sprint => "sprint",
            // Ergast-compatible archives publish neither practice laps nor
            // the sprint shootout classification.
            SessionType::SprintQualifying
            | SessionType::Practice1
            | SessionType::Practice2
            | SessionType::Practice3 => {
                return Err(SourceError::NotFound(format!(
                    "the archive holds no classification for {}",
                    session
                )));
            }
        };

        let body = self
            .fetch(
                &format!("{}/{}/{}.json", year, event.round, path_segment),
                Self::ttl_for(year),
            )
            .await?;
        let parsed: ErgastResponse = serde_json::from_str(&body)?;
        let races = parsed.races();
        let race = races.first().ok_or_else(|| {
            SourceError::NotFound(format!(
                "no {} classification for {} round {}",
                session, year, event.round
            ))
        })?;

        let mut rows: Vec<ResultRow> = race
            .result_rows()
            .iter()
            .map(ErgastResult::to_row)
            .collect();
        if rows.is_empty() {
            return Err(SourceError::NotFound(format!(
                "no {} classification for {} round {}",
                session, year, event.round
            )));
        }
        // One row per driver, position ascending, unclassified entries last.
        // Sort first so the best-placed entry wins when a driver appears twice.
        rows.sort_by_key(|r| r.position.unwrap_or(u32::MAX));
        let mut seen = HashSet::new();
        rows.retain(|r| seen.insert((r.driver_code.clone(), r.driver_name.clone())));

        Ok(SessionResults {
            year,
            round: event.round,
            event_name: event.name,
            session,
            rows,
        })
    }

    /// Final (or latest) driver championship standings for a season.
    pub async fn driver_standings(&self, year: i32) -> Result<Standings, SourceError> {
        validate_year(year)?;
        let body = self
            .fetch(&format!("{}/driverStandings.json", year), Self::ttl_for(year))
            .await?;
        let parsed: ErgastResponse = serde_json::from_str(&body)?;
        let rows: Vec<StandingRow> = parsed
            .standings_list()
            .and_then(|l| l.driver_standings.as_ref())
            .map(|standings| standings.iter().map(ErgastDriverStanding::to_row).collect())
            .unwrap_or_default();
        if rows.is_empty() {
            return Err(SourceError::NotFound(format!(
                "no driver standings published for {}",
                year
            )));
        }
        Ok(Standings {
            year,
            kind: StandingsKind::Drivers,
            rows,
        })
    }

    /// Final (or latest) constructor championship standings for a season.
    pub async fn constructor_standings(&self, year: i32) -> Result<Standings, SourceError> {
        validate_year(year)?;
        let body = self
            .fetch(
                &format!("{}/constructorStandings.json", year),
                Self::ttl_for(year),
            )
            .await?;
        let parsed: ErgastResponse = serde_json::from_str(&body)?;
        let rows: Vec<StandingRow> = parsed
            .standings_list()
            .and_then(|l| l.constructor_standings.as_ref())
            .map(|standings| {
                standings
                    .iter()
                    .map(ErgastConstructorStanding::to_row)
                    .collect()
            })
            .unwrap_or_default();
        if rows.is_empty() {
            return Err(SourceError::NotFound(format!(
                "no constructor standings published for {} (constructors championship began in 1958)",
                year
            )));
        }
        Ok(Standings {
            year,
            kind: StandingsKind::Constructors,
            rows,
        })
    }

    /// Fastest race lap of an event with its telemetry trace, from the local
    /// telemetry store.
    pub async fn fastest_lap_telemetry(
        &self,
        year: i32,
        round: &RoundRef,
    ) -> Result<FastestLap, SourceError> {
        validate_year(year)?;
        let event = self.event(year, round).await?;
        let dir = self.telemetry_dir.as_ref().ok_or_else(|| {
            SourceError::NotFound("no telemetry store is configured".to_string())
        })?;
        let path = dir.join(format!("{}_{:02}.json", year, event.round));
        let body = std::fs::read_to_string(&path).map_err(|_| {
            SourceError::NotFound(format!(
                "no telemetry stored for {} round {} ({})",
                year, event.round, event.name
            ))
        })?;
        let lap: FastestLap = serde_json::from_str(&body)?;
        Ok(lap)
    }

    /// Profile of a current-grid driver, matched fuzzily by name, code, or
    /// team.
    pub fn driver_profile(&self, name: &str) -> Result<&'static DriverProfile, SourceError> {
        best_match(name, builtin_drivers(), |d| vec![d.name, d.code, d.team])
            .ok_or_else(|| SourceError::NotFound(format!("no current driver matching '{}'", name)))
    }

    /// Profile of a current-grid constructor, matched fuzzily by name or
    /// driver.
    pub fn constructor_profile(
        &self,
        name: &str,
    ) -> Result<&'static ConstructorProfile, SourceError> {
        best_match(name, builtin_constructors(), |c| {
            vec![c.name, c.drivers[0], c.drivers[1]]
        })
        .ok_or_else(|| SourceError::NotFound(format!("no current constructor matching '{}'", name)))
    }
}

// ---------------------------------------------------------------------------
// Archive wire format

#[derive(Debug, Deserialize)]
struct ErgastResponse {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

impl ErgastResponse {
    fn races(&self) -> &[ErgastRace] {
        self.mr_data
            .race_table
            .as_ref()
            .map(|t| t.races.as_slice())
            .unwrap_or(&[])
    }

    fn standings_list(&self) -> Option<&ErgastStandingsList> {
        self.mr_data
            .standings_table
            .as_ref()
            .and_then(|t| t.standings_lists.last())
    }
}

#[derive(Debug, Deserialize)]
struct MrData {
    #[serde(rename = "RaceTable")]
    race_table: Option<ErgastRaceTable>,
    #[serde(rename = "StandingsTable")]
    standings_table: Option<ErgastStandingsTable>,
}

#[derive(Debug, Deserialize)]
struct ErgastRaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<ErgastRace>,
}

#[derive(Debug, Deserialize)]
struct ErgastRace {
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(rename = "Circuit")]
    circuit: ErgastCircuit,
    date: Option<String>,
    #[serde(rename = "Results", default)]
    results: Vec<ErgastResult>,
    #[serde(rename = "QualifyingResults", default)]
    qualifying_results: Vec<ErgastResult>,
    #[serde(rename = "SprintResults", default)]
    sprint_results: Vec<ErgastResult>,
}

impl ErgastRace {
    fn to_event(&self) -> Event {
        Event {
            round: self.round.parse().unwrap_or(0),
            name: self.race_name.clone(),
            circuit: self.circuit.circuit_name.clone(),
            location: self.circuit.location.locality.clone(),
            country: self.circuit.location.country.clone(),
            date: self.date.clone(),
        }
    }

    fn result_rows(&self) -> &[ErgastResult] {
        if !self.results.is_empty() {
            &self.results
        } else if !self.qualifying_results.is_empty() {
            &self.qualifying_results
        } else {
            &self.sprint_results
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErgastCircuit {
    #[serde(rename = "circuitName")]
    circuit_name: String,
    #[serde(rename = "Location")]
    location: ErgastLocation,
}

#[derive(Debug, Deserialize)]
struct ErgastLocation {
    locality: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ErgastResult {
    position: Option<String>,
    points: Option<String>,
    grid: Option<String>,
    status: Option<String>,
    #[serde(rename = "Driver")]
    driver: ErgastDriver,
    #[serde(rename = "Constructor")]
    constructor: Option<ErgastConstructor>,
    #[serde(rename = "Q1")]
    q1: Option<String>,
    #[serde(rename = "Q2")]
    q2: Option<String>,
    #[serde(rename = "Q3")]
    q3: Option<String>,
}

impl ErgastResult {
    fn to_row(&self) -> ResultRow {
        ResultRow {
            position: parse_num(&self.position),
            driver_number: parse_num(&self.driver.permanent_number),
            driver_code: self
                .driver
                .code
                .clone()
                .unwrap_or_else(|| self.driver.family_name.chars().take(3).collect::<String>().to_uppercase()),
            driver_name: format!("{} {}", self.driver.given_name, self.driver.family_name),
            constructor: self
                .constructor
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            grid: parse_num(&self.grid),
            points: parse_float(&self.points),
            status: self.status.clone(),
            q1: self.q1.clone(),
            q2: self.q2.clone(),
            q3: self.q3.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErgastDriver {
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
    code: Option<String>,
    #[serde(rename = "permanentNumber")]
    permanent_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErgastConstructor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErgastStandingsTable {
    #[serde(rename = "StandingsLists", default)]
    standings_lists: Vec<ErgastStandingsList>,
}

#[derive(Debug, Deserialize)]
struct ErgastStandingsList {
    #[serde(rename = "DriverStandings")]
    driver_standings: Option<Vec<ErgastDriverStanding>>,
    #[serde(rename = "ConstructorStandings")]
    constructor_standings: Option<Vec<ErgastConstructorStanding>>,
}

#[derive(Debug, Deserialize)]
struct ErgastDriverStanding {
    position: Option<String>,
    points: Option<String>,
    wins: Option<String>,
    #[serde(rename = "Driver")]
    driver: ErgastDriver,
}

impl ErgastDriverStanding {
    fn to_row(&self) -> StandingRow {
        StandingRow {
            position: parse_num(&self.position).unwrap_or(0),
            name: format!("{} {}", self.driver.given_name, self.driver.family_name),
            code: self.driver.code.clone(),
            points: parse_float(&self.points),
            wins: parse_num(&self.wins).unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErgastConstructorStanding {
    position: Option<String>,
    points: Option<String>,
    wins: Option<String>,
    #[serde(rename = "Constructor")]
    constructor: ErgastConstructor,
}

impl ErgastConstructorStanding {
    fn to_row(&self) -> StandingRow {
        StandingRow {
            position: parse_num(&self.position).unwrap_or(0),
            name: self.constructor.name.clone(),
            code: None,
            points: parse_float(&self.points),
            wins: parse_num(&self.wins).unwrap_or(0),
        }
    }
}

fn parse_num(value: &Option<String>) -> Option<u32> {
    value.as_deref().and_then(|v| v.parse().ok())
}

fn parse_float(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(base: &str, cache_dir: &std::path::Path) -> HistoricalArchive {
        HistoricalArchive::new(
            base,
            HttpClient::new(),
            CacheService::new(cache_dir.to_path_buf(), true),
            None,
        )
    }

    fn calendar_body() -> &'static str {
        r#"{"MRData": {"RaceTable": {"season": "2024", "Races": [
            {"round": "1", "raceName": "Bahrain Grand Prix", "date": "2024-03-02",
             "Circuit": {"circuitName": "Bahrain International Circuit",
                         "Location": {"locality": "Sakhir", "country": "Bahrain"}}},
            {"round": "7", "raceName": "Monaco Grand Prix", "date": "2024-05-26",
             "Circuit": {"circuitName": "Circuit de Monaco",
                         "Location": {"locality": "Monte-Carlo", "country": "Monaco"}}}
        ]}}}"#
    }

    #[tokio::test]
    async fn test_season_calendar() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let calendar = archive.season_calendar(2024).await.unwrap();
        assert_eq!(calendar.events.len(), 2);
        assert_eq!(
            calendar.events[1].summary(),
            "Round 7 : Monaco Grand Prix - Monte-Carlo, Monaco (2024-05-26)"
        );
    }

    #[tokio::test]
    async fn test_calendar_served_from_cache_on_second_call() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2020.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .expect(1)
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        archive.season_calendar(2020).await.unwrap();
        archive.season_calendar(2020).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_event_fuzzy_match() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let event = archive
            .event(2024, &RoundRef::Name("monaco".into()))
            .await
            .unwrap();
        assert_eq!(event.round, 7);

        let err = archive
            .event(2024, &RoundRef::Number(30))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_year_validated_before_any_request() {
        let tmp = tempfile::tempdir().unwrap();
        // Unroutable base URL: validation must fail first.
        let archive = archive("http://127.0.0.1:1", tmp.path());
        let err = archive.season_calendar(1949).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidParameter(_)));
        let err = archive.driver_standings(3000).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_driver_standings_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2023/driverStandings.json?limit=100")
            .with_status(200)
            .with_body(
                r#"{"MRData": {"StandingsTable": {"StandingsLists": [{
                    "DriverStandings": [
                        {"position": "1", "points": "575", "wins": "19",
                         "Driver": {"givenName": "Max", "familyName": "Verstappen",
                                    "code": "VER", "permanentNumber": "1"}},
                        {"position": "2", "points": "285", "wins": "2",
                         "Driver": {"givenName": "Sergio", "familyName": "Perez",
                                    "code": "PER", "permanentNumber": "11"}}
                    ]}]}}}"#,
            )
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let standings = archive.driver_standings(2023).await.unwrap();
        assert_eq!(standings.rows.len(), 2);
        assert_eq!(standings.rows[0].name, "Max Verstappen");
        assert_eq!(standings.rows[0].points, 575.0);
        assert_eq!(
            standings.describe_entry(&standings.rows[0], 2025),
            "Max Verstappen was 1st with 575 points and 19 wins"
        );
    }

    #[tokio::test]
    async fn test_race_results_sorted_and_shaped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;
        server
            .mock("GET", "/2024/7/results.json?limit=100")
            .with_status(200)
            .with_body(
                r#"{"MRData": {"RaceTable": {"Races": [
                    {"round": "7", "raceName": "Monaco Grand Prix",
                     "Circuit": {"circuitName": "Circuit de Monaco",
                                 "Location": {"locality": "Monte-Carlo", "country": "Monaco"}},
                     "Results": [
                        {"position": "2", "points": "18", "grid": "2", "status": "Finished",
                         "Driver": {"givenName": "Oscar", "familyName": "Piastri",
                                    "code": "PIA", "permanentNumber": "81"},
                         "Constructor": {"name": "McLaren"}},
                        {"position": "1", "points": "25", "grid": "1", "status": "Finished",
                         "Driver": {"givenName": "Charles", "familyName": "Leclerc",
                                    "code": "LEC", "permanentNumber": "16"},
                         "Constructor": {"name": "Ferrari"}}
                    ]}]}}}"#,
            )
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let results = archive
            .session_results(2024, &RoundRef::Number(7), SessionType::Race)
            .await
            .unwrap();
        assert_eq!(results.rows[0].driver_code, "LEC");
        assert_eq!(results.rows[0].points, 25.0);
        assert_eq!(results.rows[1].display_name(), "Oscar Piastri (PIA \u{2022} 81)");
    }

    #[tokio::test]
    async fn test_duplicate_driver_entries_collapse_to_best_position() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;
        // Verstappen appears at P1 and again at P3, with Piastri in between.
        server
            .mock("GET", "/2024/7/results.json?limit=100")
            .with_status(200)
            .with_body(
                r#"{"MRData": {"RaceTable": {"Races": [
                    {"round": "7", "raceName": "Monaco Grand Prix",
                     "Circuit": {"circuitName": "Circuit de Monaco",
                                 "Location": {"locality": "Monte-Carlo", "country": "Monaco"}},
                     "Results": [
                        {"position": "1", "points": "25", "grid": "1", "status": "Finished",
                         "Driver": {"givenName": "Max", "familyName": "Verstappen",
                                    "code": "VER", "permanentNumber": "1"},
                         "Constructor": {"name": "Red Bull"}},
                        {"position": "2", "points": "18", "grid": "2", "status": "Finished",
                         "Driver": {"givenName": "Oscar", "familyName": "Piastri",
                                    "code": "PIA", "permanentNumber": "81"},
                         "Constructor": {"name": "McLaren"}},
                        {"position": "3", "points": "15", "grid": "3", "status": "Finished",
                         "Driver": {"givenName": "Max", "familyName": "Verstappen",
                                    "code": "VER", "permanentNumber": "1"},
                         "Constructor": {"name": "Red Bull"}}
                    ]}]}}}"#,
            )
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let results = archive
            .session_results(2024, &RoundRef::Number(7), SessionType::Race)
            .await
            .unwrap();

        let codes: Vec<&str> = results.rows.iter().map(|r| r.driver_code.as_str()).collect();
        assert_eq!(codes, ["VER", "PIA"]);
        // the duplicate's better placing is the one that survives
        assert_eq!(results.rows[0].position, Some(1));
    }

    #[tokio::test]
    async fn test_practice_has_no_classification() {
        let tmp = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;

        let archive = archive(&server.url(), tmp.path());
        archive.cache().initialize().unwrap();
        let err = archive
            .session_results(2024, &RoundRef::Number(7), SessionType::Practice1)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_telemetry_from_local_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        std::fs::write(
            store.path().join("2024_07.json"),
            r#"{"year": 2024, "round": 7, "event_name": "Monaco Grand Prix",
                "driver_code": "LEC", "driver_number": 16, "lap_number": 51,
                "lap_time": "1:14.165",
                "samples": [{"distance": 0.0, "x": 100.0, "y": 250.0, "speed": 280.0, "gear": 7}]}"#,
        )
        .unwrap();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2024.json?limit=100")
            .with_status(200)
            .with_body(calendar_body())
            .create_async()
            .await;

        let archive = HistoricalArchive::new(
            server.url(),
            HttpClient::new(),
            CacheService::new(tmp.path().to_path_buf(), true),
            Some(store.path().to_path_buf()),
        );
        archive.cache().initialize().unwrap();

        let lap = archive
            .fastest_lap_telemetry(2024, &RoundRef::Name("Monaco".into()))
            .await
            .unwrap();
        assert_eq!(lap.driver_code, "LEC");
        assert_eq!(lap.samples.len(), 1);

        let err = archive
            .fastest_lap_telemetry(2024, &RoundRef::Number(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_profiles_fuzzy_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = archive("http://127.0.0.1:1", tmp.path());
        assert_eq!(archive.driver_profile("verstappen").unwrap().code, "VER");
        assert_eq!(archive.driver_profile("LEC").unwrap().name, "Charles Leclerc");
        assert!(archive.driver_profile("nobody at all").is_err());
        assert_eq!(
            archive.constructor_profile("mclaren").unwrap().name,
            "McLaren"
        );
    }
}
