//! Integration tests exercising the tool registry end to end: adapters,
//! validation, normalization, and the structured error payloads.

use std::sync::Arc;

use serde_json::json;

use f1_stats_mcp::mcp::{ToolCategory, ToolRegistry};
use f1_stats_mcp::normalize::DataTable;
use f1_stats_mcp::sources::{HistoricalArchive, OpenF1Client};
use f1_stats_mcp::utils::{CacheService, HttpClient};

/// Registry wired against the given archive and live base URLs, cache
/// disabled so mock expectations see every request.
fn registry_for(archive_url: &str, live_url: &str) -> ToolRegistry {
    let http = HttpClient::new();
    let archive = Arc::new(HistoricalArchive::new(
        archive_url,
        http.clone(),
        CacheService::new(std::env::temp_dir(), false),
        None,
    ));
    let live = Arc::new(OpenF1Client::new(format!("{}/", live_url), http));
    ToolRegistry::new(archive, live)
}

/// Registry whose adapters cannot reach anything. Good for proving that
/// failures happen before the network.
fn offline_registry() -> ToolRegistry {
    registry_for("http://127.0.0.1:1", "http://127.0.0.1:1")
}

#[tokio::test]
async fn tool_menu_is_complete() {
    let registry = offline_registry();
    assert_eq!(registry.len(), 14);
    assert_eq!(registry.by_category(ToolCategory::Historical).len(), 8);
    assert_eq!(registry.by_category(ToolCategory::Live).len(), 6);

    // every tool carries a schema with an object root
    for tool in registry.all() {
        assert_eq!(tool.input_schema["type"], "object", "tool {}", tool.name);
        assert!(!tool.description.is_empty(), "tool {}", tool.name);
    }
}

#[tokio::test]
async fn out_of_range_year_fails_before_network() {
    let registry = offline_registry();
    for (tool, args) in [
        ("season_calendar", json!({"year": 1949})),
        ("driver_standings", json!({"year": 3000})),
        ("session_results", json!({"year": 1900, "round": "1", "session": "race"})),
    ] {
        let payload = registry.execute(tool, args).await.unwrap();
        assert_eq!(
            payload["error"]["kind"], "invalid_parameter",
            "tool {}",
            tool
        );
    }
}

#[tokio::test]
async fn unknown_live_filter_fails_before_network() {
    let registry = offline_registry();
    let payload = registry
        .execute(
            "live_query",
            json!({"endpoint": "weather", "filters": {"driver_number": 16}}),
        )
        .await
        .unwrap();
    assert_eq!(payload["error"]["kind"], "invalid_parameter");
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("driver_number"));
}

#[tokio::test]
async fn unreachable_upstream_becomes_error_payload() {
    let registry = offline_registry();
    let payload = registry
        .execute("season_calendar", json!({"year": 2020}))
        .await
        .unwrap();
    assert_eq!(payload["error"]["kind"], "upstream_unavailable");
}

#[tokio::test]
async fn driver_standings_normalize_to_a_table() {
    let mut archive_server = mockito::Server::new_async().await;
    archive_server
        .mock("GET", "/2023/driverStandings.json?limit=100")
        .with_status(200)
        .with_body(include_str!("fixtures/driver_standings_2023.json"))
        .create_async()
        .await;

    let registry = registry_for(&archive_server.url(), "http://127.0.0.1:1");
    let payload = registry
        .execute("driver_standings", json!({"year": 2023}))
        .await
        .unwrap();

    assert_eq!(payload["type"], "table");
    let table: DataTable = serde_json::from_value(payload["table"].clone()).unwrap();
    assert_eq!(table.columns, ["Pos", "Driver", "Points", "Wins"]);
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[0], ["1", "Max Verstappen (VER)", "575", "19"]);
    assert_eq!(table.rows[4], ["5", "Charles Leclerc (LEC)", "206", "1"]);
}

#[tokio::test]
async fn single_driver_standings_render_as_text() {
    let mut archive_server = mockito::Server::new_async().await;
    archive_server
        .mock("GET", "/2023/driverStandings.json?limit=100")
        .with_status(200)
        .with_body(include_str!("fixtures/driver_standings_2023.json"))
        .create_async()
        .await;

    let registry = registry_for(&archive_server.url(), "http://127.0.0.1:1");
    let payload = registry
        .execute("driver_standings", json!({"year": 2023, "driver": "alonso"}))
        .await
        .unwrap();

    assert_eq!(payload["type"], "text");
    assert_eq!(
        payload["text"],
        "Fernando Alonso was 4th with 206 points and 0 wins"
    );
}

#[tokio::test]
async fn constructor_standings_are_ordered_by_points() {
    let mut archive_server = mockito::Server::new_async().await;
    archive_server
        .mock("GET", "/2023/constructorStandings.json?limit=100")
        .with_status(200)
        .with_body(include_str!("fixtures/constructor_standings_2023.json"))
        .create_async()
        .await;

    let registry = registry_for(&archive_server.url(), "http://127.0.0.1:1");
    let payload = registry
        .execute("constructor_standings", json!({"year": 2023}))
        .await
        .unwrap();

    let table: DataTable = serde_json::from_value(payload["table"].clone()).unwrap();
    assert_eq!(table.columns, ["Pos", "Constructor", "Points", "Wins"]);
    assert_eq!(table.rows.len(), 10);
    assert_eq!(table.rows[0][1], "Red Bull");

    let points: Vec<f64> = table
        .rows
        .iter()
        .map(|r| r[2].parse::<f64>().unwrap())
        .collect();
    assert!(points.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn live_query_with_no_matches_is_an_empty_table() {
    let mut live_server = mockito::Server::new_async().await;
    live_server
        .mock("GET", "/pit?session_key=9161")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let registry = registry_for("http://127.0.0.1:1", &live_server.url());
    let payload = registry
        .execute(
            "live_query",
            json!({"endpoint": "pit", "filters": {"session_key": "9161"}}),
        )
        .await
        .unwrap();

    assert_eq!(payload["type"], "table");
    let table: DataTable = serde_json::from_value(payload["table"].clone()).unwrap();
    assert!(table.is_empty());
}

#[tokio::test]
async fn live_query_builds_comparison_filters() {
    let mut live_server = mockito::Server::new_async().await;
    let mock = live_server
        .mock("GET", "/laps?lap_duration%3E=95&session_key=9161")
        .with_status(200)
        .with_body(r#"[{"lap_number": 12, "lap_duration": 96.1}]"#)
        .create_async()
        .await;

    let registry = registry_for("http://127.0.0.1:1", &live_server.url());
    let payload = registry
        .execute(
            "live_query",
            json!({
                "endpoint": "laps",
                "filters": {"lap_duration": ">=95", "session_key": "9161"},
            }),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    let table: DataTable = serde_json::from_value(payload["table"].clone()).unwrap();
    assert_eq!(table.rows.len(), 1);
}

#[tokio::test]
async fn catalogue_tools_never_touch_the_network() {
    let registry = offline_registry();

    let payload = registry.execute("list_endpoints", json!({})).await.unwrap();
    let endpoints = payload["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 13);
    assert!(endpoints
        .iter()
        .any(|e| e["endpoint"] == "laps" && e["filters"].as_array().unwrap().len() == 7));

    let payload = registry
        .execute("endpoint_info", json!({"endpoint": "weather"}))
        .await
        .unwrap();
    assert!(payload["text"].as_str().unwrap().contains("track_temperature"));

    let payload = registry
        .execute("filter_info", json!({"filter": "compound"}))
        .await
        .unwrap();
    assert!(payload["text"].as_str().unwrap().contains("INTERMEDIATE"));
}

#[tokio::test]
async fn profile_tools_work_offline() {
    let registry = offline_registry();

    let payload = registry
        .execute("driver_info", json!({"name": "piastri"}))
        .await
        .unwrap();
    assert!(payload["text"].as_str().unwrap().contains("Oscar Piastri"));
    assert_eq!(payload["profile"]["team"], "McLaren");
    assert_eq!(payload["season"], 2025);

    let payload = registry
        .execute("constructor_info", json!({"name": "ferrari"}))
        .await
        .unwrap();
    assert!(payload["text"].as_str().unwrap().contains("Ferrari"));

    let payload = registry
        .execute("driver_info", json!({"name": "zzzzzz"}))
        .await
        .unwrap();
    assert_eq!(payload["error"]["kind"], "not_found");
}

#[tokio::test]
async fn session_enum_rejects_practice() {
    // the schema only offers competitive and qualifying sessions
    let registry = offline_registry();
    let payload = registry
        .execute(
            "session_results",
            json!({"year": 2024, "round": "7", "session": "practice_1"}),
        )
        .await
        .unwrap();
    assert_eq!(payload["error"]["kind"], "invalid_parameter");
}

#[tokio::test]
async fn race_results_resolve_fuzzy_names_and_sort_by_position() {
    let mut archive_server = mockito::Server::new_async().await;
    archive_server
        .mock("GET", "/2021.json?limit=100")
        .with_status(200)
        .with_body(
            r#"{"MRData": {"RaceTable": {"Races": [
                {"round": "22", "raceName": "Abu Dhabi Grand Prix", "date": "2021-12-12",
                 "Circuit": {"circuitName": "Yas Marina Circuit",
                             "Location": {"locality": "Abu Dhabi", "country": "UAE"}}}
            ]}}}"#,
        )
        .create_async()
        .await;
    archive_server
        .mock("GET", "/2021/22/results.json?limit=100")
        .with_status(200)
        .with_body(
            r#"{"MRData": {"RaceTable": {"Races": [
                {"round": "22", "raceName": "Abu Dhabi Grand Prix",
                 "Circuit": {"circuitName": "Yas Marina Circuit",
                             "Location": {"locality": "Abu Dhabi", "country": "UAE"}},
                 "Results": [
                    {"position": "2", "points": "18", "grid": "1", "status": "Finished",
                     "Driver": {"givenName": "Lewis", "familyName": "Hamilton",
                                "code": "HAM", "permanentNumber": "44"},
                     "Constructor": {"name": "Mercedes"}},
                    {"position": "1", "points": "26", "grid": "2", "status": "Finished",
                     "Driver": {"givenName": "Max", "familyName": "Verstappen",
                                "code": "VER", "permanentNumber": "33"},
                     "Constructor": {"name": "Red Bull"}},
                    {"position": "3", "points": "15", "grid": "5", "status": "Finished",
                     "Driver": {"givenName": "Carlos", "familyName": "Sainz",
                                "code": "SAI", "permanentNumber": "55"},
                     "Constructor": {"name": "Ferrari"}}
                ]}]}}}"#,
        )
        .create_async()
        .await;

    let registry = registry_for(&archive_server.url(), "http://127.0.0.1:1");
    let payload = registry
        .execute(
            "session_results",
            json!({"year": 2021, "round": "abu dhabi", "session": "race"}),
        )
        .await
        .unwrap();

    let table: DataTable = serde_json::from_value(payload["table"].clone()).unwrap();
    let positions: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(positions, ["1", "2", "3"]);
    assert!(table.rows[0][1].contains("Max Verstappen"));
    // one row per driver
    let drivers: std::collections::HashSet<&String> =
        table.rows.iter().map(|r| &r[1]).collect();
    assert_eq!(drivers.len(), table.rows.len());
}

#[tokio::test]
async fn repeated_calls_yield_identical_payloads() {
    let mut archive_server = mockito::Server::new_async().await;
    archive_server
        .mock("GET", "/2023/driverStandings.json?limit=100")
        .with_status(200)
        .with_body(include_str!("fixtures/driver_standings_2023.json"))
        .expect(2)
        .create_async()
        .await;

    let registry = registry_for(&archive_server.url(), "http://127.0.0.1:1");
    let args = json!({"year": 2023});
    let first = registry.execute("driver_standings", args.clone()).await.unwrap();
    let second = registry.execute("driver_standings", args).await.unwrap();
    assert_eq!(first, second);
}

#[test]
fn historical_and_live_rows_carry_the_same_driver_codes() {
    // both normalizers preserve the driver identifier set verbatim
    use f1_stats_mcp::models::{ResultRow, SessionResults, SessionType};

    let codes = ["VER", "LEC", "HAM"];
    let historical = SessionResults {
        year: 2024,
        round: 7,
        event_name: "Monaco Grand Prix".into(),
        session: SessionType::Race,
        rows: codes
            .iter()
            .enumerate()
            .map(|(i, code)| ResultRow {
                position: Some(i as u32 + 1),
                driver_number: Some(i as u32 + 1),
                driver_code: code.to_string(),
                driver_name: format!("Driver {}", code),
                constructor: "Team".into(),
                grid: None,
                points: 0.0,
                status: None,
                q1: None,
                q2: None,
                q3: None,
            })
            .collect(),
    };
    let live_records: Vec<_> = codes
        .iter()
        .map(|code| json!({"name_acronym": code, "session_key": 9161}))
        .collect();

    let historical_table = DataTable::from_session_results(&historical);
    let live_table = DataTable::from_records("drivers", &live_records);

    let from_historical: std::collections::HashSet<String> = historical_table
        .rows
        .iter()
        .filter_map(|r| r[1].split('(').nth(1))
        .map(|s| s.split_whitespace().next().unwrap_or("").to_string())
        .collect();
    let acronym_col = live_table
        .columns
        .iter()
        .position(|c| c == "name_acronym")
        .unwrap();
    let from_live: std::collections::HashSet<String> = live_table
        .rows
        .iter()
        .map(|r| r[acronym_col].clone())
        .collect();
    assert_eq!(from_historical, from_live);
}

#[test]
fn record_normalization_is_deterministic() {
    let records = vec![
        json!({"b": 1, "a": "x", "nested": {"k": 2}}),
        json!({"c": null, "a": "y"}),
    ];
    let first = DataTable::from_records("t", &records);
    let second = DataTable::from_records("t", &records);
    assert_eq!(first.columns, second.columns);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.columns, ["a", "b", "c", "nested"]);
    assert_eq!(first.rows[1], ["y", "-", "-", "-"]);
}
