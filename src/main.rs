use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use f1_stats_mcp::config::{find_config_file, get_config, load_config, Config};
use f1_stats_mcp::mcp::{McpServer, ToolCategory, ToolRegistry};
use f1_stats_mcp::sources::{HistoricalArchive, OpenF1Client};
use f1_stats_mcp::utils::{CacheService, HttpClient};
use serde_json::{json, Value};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// F1 Stats MCP - Formula 1 statistics over MCP: historical archive, live timing, and a web UI
#[derive(Parser, Debug)]
#[command(name = "f1-stats-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Formula 1 statistics server: historical archive and live timing over MCP", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable the archive response cache for this command
    #[arg(long, global = true, default_value_t = false)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

/// Which championship standings to show
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StandingsTarget {
    Drivers,
    Constructors,
}

/// Telemetry channel for the track trace
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TrackChannel {
    Speed,
    Gear,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the race calendar for a season
    #[command(alias = "cal")]
    Calendar {
        /// Championship season (1950 to present)
        year: i32,
    },

    /// Show one Grand Prix of a season
    Event {
        /// Championship season
        year: i32,

        /// Round number or Grand Prix name (e.g., "7" or "Monaco")
        round: String,
    },

    /// Show the classification of a session
    #[command(alias = "res")]
    Results {
        /// Championship season
        year: i32,

        /// Round number or Grand Prix name
        round: String,

        /// Session: qualifying, sprint, or race
        #[arg(default_value = "race")]
        session: String,
    },

    /// Show championship standings for a season
    Standings {
        /// Championship season
        year: i32,

        /// Which championship
        #[arg(long, short, value_enum, default_value_t = StandingsTarget::Drivers)]
        target: StandingsTarget,

        /// Narrow to one driver or constructor (fuzzy name match)
        #[arg(long, short)]
        name: Option<String>,
    },

    /// Show the profile of a current-grid driver
    Driver {
        /// Driver name, code, or team
        name: String,
    },

    /// Show the profile of a current-grid constructor
    Constructor {
        /// Constructor or driver name
        name: String,
    },

    /// Show the fastest race lap of an event as a track trace
    Track {
        /// Championship season
        year: i32,

        /// Round number or Grand Prix name
        round: String,

        /// Telemetry channel to plot
        #[arg(long, short, value_enum, default_value_t = TrackChannel::Speed)]
        channel: TrackChannel,
    },

    /// Query a live timing endpoint
    Live {
        /// Endpoint name (e.g., "laps", "sessions", "drivers")
        endpoint: String,

        /// Filters as name=value pairs; values may carry a comparison
        /// operator (e.g., "speed=>=300")
        #[arg(long, short)]
        filter: Vec<String>,
    },

    /// Show the live API endpoint catalogue, or help for one endpoint/filter
    #[command(alias = "ep")]
    Endpoints {
        /// Endpoint to describe
        endpoint: Option<String>,

        /// Filter to describe
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// List the MCP tools this server exposes
    Tools,

    /// Run the MCP server (stdio for desktop clients, HTTP for remote ones)
    Serve {
        /// Run in stdio mode (for MCP clients like Claude Desktop)
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in HTTP/SSE mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to for HTTP mode
        #[arg(long)]
        host: Option<String>,

        /// Also serve the web UI (HTTP mode only)
        #[arg(long)]
        ui: bool,

        /// Port for the web UI
        #[arg(long)]
        ui_port: Option<u16>,
    },

    /// Chat with the statistics server through an LLM agent
    Agent {
        /// URL of a running MCP server; defaults to the configured one
        #[arg(long)]
        server_url: Option<String>,

        /// Single question to ask; omit for an interactive session
        question: Option<String>,
    },

    /// Show the effective configuration as TOML
    Config,

    /// Manage the archive response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Show cache location and entry count
    Status,

    /// Clear all cached archive responses
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("f1_stats_mcp={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    let registry = Arc::new(build_registry(&config, cli.no_cache));

    match cli.command {
        Some(Commands::Calendar { year }) => {
            let payload = registry
                .execute("season_calendar", json!({"year": year}))
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Event { year, round }) => {
            let payload = registry
                .execute("event_info", json!({"year": year, "round": round}))
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Results {
            year,
            round,
            session,
        }) => {
            let payload = registry
                .execute(
                    "session_results",
                    json!({"year": year, "round": round, "session": session}),
                )
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Standings { year, target, name }) => {
            let (tool, entrant_key) = match target {
                StandingsTarget::Drivers => ("driver_standings", "driver"),
                StandingsTarget::Constructors => ("constructor_standings", "constructor"),
            };
            let mut args = json!({"year": year});
            if let Some(name) = name {
                args[entrant_key] = Value::String(name);
            }
            let payload = registry.execute(tool, args).await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Driver { name }) => {
            let payload = registry.execute("driver_info", json!({"name": name})).await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Constructor { name }) => {
            let payload = registry
                .execute("constructor_info", json!({"name": name}))
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Track {
            year,
            round,
            channel,
        }) => {
            let channel = match channel {
                TrackChannel::Speed => "speed",
                TrackChannel::Gear => "gear",
            };
            let payload = registry
                .execute(
                    "track_visualization",
                    json!({"year": year, "round": round, "channel": channel}),
                )
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Live { endpoint, filter }) => {
            let mut filters = serde_json::Map::new();
            for pair in &filter {
                match pair.split_once('=') {
                    Some((name, value)) => {
                        filters.insert(name.to_string(), Value::String(value.to_string()));
                    }
                    None => anyhow::bail!("filter '{}' is not in name=value form", pair),
                }
            }
            let payload = registry
                .execute(
                    "live_query",
                    json!({"endpoint": endpoint, "filters": filters}),
                )
                .await?;
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Endpoints { endpoint, filter }) => {
            let payload = if let Some(filter) = filter {
                registry
                    .execute("filter_info", json!({"filter": filter}))
                    .await?
            } else if let Some(endpoint) = endpoint {
                registry
                    .execute("endpoint_info", json!({"endpoint": endpoint}))
                    .await?
            } else {
                registry.execute("list_endpoints", json!({})).await?
            };
            output_payload(&payload, cli.output)?;
        }

        Some(Commands::Tools) => {
            for category in [ToolCategory::Historical, ToolCategory::Live] {
                println!("{} tools:", category.name());
                for tool in registry.by_category(category) {
                    println!("  {} - {}", tool.name, tool.description);
                }
            }
        }

        Some(Commands::Serve {
            stdio,
            http,
            port,
            host,
            ui,
            ui_port,
        }) => {
            let use_http = http || !stdio;
            let host = host.unwrap_or_else(|| config.server.host.clone());

            if use_http {
                let addr = format!("{}:{}", host, port.unwrap_or(config.server.port));
                let server = McpServer::new(registry.as_ref().clone())?;
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                if ui {
                    let ui_addr =
                        format!("{}:{}", host, ui_port.unwrap_or(config.server.ui_port));
                    let ui_registry = registry.clone();
                    tokio::spawn(async move {
                        if let Err(e) = f1_stats_mcp::ui::serve(ui_registry, &ui_addr).await {
                            tracing::error!("web UI failed: {}", e);
                        }
                    });
                }

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                let server = McpServer::new(registry.as_ref().clone())?;
                server.run().await?;
            }
        }

        Some(Commands::Agent {
            server_url,
            question,
        }) => {
            let url = server_url.unwrap_or_else(|| config.agent.server_url.clone());
            let server = f1_stats_mcp::agent::AgentClient::connect(&url).await?;
            let model = f1_stats_mcp::agent::ChatModel::new(
                config.agent.llm_base_url.clone(),
                config.agent.llm_model.clone(),
                config.agent.api_key.clone(),
            );
            let mut conversation = f1_stats_mcp::agent::Conversation::new(server, model);

            match question {
                Some(question) => {
                    let answer = conversation.ask(&question).await?;
                    println!("{}", answer);
                }
                None => {
                    let stdin = std::io::stdin();
                    loop {
                        print!("> ");
                        std::io::stdout().flush()?;
                        let mut line = String::new();
                        if stdin.lock().read_line(&mut line)? == 0 {
                            break;
                        }
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if line == "exit" || line == "quit" {
                            break;
                        }
                        match conversation.ask(line).await {
                            Ok(answer) => println!("{}", answer),
                            Err(e) => {
                                eprintln!("error: {}", e);
                                if matches!(
                                    e,
                                    f1_stats_mcp::agent::AgentError::ConnectionLost(_)
                                ) {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }

        Some(Commands::Config) => {
            println!("{}", config.to_toml()?);
        }

        Some(Commands::Cache { command }) => {
            let cache = CacheService::new(config.archive.cache_dir.clone(), true);
            cache.initialize()?;
            match command {
                CacheCommands::Status => {
                    println!("Directory: {}", cache.dir().display());
                    println!("Entries: {}", cache.len());
                }
                CacheCommands::Clear => {
                    cache.clear()?;
                    if !cli.quiet {
                        eprintln!("Cache cleared.");
                    }
                }
            }
        }

        None => {
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  calendar <year>            - Season calendar");
            println!("  results <year> <round>     - Session classification");
            println!("  standings <year>           - Championship standings");
            println!("  live <endpoint>            - Query live timing");
            println!("  serve                      - Run the MCP server");
        }
    }

    Ok(())
}

/// Wire up the adapters and the tool registry from configuration.
fn build_registry(config: &Config, no_cache: bool) -> ToolRegistry {
    let http = HttpClient::new();
    let cache = CacheService::new(config.archive.cache_dir.clone(), !no_cache);
    if let Err(e) = cache.initialize() {
        tracing::warn!("cache unavailable: {}", e);
    }

    let archive = Arc::new(HistoricalArchive::new(
        config.archive.base_url.clone(),
        http.clone(),
        cache,
        config.archive.telemetry_dir.clone(),
    ));
    let live = Arc::new(OpenF1Client::new(config.live.base_url.clone(), http));
    ToolRegistry::new(archive, live)
}

/// Print a normalized tool payload.
fn output_payload(payload: &Value, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    if actual_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(payload)?);
        return Ok(());
    }

    if let Some(error) = payload.get("error") {
        anyhow::bail!(
            "{}: {}",
            error.get("kind").and_then(|k| k.as_str()).unwrap_or("error"),
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
        );
    }

    match payload.get("type").and_then(|t| t.as_str()) {
        Some("table") => {
            use comfy_table::Table;
            let data: f1_stats_mcp::normalize::DataTable =
                serde_json::from_value(payload["table"].clone())?;
            if let Some(title) = Some(&data.title).filter(|t| !t.is_empty()) {
                println!("{}", title);
            }
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(data.columns.clone());
            for row in &data.rows {
                table.add_row(row.clone());
            }
            println!("{table}");
        }
        Some("text") => {
            println!(
                "{}",
                payload.get("text").and_then(|t| t.as_str()).unwrap_or("")
            );
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }
    Ok(())
}
