//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::CacheService;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Historical archive settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Live API settings
    #[serde(default)]
    pub live: LiveConfig,

    /// Server transport settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Agent client settings
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Historical archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the Ergast-compatible archive API
    #[serde(default = "default_archive_url")]
    pub base_url: String,

    /// Directory for the on-disk response cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory holding fastest-lap telemetry JSON files, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_dir: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_url(),
            cache_dir: default_cache_dir(),
            telemetry_dir: None,
        }
    }
}

fn default_archive_url() -> String {
    "https://api.jolpi.ca/ergast/f1".to_string()
}

fn default_cache_dir() -> PathBuf {
    CacheService::default_dir()
}

/// Live API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Base URL of the OpenF1 API, trailing slash included
    #[serde(default = "default_live_url")]
    pub base_url: String,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_live_url(),
        }
    }
}

fn default_live_url() -> String {
    "https://api.openf1.org/v1/".to_string()
}

/// Server transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host for HTTP transports
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the MCP streamable-HTTP transport
    #[serde(default = "default_mcp_port")]
    pub port: u16,

    /// Port for the web UI
    #[serde(default = "default_ui_port")]
    pub ui_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_mcp_port(),
            ui_port: default_ui_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mcp_port() -> u16 {
    8000
}

fn default_ui_port() -> u16 {
    7860
}

/// Agent client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// URL of the MCP server the agent connects to
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Base URL of the OpenAI-compatible chat API
    #[serde(default = "default_llm_url")]
    pub llm_base_url: String,

    /// Model identifier sent with chat requests
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// API key, read from the environment
    #[serde(default = "default_api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            llm_base_url: default_llm_url(),
            llm_model: default_llm_model(),
            api_key: default_api_key(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_llm_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok()
}

impl Config {
    /// Render the configuration as pretty TOML, for `config show` and for
    /// seeding a new config file.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("F1_STATS").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}

/// Look for a config file in the conventional locations: `./f1-stats.toml`,
/// then the platform config directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("f1-stats.toml");
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("f1-stats-mcp").join("config.toml"))
        .filter(|p| p.is_file())
}
