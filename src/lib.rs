//! # F1 Stats MCP
//!
//! A Model Context Protocol (MCP) server exposing Formula 1 statistics from two
//! upstream sources, plus a companion agent client that drives the tools over a
//! streaming transport.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (events, results, standings, telemetry)
//! - [`sources`]: The two data adapters, the historical archive and the OpenF1 live API
//! - [`normalize`]: Converts heterogeneous upstream shapes into a uniform table/plot form
//! - [`mcp`]: Tool registry, schema validation, and the MCP server
//! - [`agent`]: MCP client driving the tools from a chat model
//! - [`ui`]: Web UI with one tab per tool category
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client, disk cache, fuzzy matching, validation helpers

pub mod agent;
pub mod config;
pub mod mcp;
pub mod models;
pub mod normalize;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use normalize::DataTable;
pub use sources::{HistoricalArchive, OpenF1Client, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
