//! MCP protocol layer: tool registry, argument validation, and the pmcp
//! server wrapper.

mod handlers;
pub mod schema;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{Tool, ToolCategory, ToolHandler, ToolRegistry};
