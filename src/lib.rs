pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod ui;

pub use error::{McpSseError, Result};
pub use mcp::{classify, MessageKind, Sinks, StreamClient};
