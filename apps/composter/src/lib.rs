pub mod auth;
pub mod config;
pub mod mcp;
pub mod telemetry;
pub mod terminal;
pub mod vault;
