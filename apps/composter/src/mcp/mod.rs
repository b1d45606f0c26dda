pub mod protocol;
pub mod registry;
pub mod server;
pub mod setup;
pub mod tools;

pub use server::McpServer;
pub use tools::{ToolOutput, VaultTools};
