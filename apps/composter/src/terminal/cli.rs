use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::mcp::setup::McpClient;
use crate::telemetry::logging::{LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "composter",
    about = "Expose your Composter component vault to AI assistants over MCP",
    author,
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        value_enum,
        global = true,
        env = "COMPOSTER_LOG_LEVEL",
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: Option<LogLevel>,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        global = true,
        env = "COMPOSTER_LOG_FILE",
        help = "Write structured logs to the specified file"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    /// `fallback` applies when neither the flag nor the env var is set.
    pub fn to_config(&self, fallback: LogLevel) -> LogConfig {
        LogConfig {
            level: self.level.unwrap_or(fallback),
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Model Context Protocol integration
    #[command(subcommand)]
    Mcp(McpCommand),
}

#[derive(Subcommand, Debug)]
pub enum McpCommand {
    /// Run the MCP server on stdin/stdout
    Serve(ServeArgs),
    /// Register the server with an AI client
    Init(InitArgs),
    /// Show how to configure the server by hand
    Info,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Talk to the local development API")]
    pub dev: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, value_enum, default_value_t = McpClient::Claude, help = "Client to configure")]
    pub client: McpClient,

    #[arg(
        long,
        help = "Launch the server from the binary's directory instead of the current one"
    )]
    pub global: bool,

    #[arg(long, help = "Point the configured server at the local development API")]
    pub dev: bool,
}

impl Cli {
    /// Serving defaults to info since stderr is free for diagnostics there.
    pub fn default_log_level(&self) -> LogLevel {
        match self.command {
            Command::Mcp(McpCommand::Serve(_)) => LogLevel::Info,
            _ => LogLevel::Warn,
        }
    }
}
