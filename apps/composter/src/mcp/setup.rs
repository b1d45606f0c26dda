use clap::ValueEnum;
use directories::BaseDirs;
use serde_json::{Map, Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SERVER_KEY: &str = "composter";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum McpClient {
    Claude,
    Cursor,
    Vscode,
    Windsurf,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unable to determine home directory")]
    NoHome,
    #[error("failed to write {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to encode client config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the launched server should run and how.
#[derive(Debug, Clone)]
pub struct ServerLaunch {
    pub command: PathBuf,
    pub cwd: PathBuf,
    pub dev: bool,
}

#[derive(Debug)]
pub struct SetupReport {
    pub path: PathBuf,
    pub replaced_invalid: bool,
    pub created_dir: bool,
}

impl McpClient {
    pub fn display_name(self) -> &'static str {
        match self {
            McpClient::Claude => "Claude Desktop",
            McpClient::Cursor => "Cursor",
            McpClient::Vscode => "VS Code (Copilot)",
            McpClient::Windsurf => "Windsurf",
        }
    }

    /// Top-level key under which the client lists its servers.
    pub fn servers_key(self) -> &'static str {
        match self {
            McpClient::Vscode => "servers",
            _ => "mcpServers",
        }
    }

    pub fn config_path(self, project_dir: &Path) -> Result<PathBuf, SetupError> {
        let dirs = BaseDirs::new().ok_or(SetupError::NoHome)?;
        Ok(match self {
            McpClient::Claude => {
                if cfg!(any(target_os = "macos", target_os = "windows")) {
                    dirs.config_dir().join("Claude")
                } else {
                    dirs.config_dir().join("claude")
                }
                .join("claude_desktop_config.json")
            }
            McpClient::Cursor => project_dir.join(".cursor").join("mcp.json"),
            McpClient::Vscode => project_dir.join(".vscode").join("mcp.json"),
            McpClient::Windsurf => dirs
                .home_dir()
                .join(".codeium")
                .join("windsurf")
                .join("mcp_config.json"),
        })
    }

    pub fn server_entry(self, launch: &ServerLaunch) -> Value {
        let mut entry = Map::new();
        if self == McpClient::Vscode {
            entry.insert("type".into(), json!("stdio"));
        }
        entry.insert("command".into(), json!(launch.command.display().to_string()));
        entry.insert("args".into(), json!(["mcp", "serve"]));
        entry.insert("cwd".into(), json!(launch.cwd.display().to_string()));
        if launch.dev {
            entry.insert("env".into(), json!({"COMPOSTER_DEV": "true"}));
        }
        Value::Object(entry)
    }
}

/// Merge the composter entry into `existing`, keeping every other key.
pub fn merge_config(client: McpClient, existing: Option<Value>, entry: Value) -> Value {
    let mut root = match existing {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let key = client.servers_key();
    let mut servers = match root.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    servers.insert(SERVER_KEY.to_string(), entry);
    root.insert(key.to_string(), Value::Object(servers));
    Value::Object(root)
}

pub fn install(
    client: McpClient,
    path: &Path,
    launch: &ServerLaunch,
) -> Result<SetupReport, SetupError> {
    let io_err = |source| SetupError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut replaced_invalid = false;
    let existing = match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    target: "composter::setup",
                    path = %path.display(),
                    error = %err,
                    "existing client config is invalid; replacing it"
                );
                replaced_invalid = true;
                None
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(io_err(err)),
    };

    let mut created_dir = false;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
            created_dir = true;
        }
    }

    let merged = merge_config(client, existing, client.server_entry(launch));
    let serialized = serde_json::to_string_pretty(&merged)?;
    fs::write(path, serialized).map_err(io_err)?;

    Ok(SetupReport {
        path: path.to_path_buf(),
        replaced_invalid,
        created_dir,
    })
}
