use std::env;
use std::path::PathBuf;
use tracing::{error, info};

use crate::auth::{CredentialStore, LOGIN_HINT};
use crate::config::{API_URL_ENV, BridgeConfig, DEV_ENV};
use crate::mcp::setup::{self, McpClient, ServerLaunch, SetupError};
use crate::mcp::{McpServer, VaultTools};
use crate::terminal::cli::{Cli, Command, InitArgs, McpCommand, ServeArgs};
use crate::terminal::error::CliError;
use crate::vault::VaultClient;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Mcp(McpCommand::Serve(args)) => serve(args).await,
        Command::Mcp(McpCommand::Init(args)) => init(args),
        Command::Mcp(McpCommand::Info) => print_info(),
    }
}

async fn serve(args: ServeArgs) -> Result<(), CliError> {
    info!(target: "composter::mcp", "starting Composter MCP server");
    let config = BridgeConfig::from_env(args.dev)?;
    if config.credentials.load().is_none() {
        error!(
            target: "composter::mcp",
            session_file = %config.credentials.path().display(),
            "no stored session"
        );
        return Err(CliError::NotLoggedIn { hint: LOGIN_HINT });
    }
    info!(target: "composter::mcp", api_url = %config.api_url, "using vault API");

    let client = VaultClient::new(config.api_url, config.credentials)?;
    McpServer::new(VaultTools::new(client))
        .run_stdio()
        .await
        .map_err(|err| CliError::Server(err.to_string()))
}

fn init(args: InitArgs) -> Result<(), CliError> {
    let credentials = CredentialStore::from_env()?;
    if !credentials.exists() {
        return Err(CliError::NotLoggedIn { hint: LOGIN_HINT });
    }

    let command = env::current_exe()?;
    let project_dir = env::current_dir()?;
    let cwd = if args.global {
        command
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        project_dir.clone()
    };
    let path = args.client.config_path(&project_dir)?;
    let launch = ServerLaunch {
        command,
        cwd,
        dev: args.dev,
    };
    let report = setup::install(args.client, &path, &launch)?;

    if report.replaced_invalid {
        eprintln!(
            "warning: {} was not valid JSON and has been replaced",
            report.path.display()
        );
    }
    println!(
        "Configured {} to launch Composter.",
        args.client.display_name()
    );
    println!("  config:  {}", report.path.display());
    println!("  command: {} mcp serve", launch.command.display());
    println!("  cwd:     {}", launch.cwd.display());
    if launch.dev {
        println!("  mode:    development ({DEV_ENV}=true)");
    }
    println!(
        "Restart {} to pick up the change.",
        args.client.display_name()
    );
    Ok(())
}

fn print_info() -> Result<(), CliError> {
    let command = env::current_exe()?;
    let credentials = CredentialStore::from_env()?;

    println!("Composter MCP server");
    println!("  binary:    {}", command.display());
    println!("  session:   {}", credentials.path().display());
    if credentials.exists() {
        println!("  logged in: yes");
    } else {
        println!("  logged in: no ({LOGIN_HINT})");
    }

    let launch = ServerLaunch {
        command,
        cwd: env::current_dir()?,
        dev: false,
    };
    let snippet = setup::merge_config(
        McpClient::Claude,
        None,
        McpClient::Claude.server_entry(&launch),
    );
    let rendered = serde_json::to_string_pretty(&snippet).map_err(SetupError::from)?;
    println!();
    println!("Manual configuration:");
    println!("{rendered}");
    println!();
    println!("Environment:");
    println!("  {API_URL_ENV}         override the vault API base URL");
    println!("  {DEV_ENV}             use the local development API when true");
    println!("  COMPOSTER_SESSION_FILE  read the session from this file");
    println!("  COMPOSTER_LOG_LEVEL     error, warn, info, debug or trace");
    println!("  COMPOSTER_LOG_FILTER    full tracing filter directive");
    Ok(())
}
