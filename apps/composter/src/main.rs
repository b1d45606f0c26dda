use clap::Parser;
use composter_bridge::telemetry::logging;
use composter_bridge::terminal::error::CliError;
use composter_bridge::terminal::{app, cli::Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_config = cli.logging.to_config(cli.default_log_level());
    let result = match logging::init(&log_config) {
        Ok(()) => app::run(cli).await,
        Err(err) => Err(CliError::Logging(err.to_string())),
    };

    if let Err(err) = result {
        tracing::error!(target: "composter", error = %err, "fatal error");
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
