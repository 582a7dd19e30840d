mod logging;
mod settings;

use anyhow::Context;
use clap::Parser;
use review_watch_core::{poller::unix_now, Credentials, Poller, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "review-watch",
    about = "Poll the homework review queue and report status changes to Telegram",
    version
)]
struct Cli {
    /// Practicum API OAuth token
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    practicum_token: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Chat that receives status messages
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// YAML settings file
    #[arg(long, env = "REVIEW_WATCH_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Homework statuses endpoint
    #[arg(long, env = "REVIEW_WATCH_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Base URL of the Telegram Bot API
    #[arg(long, env = "REVIEW_WATCH_TELEGRAM_API_URL", value_name = "URL")]
    telegram_api_url: Option<String>,

    /// Seconds to wait between polls (default 600)
    #[arg(long, value_name = "SECS")]
    retry_period: Option<u64>,

    /// HTTP request timeout in seconds (default 30)
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// Also write logs to this file
    #[arg(long, env = "REVIEW_WATCH_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Unix timestamp to start watching from (default: now)
    #[arg(long, value_name = "UNIX_TS")]
    from_date: Option<i64>,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = settings::resolve(
        cli.config.as_deref(),
        settings::Overrides {
            endpoint: cli.endpoint.clone(),
            telegram_api_url: cli.telegram_api_url.clone(),
            retry_period_secs: cli.retry_period,
            request_timeout_secs: cli.request_timeout,
            log_file: cli.log_file.clone(),
        },
    );

    let log_file = match &settings {
        Ok(s) => s.log_file.as_ref().map(PathBuf::from),
        Err(_) => cli.log_file.clone(),
    };
    if let Err(e) = logging::init(log_file.as_deref()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    let result = settings
        .context("failed to load settings")
        .and_then(|settings| run(cli, settings));

    if let Err(e) = result {
        tracing::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let credentials =
        Credentials::from_values(cli.practicum_token, cli.telegram_token, cli.telegram_chat_id)?;
    let from_date = cli.from_date.unwrap_or_else(unix_now);

    let mut poller = Poller::connect(&credentials, &settings, from_date)
        .context("failed to set up HTTP clients")?;
    poller.run().context("review watch stopped")?;

    tracing::info!("nothing left to watch, exiting");
    Ok(())
}
