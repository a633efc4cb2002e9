use anyhow::{Context, Result};
use clap::Parser;
use offer_matrix::app_log;
use offer_matrix::cli::{self, Cli};
use offer_matrix::core::{ApiError, ConfigManager};
use std::fs::OpenOptions;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    // Terminal output belongs to the commands; logs go to the file only
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.environment.log_file)
        .with_context(|| {
            format!(
                "Failed to open log file {}",
                config.environment.log_file.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("offer_matrix=info")),
        )
        .init();

    app_log!(info, "Environment: {}", config.environment_name);
    app_log!(info, "State file: {}", config.environment.state_path.display());

    match cli::run(cli, config).await {
        Ok(code) => Ok(code),
        Err(e) => {
            app_log!(error, "Command failed: {:#}", e);
            match e.downcast_ref::<ApiError>() {
                Some(api_error) if api_error.is_unauthorized() => {
                    eprintln!("❌ {}", api_error.user_message());
                    eprintln!("   Log in with: offermatrix auth login <username> --password ...");
                }
                Some(api_error) => eprintln!("❌ {}", api_error.user_message()),
                None => eprintln!("❌ {:#}", e),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
