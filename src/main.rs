mod config;
mod job;
mod model;
mod parser;
mod scheduler;
mod scraper;
mod storage;
mod utils;

use config::{load_config, AppConfig, PROXY_ENV_VAR};
use scheduler::DailySchedule;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // The only place the environment is read
    let config: AppConfig = match load_config(&config_path, std::env::var(PROXY_ENV_VAR).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(schedule) = DailySchedule::from_config(&config.schedule) else {
        error!("❌ Invalid schedule in {}", config_path);
        return ExitCode::FAILURE;
    };

    if config.tracked_urls.is_empty() {
        warn!("No tracked URLs configured, runs will only fetch a token.");
    }

    info!("🚀 Price tracker started, {} products tracked.", config.tracked_urls.len());
    info!("Output: {}. Press Ctrl+C to stop.", config.output_path.display());

    let service = async {
        run_and_report(&config).await;
        scheduler::run_daily(&schedule, || run_and_report(&config)).await;
    };

    tokio::select! {
        _ = service => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl+C: {}", e);
                return ExitCode::FAILURE;
            }
            info!("🛑 Shutdown requested, exiting.");
        }
    }

    ExitCode::SUCCESS
}

/// One scheduled tick. Failures are logged; the next tick starts clean.
async fn run_and_report(config: &AppConfig) {
    if let Err(e) = job::run_tracking_job(config).await {
        error!("❌ Run aborted: {}", e);
    }
}
