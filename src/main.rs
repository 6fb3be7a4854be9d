//! Inventoryweb main entry point

use anyhow::Context;
use clap::Parser;
use inventoryweb_api::{start_server, AppState};
use inventoryweb_config::error::ConfigErrorSeverity;
use inventoryweb_config::{Config, ConfigError};
use inventoryweb_core::{Dashboard, HttpInventorySource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "inventoryweb")]
#[command(version)]
#[command(about = "A lightweight web dashboard for cross-account cloud inventory", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, load_error) = match Config::load(&args.config) {
        Ok(config) => (config, None),
        Err(e) if e.severity() == ConfigErrorSeverity::Warning => (Config::default(), Some(e)),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("failed to load {}", args.config.display()));
        }
    };

    init_logging(&config);
    report_config(&args.config, &config, load_error.as_ref());

    let source = HttpInventorySource::from_config(&config).context("failed to create inventory client")?;
    let dashboard = Arc::new(Dashboard::new(Arc::new(source)));

    let rt = Runtime::new()?;
    rt.block_on(async {
        tokio::spawn(log_transitions(dashboard.subscribe()));

        let state = AppState { dashboard, config };
        start_server(state, shutdown_signal()).await
    })
    .context("server error")?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_logging(config: &Config) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
}

fn report_config(path: &Path, config: &Config, load_error: Option<&ConfigError>) {
    match load_error {
        Some(e) => log::warn!("{}, using defaults", e),
        None => log::info!("Config loaded from {}", path.display()),
    }
    if config.is_placeholder_endpoint() {
        log::warn!(
            "endpoint.url is still the placeholder {}, every request will fail until it is set",
            config.endpoint.url
        );
    }
}

async fn log_transitions(mut rx: tokio::sync::watch::Receiver<inventoryweb_core::DashboardState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state.is_loading {
            log::debug!("Dashboard loading (activation {})", state.activation);
        } else if let Some(message) = &state.error_message {
            log::debug!("Dashboard showing error: {}", message);
        } else if let Some(result) = &state.result {
            log::debug!("Dashboard showing {} account(s)", result.len());
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
