//! # rollcall-app
//!
//! Rollcall binary entry point.
//! Loads config, wires adapters into the session components and runs the
//! selected subcommand.

mod camera;
mod commands;
mod display;
mod lifecycle;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollcall_core::config::{AppConfig, CameraSourceKind};
use rollcall_core::config_manager::ConfigManager;
use rollcall_core::ports::api_client::RecognitionApi;
use rollcall_network::http_client::HttpRecognitionClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Webcam attendance client for a face-recognition backend
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend URL (default from config: http://localhost:5000)
    #[arg(long, short = 's', global = true)]
    server: Option<String>,

    /// Config file path (default: platform config dir)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// Use an image file as the camera instead of a webcam
    #[arg(long, global = true)]
    image: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize faces every poll interval until Ctrl+C
    Attend,
    /// Capture and register samples for one person
    Enroll {
        /// Name to register the samples under
        #[arg(long, short = 'n')]
        name: String,
    },
    /// Retrain the backend model
    Train,
    /// Show attendance logs
    Logs {
        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(long, short = 'd')]
        date: Option<String>,
    },
    /// Show dataset and model statistics
    Stats,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => Some(
            ConfigManager::with_path(path.clone())
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!("config file unavailable, using defaults: {e}");
                None
            }
        },
    };

    let mut config = match manager {
        Some(manager) => {
            info!("config file: {}", manager.config_path().display());
            manager.into_config()
        }
        None => AppConfig::default_config(),
    };

    apply_overrides(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// CLI flags win over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(image) = &args.image {
        config.camera.source = CameraSourceKind::StillImage;
        config.camera.still_image_path = Some(image.clone());
    }
}

fn build_client(config: &AppConfig) -> Result<HttpRecognitionClient> {
    let client = HttpRecognitionClient::new(&config.server.base_url, config.request_timeout())?
        .with_max_retries(config.server.admin_max_retries);
    Ok(client)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let client = build_client(&config)?;
    info!("backend: {}", client.base_url());

    match &args.command {
        Command::Attend => {
            let api: Arc<dyn RecognitionApi> = Arc::new(client);
            commands::attend(&config, api).await
        }
        Command::Enroll { name } => {
            let api: Arc<dyn RecognitionApi> = Arc::new(client);
            commands::enroll(&config, api, name).await
        }
        Command::Train => commands::train(&client).await,
        Command::Logs { date } => commands::logs(&client, date.as_deref()).await,
        Command::Stats => commands::stats(&client).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = [
        "rollcall",
        "rollcall_core",
        "rollcall_vision",
        "rollcall_network",
        "rollcall_session",
    ]
    .iter()
    .map(|target| format!("{target}={}", args.log_level))
    .collect::<Vec<_>>()
    .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
