//! `fleetwatch-tui`: real-time terminal dashboard for the fleet service.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive state from
//! `fleetwatch-core`'s [`Controller`]. Logs go to a file in the temp
//! directory unless `--log-file` says otherwise.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fleetwatch_core::{Controller, FleetConfig};

use crate::app::App;

const DEFAULT_LOG_NAME: &str = "fleetwatch-tui.log";

/// Terminal dashboard for live fleet tracking.
#[derive(Parser, Debug)]
#[command(name = "fleetwatch-tui", version, about)]
struct Cli {
    /// Service profile from the shared config file
    #[arg(short = 'p', long, env = "FLEETWATCH_PROFILE")]
    profile: Option<String>,

    /// REST base URL (overrides profile)
    #[arg(long, env = "FLEETWATCH_API_URL")]
    api_url: Option<String>,

    /// Push channel URL (overrides profile)
    #[arg(long, env = "FLEETWATCH_WS_URL")]
    ws_url: Option<String>,

    /// Do not open the push channel
    #[arg(long)]
    no_push: bool,

    /// Log file path [default: <temp dir>/fleetwatch-tui.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File logging only: the terminal belongs to the dashboard. Keep the
/// guard alive for the whole run or buffered lines are lost.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbose))
        .copied()
        .unwrap_or("trace");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fleetwatch_tui={level},fleetwatch_core={level},fleetwatch_api={level}"
        ))
    });

    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(std::env::temp_dir, Path::to_path_buf);
    let name = log_file
        .file_name()
        .unwrap_or(OsStr::new(DEFAULT_LOG_NAME));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    guard
}

/// Resolve the fleet config: flags > env > profile > hosted defaults.
fn build_config(cli: &Cli) -> Result<FleetConfig> {
    let cfg = fleetwatch_config::load_config()?;
    let (name, mut profile) = cfg.resolve_profile(cli.profile.as_deref())?;

    if let Some(ref url) = cli.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref url) = cli.ws_url {
        profile.ws_url.clone_from(url);
    }
    if cli.no_push {
        profile.push = Some(false);
    }

    let config = fleetwatch_config::profile_to_fleet_config(&profile, &cfg.defaults)?;
    info!(profile = %name, api = %config.api_url, push = config.push_enabled, "resolved config");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_NAME));
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    let config = build_config(&cli)?;
    let controller = Controller::new(config)?;

    info!("starting fleetwatch-tui");
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
