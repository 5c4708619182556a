//! `fleetwatch watch`: run the live controller and print what changes.
//!
//! Every applied store mutation that carries data becomes one output
//! event: a line of text in table/plain mode, one JSON object per line in
//! the JSON modes, one YAML document each in YAML mode.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use fleetwatch_core::format::{format_clock, format_speed};
use fleetwatch_core::{Controller, FilterStatus, FleetConfig, Mutation, Statistics, Vehicle};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::service_error;
use super::vehicles::filter_from_arg;

// ── Output events ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WatchEvent {
    Connection { connected: bool },
    Filter { filter: FilterStatus },
    Vehicles { count: usize, vehicles: Vec<Vehicle> },
    Vehicle { vehicle: Vehicle },
    Statistics { statistics: Statistics },
    Error { message: String },
}

impl WatchEvent {
    /// Only mutations that change what a viewer would see are reported.
    fn from_mutation(mutation: &Mutation) -> Option<Self> {
        match mutation {
            Mutation::SetConnected(connected) => Some(Self::Connection {
                connected: *connected,
            }),
            Mutation::SetActiveFilter(filter) => Some(Self::Filter { filter: *filter }),
            Mutation::SetVehicles(vehicles) => Some(Self::Vehicles {
                count: vehicles.len(),
                vehicles: vehicles.clone(),
            }),
            Mutation::UpsertVehicle(vehicle) => Some(Self::Vehicle {
                vehicle: vehicle.clone(),
            }),
            Mutation::SetStatistics(statistics) => Some(Self::Statistics {
                statistics: statistics.clone(),
            }),
            Mutation::SetError(Some(message)) => Some(Self::Error {
                message: message.clone(),
            }),
            Mutation::SetError(None)
            | Mutation::SetLoading(_)
            | Mutation::SetLastUpdate(_)
            | Mutation::SetSelectedVehicle(_) => None,
        }
    }

    fn line(&self, color: bool) -> String {
        match self {
            Self::Connection { connected: true } => "live updates connected".into(),
            Self::Connection { connected: false } => "live updates disconnected".into(),
            Self::Filter { filter } => format!("filter: {}", filter.label()),
            Self::Vehicles { count, .. } => format!("vehicles: {count} loaded"),
            Self::Vehicle { vehicle } => format!(
                "vehicle {} ({}): {}, {}, to {}",
                vehicle.vehicle_number,
                vehicle.id,
                output::paint_status(vehicle.status, color),
                format_speed(vehicle.speed),
                vehicle.destination,
            ),
            Self::Statistics { statistics } => format!(
                "statistics: {} total, {} moving, {} idle, {} delivered, avg {}",
                statistics.total,
                statistics.moving(),
                statistics.idle,
                statistics.delivered,
                format_speed(statistics.average_speed),
            ),
            Self::Error { message } => format!("error: {message}"),
        }
    }

    fn render(&self, format: OutputFormat, color: bool) -> Result<String, CliError> {
        match format {
            OutputFormat::Table | OutputFormat::Plain => {
                Ok(format!("[{}] {}", format_clock(&Utc::now()), self.line(color)))
            }
            OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(self, true),
            OutputFormat::Yaml => Ok(format!("---\n{}", serde_yaml::to_string(self)?.trim_end())),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    mut fleet: FleetConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.no_push {
        fleet.push_enabled = false;
    }
    let color = output::should_color(global.color);
    let controller = Controller::new(fleet.clone()).map_err(|e| service_error(&fleet, e))?;

    let mut log = controller.mutation_log();
    controller.connect().await?;

    let filter = filter_from_arg(args.filter);
    if filter != FilterStatus::All {
        controller.set_filter(filter).await?;
    }

    let deadline = async {
        match args.duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            () = &mut deadline => break Ok(()),
            received = log.recv() => match received {
                Ok(mutation) => {
                    let Some(event) = WatchEvent::from_mutation(&mutation) else {
                        continue;
                    };
                    match event.render(global.output, color) {
                        Ok(text) => output::print_output(&text, global.quiet),
                        Err(e) => break Err(e),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "watch output fell behind; some updates were dropped");
                }
                Err(RecvError::Closed) => break Ok(()),
            },
        }
    };

    controller.disconnect().await;
    result
}
