//! Vehicle command handlers.

use tabled::Tabled;

use fleetwatch_core::format::{format_date_time, format_level, format_location, format_speed};
use fleetwatch_core::{Controller, FilterStatus, FleetConfig, Vehicle, VehicleStatus};

use crate::cli::{GlobalOpts, StatusArg, VehiclesArgs, VehiclesCommand};
use crate::error::CliError;
use crate::output;

use super::service_error;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Fuel")]
    fuel: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id.clone(),
            number: v.vehicle_number.clone(),
            driver: v.driver_name.clone(),
            status: v.status.label().into(),
            speed: format_speed(v.speed),
            destination: v.destination.clone(),
            battery: format_level(v.battery_level),
            fuel: format_level(v.fuel_level),
            updated: format_date_time(&v.last_updated),
        }
    }
}

pub(crate) fn detail(v: &Vehicle, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", v.id),
        format!("Number:      {}", v.vehicle_number),
        format!("Driver:      {}", v.driver_name),
        format!("Phone:       {}", v.driver_phone.as_deref().unwrap_or("-")),
        format!("Status:      {}", output::paint_status(v.status, color)),
        format!("Speed:       {}", format_speed(v.speed)),
        format!("Destination: {}", v.destination),
        format!("Location:    {}", format_location(v.current_location)),
        format!("Battery:     {}", output::paint_level(v.battery_level, color)),
        format!("Fuel:        {}", output::paint_level(v.fuel_level, color)),
        format!("Updated:     {}", format_date_time(&v.last_updated)),
    ];
    if let Some(eta) = v.estimated_arrival {
        lines.push(format!("ETA:         {}", format_date_time(&eta)));
    }
    lines.join("\n")
}

pub(crate) fn filter_from_arg(arg: StatusArg) -> FilterStatus {
    match arg {
        StatusArg::All => FilterStatus::All,
        StatusArg::Idle => VehicleStatus::Idle.into(),
        StatusArg::EnRoute => VehicleStatus::EnRoute.into(),
        StatusArg::Delivered => VehicleStatus::Delivered.into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    fleet: FleetConfig,
    args: VehiclesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        VehiclesCommand::List { status } => {
            let filter = filter_from_arg(status);
            let vehicles = Controller::oneshot(fleet.clone(), |source| async move {
                match filter {
                    FilterStatus::All => source.vehicles().await,
                    FilterStatus::Status(status) => source.vehicles_by_status(status).await,
                }
            })
            .await
            .map_err(|e| service_error(&fleet, e))?;

            tracing::debug!(count = vehicles.len(), %filter, "fetched vehicles");
            let out = output::render_list(
                global.output,
                &vehicles,
                |v| VehicleRow::from(v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehiclesCommand::Get { id } => {
            let lookup = id.clone();
            let vehicle = Controller::oneshot(fleet.clone(), |source| async move {
                source.vehicle(&lookup).await
            })
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CliError::not_found("Vehicle", Some(&id))
                } else {
                    service_error(&fleet, e)
                }
            })?;

            let out = output::render_single(
                global.output,
                &vehicle,
                |v| detail(v, color),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
