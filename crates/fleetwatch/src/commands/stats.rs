//! Fleet statistics command handler.

use fleetwatch_core::format::{format_date_time, format_speed};
use fleetwatch_core::{Controller, FleetConfig, Statistics};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::service_error;

pub(crate) fn detail(s: &Statistics) -> String {
    let mut lines = vec![
        format!("Total Vehicles: {}", s.total),
        format!("Moving:         {}", s.moving()),
        format!("Idle:           {}", s.idle),
        format!("Delivered:      {}", s.delivered),
        format!("Average Speed:  {}", format_speed(s.average_speed)),
    ];
    if let Some(ts) = s.timestamp {
        lines.push(format!("As Of:          {}", format_date_time(&ts)));
    }
    lines.join("\n")
}

pub async fn handle(fleet: FleetConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = Controller::oneshot(fleet.clone(), |source| async move {
        source.statistics().await
    })
    .await
    .map_err(|e| service_error(&fleet, e))?;

    let out = output::render_single(global.output, &stats, detail, |s| s.total.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_counts_in_mph() {
        let stats = Statistics {
            total: 10,
            idle: 3,
            en_route: 4,
            delivered: 3,
            average_speed: 100.0,
            timestamp: None,
        };
        let text = detail(&stats);
        assert!(text.starts_with("Total Vehicles: 10"));
        assert!(text.contains("Moving:         4"));
        assert!(text.contains("Average Speed:  62 mph"));
        assert!(!text.contains("As Of"));
    }
}
