//! Command handlers: bridge CLI args -> core fetches -> output formatting.

pub mod config_cmd;
pub mod stats;
pub mod vehicles;
pub mod watch;

use fleetwatch_core::FleetConfig;

use crate::error::CliError;

/// Convert a core error, naming the service URL on connection failures.
pub(crate) fn service_error(fleet: &FleetConfig, err: fleetwatch_core::CoreError) -> CliError {
    CliError::from(err).with_url(fleet.api_url.as_str())
}
