//! Flag overrides on top of the shared profile configuration.
//!
//! `fleetwatch-config` owns the file format; this module layers
//! `--api-url`, `--ws-url` and `--timeout` over the selected profile and
//! hands the result to core.

use fleetwatch_config::{Profile, load_config_or_default, profile_to_fleet_config};
use fleetwatch_core::FleetConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the `FleetConfig` for this invocation (flag > env > profile > defaults).
pub fn resolve_fleet_config(global: &GlobalOpts) -> Result<FleetConfig, CliError> {
    let cfg = load_config_or_default();
    let (name, profile) = cfg.resolve_profile(global.profile.as_deref())?;
    tracing::debug!(profile = %name, "resolved profile");

    let profile = apply_overrides(profile, global);
    Ok(profile_to_fleet_config(&profile, &cfg.defaults)?)
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref url) = global.ws_url {
        profile.ws_url.clone_from(url);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}
