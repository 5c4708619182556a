//! Shared configuration for the fleetwatch CLI and TUI.
//!
//! TOML profiles layered under `FLEETWATCH_*` environment variables, and
//! translation to `fleetwatch_core::FleetConfig`. Both binaries depend on
//! this crate; the CLI adds flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleetwatch_core::FleetConfig;
use fleetwatch_core::config::{
    DEFAULT_API_URL, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_WS_URL,
};

/// Prefix for environment overrides. `__` separates nested keys, e.g.
/// `FLEETWATCH_DEFAULTS__TIMEOUT=5`.
pub const ENV_PREFIX: &str = "FLEETWATCH_";

/// Name of the profile used when none is configured or requested.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between vehicle-list refreshes in live views; `0` disables.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// A named fleet service profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// REST base URL (e.g., "https://fleet.example.com").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Push channel URL (e.g., "wss://fleet.example.com").
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Open the push channel in live views (default: true).
    pub push: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ws_url: default_ws_url(),
            timeout: None,
            push: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_ws_url() -> String {
    DEFAULT_WS_URL.into()
}

impl Config {
    /// Pick a profile: the requested one, else `default_profile`, else the
    /// hosted service. A requested or configured name that is not defined
    /// is an error, except for the built-in `default`.
    pub fn resolve_profile(&self, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = requested
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        match self.profiles.get(name) {
            Some(profile) => Ok((name.to_owned(), profile.clone())),
            None if name == DEFAULT_PROFILE => Ok((name.to_owned(), Profile::default())),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fleetwatch", "fleetwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fleetwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is the
/// same as an empty one.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `FleetConfig` from a profile, falling back to `defaults` for
/// anything the profile leaves unset.
pub fn profile_to_fleet_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<FleetConfig, ConfigError> {
    let api_url = parse_url("api_url", &profile.api_url, &["http", "https"])?;
    let ws_url = parse_url("ws_url", &profile.ws_url, &["ws", "wss"])?;

    let mut config = FleetConfig::new(api_url, ws_url);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.push_enabled = profile.push.unwrap_or(true);
    config.refresh_interval_secs = defaults.refresh_interval;
    Ok(config)
}

fn parse_url(field: &str, raw: &str, schemes: &[&str]) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected a {} URL, got '{raw}'", schemes.join(" or ")),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("absent.toml");
            let config = load_config_from(&path).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_profiles_and_env_overrides_layer() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "staging"

                [defaults]
                output = "json"

                [profiles.staging]
                api_url = "https://staging.fleet.example.com"
                ws_url = "wss://staging.fleet.example.com"
                push = false
                "#,
            )?;
            jail.set_env("FLEETWATCH_DEFAULTS__TIMEOUT", "3");

            let config = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(config.defaults.output, "json");
            assert_eq!(config.defaults.timeout, 3);
            assert_eq!(config.defaults.color, "auto");

            let (name, profile) = config.resolve_profile(None).unwrap();
            assert_eq!(name, "staging");
            assert_eq!(profile.push, Some(false));
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_profile(Some("prod")),
            Err(ConfigError::UnknownProfile { .. })
        ));

        let (name, profile) = config.resolve_profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn profile_translation_applies_defaults() {
        let defaults = Defaults {
            timeout: 7,
            refresh_interval: 0,
            ..Defaults::default()
        };
        let fleet = profile_to_fleet_config(&Profile::default(), &defaults).unwrap();

        assert_eq!(fleet.timeout, Duration::from_secs(7));
        assert_eq!(fleet.refresh_interval_secs, 0);
        assert!(fleet.push_enabled);
        assert_eq!(fleet.ws_url.scheme(), "wss");
    }

    #[test]
    fn profile_translation_rejects_wrong_scheme() {
        let profile = Profile {
            ws_url: "https://fleet.example.com".into(),
            ..Profile::default()
        };
        let err = profile_to_fleet_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "ws_url"));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "local".into(),
            Profile {
                api_url: "http://localhost:5000".into(),
                ws_url: "ws://localhost:5000".into(),
                timeout: Some(2),
                push: None,
            },
        );
        save_config_to(&config, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[profiles.local]"));

        let loaded: Config = toml::from_str(&written).unwrap();
        assert_eq!(loaded, config);
    }
}
