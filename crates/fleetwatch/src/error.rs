//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fleetwatch_config::ConfigError;
use fleetwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Network error. Please check your connection.")]
    #[diagnostic(
        code(fleetwatch::unreachable),
        help(
            "The fleet service at {url} did not answer.\n\
             Check the URL, or raise the limit with --timeout."
        )
    )]
    Unreachable { url: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} not found{detail}")]
    #[diagnostic(
        code(fleetwatch::not_found),
        help("Run: fleetwatch {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        /// `" (id 'v9')"` or empty.
        detail: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(fleetwatch::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fleetwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fleetwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fleetwatch config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(fleetwatch::config))]
    Config(ConfigError),

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(fleetwatch::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(fleetwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(fleetwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// A not-found error, naming the identifier when there is one.
    pub fn not_found(resource_type: &str, identifier: Option<&str>) -> Self {
        let list_command = if resource_type.eq_ignore_ascii_case("vehicle") {
            "vehicles list"
        } else {
            "stats"
        };
        CliError::NotFound {
            resource_type: resource_type.into(),
            detail: identifier.map(|id| format!(" (id '{id}')")).unwrap_or_default(),
            list_command: list_command.into(),
        }
    }

    /// Name the service URL on connection failures.
    #[must_use]
    pub fn with_url(self, url: &str) -> Self {
        match self {
            Self::Unreachable { .. } => Self::Unreachable { url: url.into() },
            other => other,
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => {
                let available = fleetwatch_config::load_config_or_default()
                    .profiles
                    .into_keys()
                    .collect::<Vec<_>>();
                CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unreachable => CliError::Unreachable {
                url: "(unknown)".into(),
            },

            CoreError::NotFound { resource } => CliError::not_found(&resource, None),

            CoreError::Api { message, status } => CliError::Api { message, status },

            CoreError::InvalidFilter { value } => CliError::Validation {
                field: "status".into(),
                reason: format!("unknown status '{value}'"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other @ (CoreError::Unexpected { .. }
            | CoreError::NotConnected
            | CoreError::AlreadyConnected
            | CoreError::StoreClosed) => CliError::Internal(other.to_string()),
        }
    }
}
