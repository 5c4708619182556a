// ── Core error types ──
//
// User-facing errors from fleetwatch-core. Consumers never see raw HTTP
// or JSON failures: the `From<fleetwatch_api::Error>` impl folds them into
// the four failure classes the dashboard distinguishes, and each variant's
// `Display` is the exact message written into the store's error field.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fleet service errors ─────────────────────────────────────────
    /// The service answered and reported a failure; its message is shown as-is.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Network error. Please check your connection.")]
    Unreachable,

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("An unexpected error occurred: {message}")]
    Unexpected { message: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Fleet controller is not running")]
    NotConnected,

    #[error("Fleet controller was already started")]
    AlreadyConnected,

    #[error("State store has shut down")]
    StoreClosed,

    // ── Validation errors ────────────────────────────────────────────
    #[error("Invalid status filter '{value}': expected all, idle, en_route or delivered")]
    InvalidFilter { value: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures where the service never answered.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }

    /// Returns `true` if the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { status: Some(404), .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fleetwatch_api::Error> for CoreError {
    fn from(err: fleetwatch_api::Error) -> Self {
        use fleetwatch_api::Error as Api;

        match err {
            Api::Unreachable { .. } => CoreError::Unreachable,
            Api::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            Api::NotFound { resource } => CoreError::NotFound {
                resource: resource.into(),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            Api::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("URL cannot be used as a service base: {url}"),
            },
            Api::Transport(ref e) if e.is_timeout() || e.is_connect() => CoreError::Unreachable,
            Api::Transport(e) => CoreError::Unexpected {
                message: e.to_string(),
            },
            Api::WebSocketConnect(message) => CoreError::Unexpected { message },
            Api::Deserialization { message, .. } => CoreError::Unexpected { message },
        }
    }
}
