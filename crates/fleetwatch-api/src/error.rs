use thiserror::Error;

/// Top-level error type for the `fleetwatch-api` crate.
///
/// Covers every failure mode of the REST client and the push channel.
/// `fleetwatch-core` maps these into the messages shown on the dashboard.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response arrived: connect failure, DNS failure or timeout.
    #[error("Fleet service unreachable: {message}")]
    Unreachable { message: String },

    /// HTTP transport error that is neither a timeout nor a connect failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry API paths (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    // ── Fleet API ───────────────────────────────────────────────────
    /// The server answered with an error status or `success: false`.
    #[error("Fleet API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The envelope was valid but carried no entity.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket handshake or read failure.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a reqwest failure: no response at all means unreachable.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Unreachable {
                message: err.to_string(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if no response was received.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
