// Fleet REST client
//
// Wraps `reqwest::Client` with URL construction and envelope unwrapping
// for the four read endpoints. Callers only ever see unwrapped `data`
// payloads; the envelope and its inconsistencies stay in this module.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, ErrorBody, OneOrMany, StatisticsRecord, VehicleRecord};
use crate::transport::TransportConfig;

/// Maximum number of body bytes echoed back in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the fleet tracking service.
///
/// Handles the `{ success, data, timestamp }` envelope and normalizes
/// `data` into the shape each operation promises: collections always come
/// back as lists, single entities as exactly one value.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FleetClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the service root, e.g. `https://fleet.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url).validated()
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn validated(self) -> Result<Self, Error> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(self.base_url.to_string()));
        }
        Ok(self)
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`. Segments are percent-encoded.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/vehicles`
    pub async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, Error> {
        let url = self.api_url(&["vehicles"])?;
        let data = self.get::<VehicleRecord>(url, "vehicles").await?;
        Ok(data.map(OneOrMany::into_vec).unwrap_or_default())
    }

    /// `GET /api/vehicles/{id}`
    pub async fn fetch_vehicle_by_id(&self, id: &str) -> Result<VehicleRecord, Error> {
        let url = self.api_url(&["vehicles", id])?;
        self.get::<VehicleRecord>(url, "vehicle")
            .await?
            .and_then(OneOrMany::into_first)
            .ok_or(Error::NotFound {
                resource: "Vehicle",
            })
    }

    /// `GET /api/vehicles/status/{status}`
    pub async fn fetch_vehicles_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<VehicleRecord>, Error> {
        let url = self.api_url(&["vehicles", "status", status])?;
        let data = self
            .get::<VehicleRecord>(url, "vehicles by status")
            .await?;
        Ok(data.map(OneOrMany::into_vec).unwrap_or_default())
    }

    /// `GET /api/statistics`
    pub async fn fetch_statistics(&self) -> Result<StatisticsRecord, Error> {
        let url = self.api_url(&["statistics"])?;
        self.get::<StatisticsRecord>(url, "statistics")
            .await?
            .and_then(OneOrMany::into_first)
            .ok_or(Error::NotFound {
                resource: "Statistics",
            })
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    ///
    /// `what` names the resource in the message used when the server
    /// reports `success: false` without one of its own.
    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<Option<OneOrMany<T>>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::from_request)?;

        parse_envelope(resp, what).await
    }
}

/// Parse the `{ success, data }` envelope, returning `data` on success.
///
/// Non-2xx statuses surface the server's `message`, then its `error`,
/// else `"Error: {status}"`.
async fn parse_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
) -> Result<Option<OneOrMany<T>>, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        debug!(status = status.as_u16(), body = preview(&body), "fleet API error");
        return Err(Error::Api {
            status: status.as_u16(),
            message: parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| format!("Error: {}", status.as_u16())),
        });
    }

    let body = resp.text().await.map_err(Error::from_request)?;

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })?;

    if !envelope.success {
        return Err(Error::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .or(envelope.error)
                .unwrap_or_else(|| format!("Failed to fetch {what}")),
        });
    }

    Ok(envelope.data)
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
