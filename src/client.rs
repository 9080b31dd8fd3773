// 🌐 Booking Service Client
// Typed HTTP boundary with the remote booking store

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::record::{BookingRecord, BookingStatus};
use crate::sources::{SourceAdapter, UpdateMethod};

// ============================================================================
// CLIENT
// ============================================================================

/// Typed HTTP client for the remote booking service.
///
/// The bearer credential is injected at construction - business logic never
/// reads ambient storage. A missing credential sends no Authorization
/// header; the server is expected to reject such requests itself.
#[derive(Clone, Debug)]
pub struct BookingServiceClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl BookingServiceClient {
    /// Create a client bound to the service base URL
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let mut url = Url::parse(base_url).map_err(|err| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source: err,
        })?;

        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_string();
            path.push('/');
            url.set_path(&path);
        }

        Ok(BookingServiceClient {
            http: reqwest::Client::new(),
            base_url: url,
            token,
        })
    }

    /// Fetch and normalize the full collection behind one source adapter
    pub async fn fetch(
        &self,
        adapter: &dyn SourceAdapter,
    ) -> Result<Vec<BookingRecord>, ClientError> {
        let url = self.join(adapter.list_path())?;
        debug!(source = adapter.source_type().code(), %url, "fetching bookings");

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClientError::Http(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: response.status(),
            });
        }

        let envelope: ListEnvelope = response
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))?;

        if !envelope.success {
            return Err(ClientError::Rejected);
        }

        Ok(envelope
            .data
            .iter()
            .map(|raw| adapter.normalize(raw))
            .collect())
    }

    /// Send one status-change request through the owning adapter's endpoint
    pub async fn update_status(
        &self,
        adapter: &dyn SourceAdapter,
        id: &str,
        status: BookingStatus,
    ) -> Result<(), ClientError> {
        let update = adapter.status_request(id, status);
        let url = self.join(&update.path)?;
        debug!(
            source = adapter.source_type().code(),
            id,
            status = status.as_wire(),
            %url,
            "updating booking status"
        );

        let method = match update.method {
            UpdateMethod::Put => Method::PUT,
            UpdateMethod::Patch => Method::PATCH,
            UpdateMethod::Post => Method::POST,
        };

        let mut request = self.http.request(method, url).json(&update.body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClientError::Http(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: response.status(),
            });
        }

        let ack: AckEnvelope = response
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))?;

        if !ack.success {
            return Err(ClientError::Rejected);
        }

        Ok(())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source: err,
            })
    }
}

// ============================================================================
// WIRE ENVELOPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    success: bool,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid booking service url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("booking service request failed: {0}")]
    Http(String),
    #[error("booking service returned unexpected status {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },
    #[error("failed to decode booking service response: {0}")]
    Decode(String),
    #[error("booking service reported failure")]
    Rejected,
}

// ============================================================================
// TESTS
// ============================================================================
