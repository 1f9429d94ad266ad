//! Incident fetch contract and implementations.
//!
//! The [`IncidentClient`] trait returns the raw upstream JSON; normalization
//! into canonical records happens in the feed, at the boundary.
//!
//! - [`HttpIncidentClient`] - Direct `reqwest` fetch of the events endpoint
//! - [`StaticIncidentClient`] - Fixed payload (files, tests)

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde_json::Value;

use super::error::FetchError;

/// Trait for fetching raw incident data.
pub trait IncidentClient: Send + Sync {
    /// Fetch the current incident payload.
    fn fetch_events(&self) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// HTTP client for the events endpoint.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a timeout.
pub struct HttpIncidentClient {
    http: reqwest::Client,
    events_url: String,
}

impl HttpIncidentClient {
    /// Create a client for `events_url`.
    pub fn new(events_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            http,
            events_url: events_url.into(),
        })
    }

    pub fn events_url(&self) -> &str {
        &self.events_url
    }
}

impl IncidentClient for HttpIncidentClient {
    async fn fetch_events(&self) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(&self.events_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let payload: Value =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Json(e.to_string()))?;

        tracing::debug!(
            url = %self.events_url,
            bytes = bytes.len(),
            "Incident feed fetched"
        );

        Ok(payload)
    }
}

/// Client returning a fixed payload.
#[derive(Debug)]
pub struct StaticIncidentClient {
    payload: Result<Value, FetchError>,
    fetches: AtomicUsize,
}

impl StaticIncidentClient {
    /// Client that always returns `payload`.
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Ok(payload),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Client that always fails with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self {
            payload: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Client reading the payload from a JSON file once, up front.
    pub fn from_file(path: &std::path::Path) -> Result<Self, FetchError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FetchError::Read(format!("{}: {}", path.display(), e)))?;
        let payload =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Json(e.to_string()))?;
        Ok(Self::new(payload))
    }

    /// Number of fetches served.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl IncidentClient for StaticIncidentClient {
    async fn fetch_events(&self) -> Result<Value, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.payload.clone()
    }
}
