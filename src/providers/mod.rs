//! HTTP providers for the geospatial backend.
//!
//! Each external collaborator from the service contract gets its own thin
//! typed client: event feed, analysis submission, task worklist, and layer
//! payload download. All requests carry an `x-request-id` correlation
//! header; non-success statuses surface as [`Error::Transport`] with the
//! response body logged for diagnostics.

mod analysis;
mod events;
mod layers;
mod tasks;

pub use analysis::AnalysisRequestProvider;
pub use events::{EventDataProvider, QueryWindow};
pub use layers::{LayerDataProvider, LayerPayload};
pub use tasks::TaskListProvider;

use std::time::Duration;
use tracing::error;
use uuid::Uuid;

use crate::{Error, Result};

/// Connection settings shared by all providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the geospatial backend.
    pub endpoint: String,
    /// Total request timeout in milliseconds; 0 disables.
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds; 0 disables.
    pub connect_timeout_ms: u64,
}

impl ProviderConfig {
    /// Creates a config for `endpoint` with default timeouts.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

/// Builds an HTTP client with the configured timeouts.
#[must_use]
pub fn build_http_client(config: &ProviderConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build provider HTTP client: {err}");
        reqwest::Client::new()
    })
}

/// Fresh correlation id for one request.
pub(crate) fn request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Maps a reqwest send failure into a transport error with its kind.
pub(crate) fn transport_error(operation: &str, e: &reqwest::Error) -> Error {
    let error_kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };
    error!(
        operation = operation,
        error = %e,
        error_kind = error_kind,
        "provider request failed"
    );
    Error::Transport {
        operation: operation.to_string(),
        cause: format!("{error_kind} error: {e}"),
    }
}

/// Rejects non-success statuses, logging the response body.
pub(crate) async fn check_status(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(
        operation = operation,
        status = %status,
        body = %body,
        "provider returned error status"
    );
    Err(Error::Transport {
        operation: operation.to_string(),
        cause: format!("API returned status: {status} - {body}"),
    })
}
