//! Analysis request submission.

use serde::Deserialize;
use tracing::info;

use super::{ProviderConfig, build_http_client, check_status, request_id, transport_error};
use crate::models::{AnalysisRequest, TaskStatus};
use crate::{Error, Result};

/// Wire shape of the submission response.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    status: TaskStatus,
}

/// Client for the analysis processing endpoints.
///
/// The target path depends on the requested kind
/// (`/geospatial/interferogram`, `/geospatial/change-detection`).
#[derive(Debug, Clone)]
pub struct AnalysisRequestProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl AnalysisRequestProvider {
    /// Creates a provider against `config.endpoint`.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            client: build_http_client(config),
        }
    }

    /// Submits `request` and returns the status the service reports.
    ///
    /// The request body is the wire form of [`AnalysisRequest`]; the
    /// service acknowledges with the initial task status (usually
    /// `pending`).
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<TaskStatus> {
        let url = format!("{}{}", self.endpoint, request.analysis.api_path());
        info!(
            %url,
            event_id = %request.event_id,
            filename = %request.filename,
            "submitting analysis request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-request-id", request_id())
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error("submit_analysis", &e))?;
        let response = check_status(response, "submit_analysis").await?;

        let body: SubmitResponse = response.json().await.map_err(|e| Error::Decode {
            what: "analysis submission response".to_string(),
            cause: e.to_string(),
        })?;
        info!(status = %body.status, "analysis request accepted");
        Ok(body.status)
    }
}
