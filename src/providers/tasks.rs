//! Requested-analysis worklist provider.

use tracing::info;

use super::{ProviderConfig, build_http_client, check_status, request_id, transport_error};
use crate::models::Task;
use crate::{Error, Result};

/// Client for `GET /geospatial/tasks`.
#[derive(Debug, Clone)]
pub struct TaskListProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl TaskListProvider {
    /// Creates a provider against `config.endpoint`.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            client: build_http_client(config),
        }
    }

    /// Fetches the current worklist of requested analyses.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let url = format!("{}/geospatial/tasks", self.endpoint);

        let response = self
            .client
            .get(&url)
            .header("x-request-id", request_id())
            .send()
            .await
            .map_err(|e| transport_error("fetch_tasks", &e))?;
        let response = check_status(response, "fetch_tasks").await?;

        let tasks: Vec<Task> = response.json().await.map_err(|e| Error::Decode {
            what: "task list response".to_string(),
            cause: e.to_string(),
        })?;
        info!(count = tasks.len(), "task list fetched");
        Ok(tasks)
    }
}
