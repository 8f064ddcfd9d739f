//! Analysis request submission and the task worklist.

use tracing::{debug, info};

use crate::config::QuakelensConfig;
use crate::models::{AnalysisKind, AnalysisRequest, EventId, Layer, Task, TaskStatus};
use crate::providers::{AnalysisRequestProvider, ProviderConfig, TaskListProvider};
use crate::state::{AuthState, LayerRegistry};
use crate::storage::DurableStore;
use crate::{Error, Result};

/// Front desk for analysis products: submit requests, list the worklist,
/// and promote finished products into the layer working set.
#[derive(Debug)]
pub struct AnalysisDesk {
    requests: AnalysisRequestProvider,
    tasks: TaskListProvider,
    auth: AuthState,
}

impl AnalysisDesk {
    /// Creates a desk from the configuration.
    ///
    /// The session starts signed out; requests still carry the configured
    /// user identity.
    #[must_use]
    pub fn new(config: &QuakelensConfig) -> Self {
        Self::with_auth(config, AuthState::new(config.user_id.as_str()))
    }

    /// Creates a desk submitting under an existing session.
    #[must_use]
    pub fn with_auth(config: &QuakelensConfig, auth: AuthState) -> Self {
        let provider_config = ProviderConfig::new(&config.endpoint);
        Self {
            requests: AnalysisRequestProvider::new(&provider_config),
            tasks: TaskListProvider::new(&provider_config),
            auth,
        }
    }

    /// The session state requests are attributed to.
    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Submits an analysis request for `event_id`.
    ///
    /// The filename is derived from the naming convention, so the product
    /// can later be matched back to its event. Returns the request as sent
    /// together with the status the service acknowledged with.
    pub async fn request(
        &self,
        event_id: EventId,
        kind: AnalysisKind,
    ) -> Result<(AnalysisRequest, TaskStatus)> {
        let request = self.build_request(event_id, kind);
        let status = self.requests.submit(&request).await?;
        info!(filename = %request.filename, %status, "analysis request submitted");
        Ok((request, status))
    }

    fn build_request(&self, event_id: EventId, kind: AnalysisKind) -> AnalysisRequest {
        AnalysisRequest::new(self.auth.user_id(), event_id, kind)
    }

    /// Fetches the current requested-analysis worklist.
    pub async fn worklist(&self) -> Result<Vec<Task>> {
        self.tasks.fetch_tasks().await
    }

    /// Promotes a finished task into the layer working set.
    ///
    /// The new entry starts without image bytes; the layer sync fetches
    /// them on demand. Returns whether an entry was added (a filename
    /// already in the working set is a no-op).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the task is not completed yet.
    pub fn add_to_working_set<S: DurableStore>(
        &self,
        registry: &mut LayerRegistry<S>,
        task: &Task,
    ) -> Result<bool> {
        if !task.status.is_ready() {
            return Err(Error::Validation(format!(
                "analysis {} is not ready (status: {})",
                task.filename, task.status
            )));
        }
        debug!(filename = %task.filename, "adding analysis product to working set");
        registry.add(Layer::new(task.event_id.clone(), &task.filename))
    }
}
