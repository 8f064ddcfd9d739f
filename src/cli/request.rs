//! CLI command for requesting an analysis product.

use std::io::{self, Write};

use crate::config::QuakelensConfig;
use crate::models::{AnalysisKind, EventId};
use crate::services::AnalysisDesk;
use crate::Error;

/// Builds the desk, applying the per-invocation user override.
fn desk_for(config: &QuakelensConfig, user: Option<&str>) -> AnalysisDesk {
    match user {
        Some(user) => AnalysisDesk::new(&config.clone().with_user_id(user)),
        None => AnalysisDesk::new(config),
    }
}

/// Executes the request command.
///
/// `user` overrides the configured requesting identity for this
/// invocation only.
///
/// # Errors
///
/// Returns an error when the analysis kind is unknown, the submission
/// fails, or output fails.
pub async fn cmd_request(
    config: &QuakelensConfig,
    event_id: &str,
    analysis: &str,
    user: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = AnalysisKind::parse(analysis).ok_or_else(|| {
        Error::Validation(format!(
            "unknown analysis kind: {analysis} (expected intf or cd)"
        ))
    })?;

    let desk = desk_for(config, user);
    let (request, status) = desk.request(EventId::new(event_id), kind).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Analysis requested: {}", kind.label())?;
    writeln!(handle, "  Event:    {}", request.event_id)?;
    writeln!(handle, "  Filename: {}", request.filename)?;
    writeln!(handle, "  Status:   {status}")?;
    Ok(())
}
