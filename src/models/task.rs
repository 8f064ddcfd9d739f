//! Analysis requests and the requested-analysis worklist.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::EventId;

/// Event category attached to seismic analysis products.
pub const EVENT_KIND_EARTHQUAKE: &str = "earthquake";

/// Analysis product filenames follow `{event_id}-{event_kind}-{code}`.
// Allow expect() on the static pattern - it is guaranteed to compile
#[allow(clippy::expect_used)]
static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<event>.+)-(?P<kind>[a-z]+)-(?P<code>[a-z]+)$")
        .expect("static regex: analysis filename")
});

/// The analysis products the processing service can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Radar interferogram of ground displacement.
    #[default]
    #[serde(rename = "intf", alias = "interferogram")]
    Interferogram,
    /// Before/after surface change detection.
    #[serde(rename = "cd", alias = "change-detection")]
    ChangeDetection,
}

impl AnalysisKind {
    /// Returns all analysis kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Interferogram, Self::ChangeDetection]
    }

    /// Short code used in filenames and request bodies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Interferogram => "intf",
            Self::ChangeDetection => "cd",
        }
    }

    /// Processing-service path that accepts requests for this kind.
    #[must_use]
    pub const fn api_path(&self) -> &'static str {
        match self {
            Self::Interferogram => "/geospatial/interferogram",
            Self::ChangeDetection => "/geospatial/change-detection",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Interferogram => "Interferogram",
            Self::ChangeDetection => "Change Detection",
        }
    }

    /// Parses a kind from its code or label.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "intf" | "interferogram" => Some(Self::Interferogram),
            "cd" | "change-detection" | "change_detection" => Some(Self::ChangeDetection),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Derives the canonical analysis filename for an event.
#[must_use]
pub fn build_filename(event_id: &EventId, kind: AnalysisKind) -> String {
    format!("{event_id}-{EVENT_KIND_EARTHQUAKE}-{}", kind.code())
}

/// Components recovered from an analysis filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParts {
    /// The event the product belongs to.
    pub event_id: EventId,
    /// Event category segment.
    pub event_kind: String,
    /// The analysis kind, when the code is recognized.
    pub analysis: Option<AnalysisKind>,
}

/// Splits an analysis filename back into its parts.
///
/// Event ids may themselves contain hyphens, so the match is anchored on the
/// trailing two segments.
#[must_use]
pub fn parse_filename(filename: &str) -> Option<FilenameParts> {
    let captures = FILENAME_PATTERN.captures(filename)?;
    Some(FilenameParts {
        event_id: EventId::new(&captures["event"]),
        event_kind: captures["kind"].to_string(),
        analysis: AnalysisKind::parse(&captures["code"]),
    })
}

/// A request for a new analysis product.
///
/// Created on user action and sent to the processing service; never mutated
/// afterwards. Field names follow the service's wire schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Requesting user.
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Target event.
    #[serde(rename = "eventid")]
    pub event_id: EventId,
    /// Filename the product will be published under.
    pub filename: String,
    /// Event category.
    #[serde(rename = "eventtype")]
    pub event_kind: String,
    /// Requested analysis kind.
    pub analysis: AnalysisKind,
}

impl AnalysisRequest {
    /// Builds a request for an event, deriving the filename from the
    /// naming convention.
    #[must_use]
    pub fn new(user_id: impl Into<String>, event_id: EventId, kind: AnalysisKind) -> Self {
        let filename = build_filename(&event_id, kind);
        Self {
            user_id: user_id.into(),
            event_id,
            filename,
            event_kind: EVENT_KIND_EARTHQUAKE.to_string(),
            analysis: kind,
        }
    }
}

/// Lifecycle of a requested analysis, as reported by the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted but not started.
    #[default]
    Pending,
    /// Currently being generated.
    Processing,
    /// Product is ready to add as a layer.
    #[serde(alias = "complete")]
    Completed,
    /// Generation failed.
    #[serde(alias = "error")]
    Failed,
}

impl TaskStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the product can be added to the layer working set.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the requested-analysis worklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Event the analysis was requested for.
    #[serde(rename = "eventid")]
    pub event_id: EventId,
    /// Human-readable event location.
    #[serde(default)]
    pub location: String,
    /// Epicenter latitude.
    #[serde(default)]
    pub latitude: f64,
    /// Epicenter longitude.
    #[serde(default)]
    pub longitude: f64,
    /// Filename the product is (or will be) published under.
    pub filename: String,
    /// Event category.
    #[serde(rename = "eventtype", default)]
    pub event_kind: String,
    /// Analysis kind code.
    #[serde(default)]
    pub analysis: String,
    /// When the request was made, as reported by the service.
    #[serde(default)]
    pub date: String,
    /// Current lifecycle state.
    #[serde(default)]
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filename_convention() {
        let id = EventId::new("us7000m9g4");
        assert_eq!(
            build_filename(&id, AnalysisKind::Interferogram),
            "us7000m9g4-earthquake-intf"
        );
        assert_eq!(
            build_filename(&id, AnalysisKind::ChangeDetection),
            "us7000m9g4-earthquake-cd"
        );
    }

    #[test]
    fn test_parse_filename_round_trips() {
        let parts = parse_filename("us7000m9g4-earthquake-intf").unwrap();
        assert_eq!(parts.event_id.as_str(), "us7000m9g4");
        assert_eq!(parts.event_kind, "earthquake");
        assert_eq!(parts.analysis, Some(AnalysisKind::Interferogram));
    }

    #[test]
    fn test_parse_filename_keeps_hyphenated_event_ids() {
        let parts = parse_filename("gfz-2024-abcd-earthquake-cd").unwrap();
        assert_eq!(parts.event_id.as_str(), "gfz-2024-abcd");
        assert_eq!(parts.analysis, Some(AnalysisKind::ChangeDetection));
    }

    #[test]
    fn test_parse_filename_rejects_unstructured_names() {
        assert!(parse_filename("noseparators").is_none());
        assert!(parse_filename("").is_none());
    }

    #[test]
    fn test_analysis_request_wire_names() {
        let request = AnalysisRequest::new(
            "demo",
            EventId::new("us7000m9g4"),
            AnalysisKind::Interferogram,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["userid"], "demo");
        assert_eq!(json["eventid"], "us7000m9g4");
        assert_eq!(json["filename"], "us7000m9g4-earthquake-intf");
        assert_eq!(json["eventtype"], "earthquake");
        assert_eq!(json["analysis"], "intf");
    }

    #[test]
    fn test_task_status_accepts_service_spellings() {
        let complete: TaskStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(complete, TaskStatus::Completed);
        let processing: TaskStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(processing, TaskStatus::Processing);
        assert!(complete.is_ready());
        assert!(!processing.is_ready());
    }

    #[test]
    fn test_task_row_deserializes_wire_record() {
        let json = r#"{
            "eventid": "us7000m9g4",
            "location": "32 km SSE of Jurm, Afghanistan",
            "latitude": 36.5,
            "longitude": 70.8,
            "filename": "us7000m9g4-earthquake-intf",
            "eventtype": "earthquake",
            "analysis": "intf",
            "date": "2026-03-01",
            "status": "processing"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.event_id.as_str(), "us7000m9g4");
        assert_eq!(task.status, TaskStatus::Processing);
    }

    #[test]
    fn test_analysis_kind_paths() {
        assert_eq!(
            AnalysisKind::Interferogram.api_path(),
            "/geospatial/interferogram"
        );
        assert_eq!(
            AnalysisKind::ChangeDetection.api_path(),
            "/geospatial/change-detection"
        );
        assert_eq!(AnalysisKind::parse("CD"), Some(AnalysisKind::ChangeDetection));
        assert_eq!(AnalysisKind::parse("unknown"), None);
    }
}
