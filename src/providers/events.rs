//! Seismic event feed provider.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::{ProviderConfig, build_http_client, check_status, request_id, transport_error};
use crate::models::{Feature, GeoBounds, SeismicEvent};
use crate::{Error, Result};

/// Years of history requested when no explicit window is given.
pub const DEFAULT_LOOKBACK_YEARS: i64 = 10;

/// Time span an event query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    /// Inclusive start of the window.
    pub start: DateTime<Utc>,
    /// Inclusive end of the window.
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window reaching `years` back from now.
    #[must_use]
    pub fn last_years(years: i64) -> Self {
        let end = Utc::now();
        // 365.25-day years; the feed is a coarse historical query, not a
        // calendar computation.
        let start = end - ChronoDuration::hours(years * 8766);
        Self { start, end }
    }
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self::last_years(DEFAULT_LOOKBACK_YEARS)
    }
}

/// Wire shape of the event feed response.
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for `GET /events/earthquakes`.
#[derive(Debug, Clone)]
pub struct EventDataProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl EventDataProvider {
    /// Creates a provider against `config.endpoint`.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            client: build_http_client(config),
        }
    }

    /// Fetches events inside `bounds` over `window` at or above
    /// `min_magnitude`.
    ///
    /// Features that fail to parse are skipped with a warning; one bad
    /// record never costs the whole feed.
    pub async fn fetch_earthquakes(
        &self,
        bounds: &GeoBounds,
        window: &QueryWindow,
        min_magnitude: f64,
    ) -> Result<Vec<SeismicEvent>> {
        let url = format!("{}/events/earthquakes", self.endpoint);
        info!(%url, min_magnitude, "fetching earthquake events");

        let response = self
            .client
            .get(&url)
            .header("x-request-id", request_id())
            .query(&[
                ("coordinates", bounds.coordinates_query()),
                ("starttime", window.start.to_rfc3339()),
                ("endtime", window.end.to_rfc3339()),
                ("minmagnitude", min_magnitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| transport_error("fetch_earthquakes", &e))?;
        let response = check_status(response, "fetch_earthquakes").await?;

        let body: EventsResponse = response.json().await.map_err(|e| Error::Decode {
            what: "event feed response".to_string(),
            cause: e.to_string(),
        })?;
        if let Some(error) = body.error {
            return Err(Error::Transport {
                operation: "fetch_earthquakes".to_string(),
                cause: format!("feed reported error: {error}"),
            });
        }

        let mut events = Vec::with_capacity(body.features.len());
        for feature in &body.features {
            match SeismicEvent::from_feature(feature) {
                Ok(event) => events.push(event),
                Err(error) => {
                    warn!(%error, "skipping unparseable event feature");
                }
            }
        }
        info!(count = events.len(), "event feed fetched");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_spans_requested_years() {
        let window = QueryWindow::last_years(10);
        let days = (window.end - window.start).num_days();
        // Ten years, give or take leap handling.
        assert!((3650..=3660).contains(&days), "got {days} days");
    }

    #[test]
    fn test_default_window_is_ten_years() {
        let window = QueryWindow::default();
        assert!((window.end - window.start).num_days() >= 3650);
    }

    #[test]
    fn test_events_response_tolerates_missing_features() {
        let body: EventsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.features.is_empty());
        assert!(body.error.is_none());
    }

    #[test]
    fn test_events_response_surfaces_feed_error() {
        let body: EventsResponse =
            serde_json::from_str(r#"{"error":"window too large"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("window too large"));
    }

    #[test]
    fn test_feed_features_parse_into_events() {
        let body: EventsResponse = serde_json::from_str(
            r#"{"features":[
                {"id":"us7000m9g4",
                 "geometry":{"type":"Point","coordinates":[85.2,28.1,10.0]},
                 "properties":{"mag":6.1,"time":1700000000000,"place":"Nepal"}},
                {"id":"broken",
                 "geometry":{"type":"Point","coordinates":[85.2,28.1]},
                 "properties":{}}
            ]}"#,
        )
        .unwrap();
        let events: Vec<SeismicEvent> = body
            .features
            .iter()
            .filter_map(|f| SeismicEvent::from_feature(f).ok())
            .collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_str(), "us7000m9g4");
    }
}
