//! Configuration management.
//!
//! A [`QuakelensConfig`] is assembled from defaults, an optional TOML
//! config file, and environment overrides, in that order. The built-in
//! region catalog can be extended (or overridden per name) from the file.

use serde::Deserialize;
use std::path::PathBuf;

use crate::models::{EventId, GeoBounds, GeoPoint};
use crate::observability::{LogFormat, LoggingConfig};
use crate::{Error, Result};

/// Environment variable overriding the backend endpoint.
pub const ENDPOINT_ENV: &str = "QUAKELENS_ENDPOINT";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "QUAKELENS_CONFIG_PATH";

/// A monitored region: a name, a map center, and a query bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Catalog name, also the event cache key suffix.
    pub name: String,
    /// Reference point for the proximity filter.
    pub center: GeoPoint,
    /// Bounding box sent to the event provider.
    pub bounds: GeoBounds,
}

impl Region {
    /// Creates a region.
    #[must_use]
    pub fn new(name: impl Into<String>, center: GeoPoint, bounds: GeoBounds) -> Self {
        Self {
            name: name.into(),
            center,
            bounds,
        }
    }
}

/// The built-in region catalog.
#[must_use]
pub fn builtin_regions() -> Vec<Region> {
    vec![
        Region::new(
            "nepal",
            GeoPoint::new(85.2, 28.1),
            GeoBounds::new(26.3, 30.4, 80.0, 88.2),
        ),
        Region::new(
            "turkey",
            GeoPoint::new(38.0, 37.0),
            GeoBounds::new(35.0, 43.0, 25.0, 45.0),
        ),
        Region::new(
            "iraq",
            GeoPoint::new(43.5, 33.0),
            GeoBounds::new(29.0, 38.0, 38.0, 49.0),
        ),
        Region::new(
            "mexico",
            GeoPoint::new(-98.2, 19.0),
            GeoBounds::new(14.5, 32.7, -118.4, -86.7),
        ),
        Region::new(
            "usa",
            GeoPoint::new(-119.0, 37.0),
            GeoBounds::new(32.5, 42.0, -124.5, -114.0),
        ),
    ]
}

/// Main configuration for quakelens.
#[derive(Debug, Clone)]
pub struct QuakelensConfig {
    /// Base URL of the geospatial backend.
    pub endpoint: String,
    /// Directory holding the durable store.
    pub data_dir: PathBuf,
    /// Proximity filter radius in kilometers.
    pub radius_km: f64,
    /// Minimum magnitude requested from the event feed.
    pub min_magnitude: f64,
    /// Years of history the event query covers.
    pub lookback_years: i64,
    /// Event cache validity window in hours.
    pub cache_ttl_hours: u64,
    /// Event ids pinned instead of the proximity filter, when non-empty.
    pub pinned_events: Vec<EventId>,
    /// User identity attached to analysis requests.
    pub user_id: String,
    /// Name of the region selected by default.
    pub default_region: String,
    /// Region catalog: built-ins plus config-file additions.
    pub regions: Vec<Region>,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for QuakelensConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            data_dir: default_data_dir(),
            radius_km: 900.0,
            min_magnitude: 5.0,
            lookback_years: 10,
            cache_ttl_hours: 24,
            pinned_events: Vec::new(),
            user_id: "quakelens".to_string(),
            default_region: "nepal".to_string(),
            regions: builtin_regions(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".quakelens"),
        |dirs| dirs.data_local_dir().join("quakelens"),
    )
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Backend endpoint.
    pub endpoint: Option<String>,
    /// Data directory.
    pub data_dir: Option<String>,
    /// Proximity radius in kilometers.
    pub radius_km: Option<f64>,
    /// Minimum magnitude.
    pub min_magnitude: Option<f64>,
    /// Lookback window in years.
    pub lookback_years: Option<i64>,
    /// Cache validity in hours.
    pub cache_ttl_hours: Option<u64>,
    /// Pinned event ids.
    pub pinned_events: Option<Vec<String>>,
    /// Requesting user id.
    pub user_id: Option<String>,
    /// Default region name.
    pub default_region: Option<String>,
    /// Additional regions.
    #[serde(default)]
    pub regions: Vec<ConfigFileRegion>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Region entry in the config file.
#[derive(Debug, Deserialize)]
pub struct ConfigFileRegion {
    /// Region name.
    pub name: String,
    /// Center as `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Bounds as `[min_lat, max_lat, min_lon, max_lon]`.
    pub bounds: [f64; 4],
}

/// Logging section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Filter directive, e.g. `info` or `quakelens=debug`.
    pub level: Option<String>,
    /// Output format: `text` or `json`.
    pub format: Option<String>,
}

impl QuakelensConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            operation: "read_config_file".to_string(),
            cause: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::Config {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/quakelens/` on macOS)
    /// 2. XDG config dir (`~/.config/quakelens/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found. Environment
    /// overrides are applied last either way.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default().with_env_overrides();
        };

        let platform_config = base_dirs
            .config_dir()
            .join("quakelens")
            .join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config.with_env_overrides();
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("quakelens")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config.with_env_overrides();
            }
        }

        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
        self
    }

    /// Converts a [`ConfigFile`] to a config.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = file.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(radius_km) = file.radius_km {
            config.radius_km = radius_km;
        }
        if let Some(min_magnitude) = file.min_magnitude {
            config.min_magnitude = min_magnitude;
        }
        if let Some(lookback_years) = file.lookback_years {
            config.lookback_years = lookback_years;
        }
        if let Some(cache_ttl_hours) = file.cache_ttl_hours {
            config.cache_ttl_hours = cache_ttl_hours;
        }
        if let Some(pinned) = file.pinned_events {
            config.pinned_events = pinned.into_iter().map(EventId::new).collect();
        }
        if let Some(user_id) = file.user_id {
            config.user_id = user_id;
        }
        if let Some(default_region) = file.default_region {
            config.default_region = default_region;
        }
        for entry in file.regions {
            let region = Region::new(
                entry.name,
                GeoPoint::new(entry.center[0], entry.center[1]),
                GeoBounds::new(
                    entry.bounds[0],
                    entry.bounds[1],
                    entry.bounds[2],
                    entry.bounds[3],
                ),
            );
            // A file entry with a catalog name replaces the built-in.
            config.regions.retain(|r| r.name != region.name);
            config.regions.push(region);
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
        }

        config
    }

    /// Looks up a region by name, case-insensitively.
    #[must_use]
    pub fn find_region(&self, name: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|region| region.name.eq_ignore_ascii_case(name))
    }

    /// The region selected by default.
    #[must_use]
    pub fn default_region(&self) -> Option<&Region> {
        self.find_region(&self.default_region)
    }

    /// Sets the backend endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the proximity radius.
    #[must_use]
    pub const fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Sets the magnitude floor.
    #[must_use]
    pub const fn with_min_magnitude(mut self, min_magnitude: f64) -> Self {
        self.min_magnitude = min_magnitude;
        self
    }

    /// Sets the user identity attached to analysis requests.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_constants() {
        let config = QuakelensConfig::default();
        assert!((config.radius_km - 900.0).abs() < f64::EPSILON);
        assert!((config.min_magnitude - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.lookback_years, 10);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.default_region, "nepal");
        assert_eq!(config.regions.len(), 5);
    }

    #[test]
    fn test_builtin_catalog_lookup() {
        let config = QuakelensConfig::default();
        let nepal = config.find_region("Nepal").unwrap();
        assert_eq!(nepal.center, GeoPoint::new(85.2, 28.1));
        assert_eq!(nepal.bounds.coordinates_query(), "26.3,30.4,80,88.2");
        assert!(config.find_region("atlantis").is_none());
    }

    #[test]
    fn test_builders_override_feed_and_identity_settings() {
        let config = QuakelensConfig::default()
            .with_radius_km(250.0)
            .with_min_magnitude(4.5)
            .with_user_id("analyst7");
        assert!((config.radius_km - 250.0).abs() < f64::EPSILON);
        assert!((config.min_magnitude - 4.5).abs() < f64::EPSILON);
        assert_eq!(config.user_id, "analyst7");
    }

    #[test]
    fn test_config_file_overrides_and_extends() {
        let file: ConfigFile = toml::from_str(
            r#"
            endpoint = "https://geo.example"
            radius_km = 500.0
            pinned_events = ["us7000m9g4"]

            [[regions]]
            name = "chile"
            center = [-70.6, -33.4]
            bounds = [-56.0, -17.5, -75.6, -66.4]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        let config = QuakelensConfig::from_config_file(file);

        assert_eq!(config.endpoint, "https://geo.example");
        assert!((config.radius_km - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.pinned_events, vec![EventId::new("us7000m9g4")]);
        assert_eq!(config.regions.len(), 6);
        assert!(config.find_region("chile").is_some());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_file_region_replaces_builtin() {
        let file: ConfigFile = toml::from_str(
            r#"
            [[regions]]
            name = "nepal"
            center = [84.0, 28.0]
            bounds = [26.0, 31.0, 79.0, 89.0]
            "#,
        )
        .unwrap();
        let config = QuakelensConfig::from_config_file(file);
        assert_eq!(config.regions.len(), 5);
        assert_eq!(
            config.find_region("nepal").unwrap().center,
            GeoPoint::new(84.0, 28.0)
        );
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let err =
            QuakelensConfig::load_from_file(std::path::Path::new("/nonexistent/config.toml"))
                .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
