//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the planner.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the route planner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlannerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Maps provider endpoints and credential.
    pub maps: MapsConfig,

    /// Geocoding stage settings.
    pub geocoding: GeocodingConfig,

    /// Route optimization settings.
    pub directions: DirectionsConfig,

    /// Upload intake settings.
    pub uploads: UploadConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for provider calls.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind (overridden by `PORT`).
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Maps provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Provider credential (overridden by `GOOGLE_MAPS_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Geocoding endpoint.
    pub geocode_url: String,

    /// Directions endpoint.
    pub directions_url: String,

    /// Preferred result language (e.g. "en").
    pub language: Option<String>,

    /// Region bias as a ccTLD code (e.g. "us").
    pub region: Option<String>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            directions_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            language: None,
            region: None,
        }
    }
}

impl std::fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("geocode_url", &self.geocode_url)
            .field("directions_url", &self.directions_url)
            .field("language", &self.language)
            .field("region", &self.region)
            .finish()
    }
}

/// Geocoding stage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Maximum in-flight provider calls per request (1 = sequential).
    pub concurrency: usize,

    /// Abort the whole batch on the first provider failure.
    pub fail_fast: bool,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fail_fast: true,
        }
    }
}

/// Travel mode passed to the directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

/// Route optimization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// Travel mode.
    pub mode: TravelMode,

    /// Maximum intermediate waypoints accepted by the provider.
    pub max_waypoints: usize,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            mode: TravelMode::Driving,
            max_waypoints: 25,
        }
    }
}

/// Upload intake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for per-request spool files.
    pub dir: PathBuf,

    /// Maximum request body size in bytes.
    pub max_bytes: usize,

    /// Drop lines that are empty after trimming.
    pub skip_blank_lines: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("route-planner"),
            max_bytes: 1024 * 1024, // 1MB
            skip_blank_lines: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request deadline in seconds (covers every provider call of the request).
    pub request_secs: u64,

    /// Deadline for a single provider call in seconds.
    pub provider_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            provider_secs: 10,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries of transient provider failures.
    pub enabled: bool,

    /// Maximum number of attempts per provider call, first one included.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
