//! Provider wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Provider query form (`lat,lng`).
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Which provider API a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Geocode,
    Directions,
}

impl Api {
    pub fn as_str(&self) -> &'static str {
        match self {
            Api::Geocode => "geocode",
            Api::Directions => "directions",
        }
    }
}

impl std::fmt::Display for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur talking to the maps provider.
#[derive(Debug, Error)]
pub enum MapsError {
    /// Connection, TLS or body decoding failure.
    #[error("{api} request failed: {source}")]
    Transport {
        api: Api,
        #[source]
        source: reqwest::Error,
    },

    /// The call did not finish within the provider deadline.
    #[error("{api} request timed out after {secs} seconds")]
    Timeout { api: Api, secs: u64 },

    /// Non-2xx HTTP response.
    #[error("{api} returned HTTP {status}")]
    Http { api: Api, status: u16 },

    /// 2xx response whose payload status is not OK / ZERO_RESULTS.
    #[error("{api} returned status {status}{}", message_suffix(.message))]
    Status {
        api: Api,
        status: String,
        message: Option<String>,
    },

    /// Endpoint configuration could not be turned into a request URL.
    #[error("invalid provider url '{0}'")]
    InvalidUrl(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Result type for provider operations.
pub type MapsResult<T> = Result<T, MapsError>;

/// Payload status shared by every provider API.
pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
pub const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// Geocoding API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One geocoding candidate, highest confidence first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// Directions API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A computed route candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<Leg>,
    /// Provider-chosen visiting order of the request's waypoints.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

/// Route segment between two consecutive stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TextValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TextValue>,
}

/// Provider quantity: human text plus value in meters or seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

/// Parameters of a directions request.
#[derive(Debug, Clone)]
pub struct DirectionsRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    pub waypoints: Vec<LatLng>,
    pub optimize: bool,
}

impl DirectionsRequest {
    /// Provider `waypoints` parameter, `None` when there are no waypoints.
    pub fn waypoints_param(&self) -> Option<String> {
        if self.waypoints.is_empty() {
            return None;
        }
        let mut parts = Vec::with_capacity(self.waypoints.len() + 1);
        if self.optimize {
            parts.push("optimize:true".to_string());
        }
        parts.extend(self.waypoints.iter().map(LatLng::to_query));
        Some(parts.join("|"))
    }
}
