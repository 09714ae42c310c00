//! Maps provider integration subsystem.
//!
//! # Data Flow
//! ```text
//! Planning stages
//!     → client.rs (build query, deadline, retries)
//!     → provider Geocoding / Directions API (JSON over HTTPS)
//!     → types.rs (typed payloads, status → MapsError)
//! ```
//!
//! # Security Constraints
//! - The API key comes only from configuration or environment
//! - The API key is never logged (custom Debug impls)

pub mod client;
pub mod types;

pub use client::MapsClient;
pub use types::{
    Api, DirectionsRequest, GeocodeResult, LatLng, Leg, MapsError, MapsResult, Route, Step,
};
