//! Planning workflow types and error definitions.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::maps::{LatLng, MapsError};

/// An address after geocoding: the provider's formatted form plus its
/// location, or the raw input with no location when it was not found.
///
/// Wire form is `[address, lat-or-null, lng-or-null]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub formatted_address: String,
    pub location: Option<LatLng>,
}

/// An address as sent back by the client after review.
///
/// Client edits are trusted; no re-validation happens.
pub type ConfirmedAddress = GeocodedAddress;

impl GeocodedAddress {
    pub fn resolved(formatted_address: impl Into<String>, location: LatLng) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            location: Some(location),
        }
    }

    pub fn unresolved(address: impl Into<String>) -> Self {
        Self {
            formatted_address: address.into(),
            location: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.location.is_some()
    }
}

impl Serialize for GeocodedAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (lat, lng) = match self.location {
            Some(location) => (Some(location.lat), Some(location.lng)),
            None => (None, None),
        };
        (&self.formatted_address, lat, lng).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeocodedAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (formatted_address, lat, lng) =
            <(String, Option<f64>, Option<f64>)>::deserialize(deserializer)?;
        // A half-specified coordinate counts as unresolved.
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        };
        Ok(Self {
            formatted_address,
            location,
        })
    }
}

/// A confirmed entry dropped from optimization for lack of coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedAddress {
    /// Position in the submitted list.
    pub index: usize,
    pub address: String,
}

/// A resolved entry, placed in visiting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStop {
    /// Position in the submitted list.
    pub index: usize,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Errors that can occur in the planning stages.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Provider call failed.
    #[error(transparent)]
    Maps(#[from] MapsError),

    /// Fewer than two entries carry coordinates.
    #[error("insufficient waypoints: {resolved} resolved address(es), at least 2 required")]
    InsufficientWaypoints { resolved: usize },

    /// More intermediate stops than the provider accepts.
    #[error("too many waypoints: {count} intermediate stops, at most {max} allowed")]
    TooManyWaypoints { count: usize, max: usize },

    /// Provider found no route between the stops.
    #[error("no route found between the confirmed addresses")]
    NoRoute,
}

/// Result type for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;
