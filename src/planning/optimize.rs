//! Route optimization stage: confirmed addresses → provider-optimized route.
//!
//! # Responsibilities
//! - Drop entries without coordinates (reported, never silently lost)
//! - Fix origin (first resolved) and destination (last resolved)
//! - Delegate waypoint ordering to the directions provider
//! - Expose the route as a flat path and as stops in visiting order

use serde::Serialize;

use crate::config::DirectionsConfig;
use crate::maps::{DirectionsRequest, LatLng, Leg, MapsClient, Route};
use crate::observability::metrics;
use crate::planning::types::{
    ConfirmedAddress, ExcludedAddress, PlanError, PlanResult, PlannedStop,
};

/// A confirmed entry with coordinates, tagged with its submitted position.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStop {
    pub index: usize,
    pub address: String,
    pub location: LatLng,
}

impl ResolvedStop {
    fn to_planned(&self) -> PlannedStop {
        PlannedStop {
            index: self.index,
            address: self.address.clone(),
            lat: self.location.lat,
            lng: self.location.lng,
        }
    }
}

/// Split confirmed entries into resolved stops and excluded entries,
/// both in submitted order.
pub fn partition_confirmed(
    confirmed: &[ConfirmedAddress],
) -> (Vec<ResolvedStop>, Vec<ExcludedAddress>) {
    let mut resolved = Vec::new();
    let mut excluded = Vec::new();

    for (index, entry) in confirmed.iter().enumerate() {
        match entry.location {
            Some(location) => resolved.push(ResolvedStop {
                index,
                address: entry.formatted_address.clone(),
                location,
            }),
            None => excluded.push(ExcludedAddress {
                index,
                address: entry.formatted_address.clone(),
            }),
        }
    }

    (resolved, excluded)
}

/// The stops of a trip: fixed endpoints and reorderable waypoints between them.
#[derive(Debug, Clone)]
pub struct TripStops {
    pub origin: ResolvedStop,
    pub waypoints: Vec<ResolvedStop>,
    pub destination: ResolvedStop,
}

impl TripStops {
    /// First resolved stop is the origin, last the destination.
    pub fn from_resolved(
        mut resolved: Vec<ResolvedStop>,
        max_waypoints: usize,
    ) -> PlanResult<Self> {
        if resolved.len() < 2 {
            return Err(PlanError::InsufficientWaypoints {
                resolved: resolved.len(),
            });
        }

        let waypoint_count = resolved.len() - 2;
        if waypoint_count > max_waypoints {
            return Err(PlanError::TooManyWaypoints {
                count: waypoint_count,
                max: max_waypoints,
            });
        }

        let destination = resolved.pop().ok_or(PlanError::InsufficientWaypoints { resolved: 0 })?;
        let origin = resolved.remove(0);

        Ok(Self {
            origin,
            waypoints: resolved,
            destination,
        })
    }

    fn request(&self) -> DirectionsRequest {
        DirectionsRequest {
            origin: self.origin.location,
            destination: self.destination.location,
            waypoints: self.waypoints.iter().map(|w| w.location).collect(),
            optimize: true,
        }
    }
}

/// The provider's chosen route over the confirmed stops.
#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    pub stops: TripStops,
    pub route: Route,
    pub excluded: Vec<ExcludedAddress>,
}

impl OptimizedRoute {
    /// Start point of every step of every leg, then the end point of the final
    /// step, so the path runs from origin to destination.
    pub fn path(&self) -> Vec<LatLng> {
        step_path(&self.route.legs)
    }

    /// Effective waypoint order (indices into the waypoints list).
    ///
    /// A provider order that is not a permutation of the waypoints is
    /// ignored and submitted order is used.
    pub fn waypoint_order(&self) -> Vec<usize> {
        let count = self.stops.waypoints.len();
        let order = &self.route.waypoint_order;

        let mut seen = vec![false; count];
        let is_permutation = order.len() == count
            && order.iter().all(|&i| i < count && !std::mem::replace(&mut seen[i], true));

        if is_permutation {
            order.clone()
        } else {
            if count > 0 {
                tracing::warn!(
                    ?order,
                    waypoints = count,
                    "Ignoring invalid waypoint order from provider"
                );
            }
            (0..count).collect()
        }
    }

    /// Resolved stops in visiting order: origin, reordered waypoints, destination.
    pub fn visiting_order(&self) -> Vec<PlannedStop> {
        let waypoints = &self.stops.waypoints;

        let mut stops = Vec::with_capacity(waypoints.len() + 2);
        stops.push(self.stops.origin.to_planned());
        stops.extend(self.waypoint_order().into_iter().map(|i| waypoints[i].to_planned()));
        stops.push(self.stops.destination.to_planned());
        stops
    }

    pub fn total_distance_meters(&self) -> u64 {
        self.route.legs.iter().filter_map(|l| l.distance.as_ref()).map(|d| d.value).sum()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.route.legs.iter().filter_map(|l| l.duration.as_ref()).map(|d| d.value).sum()
    }

    pub fn to_plan(&self) -> RoutePlan {
        RoutePlan {
            path: self.path(),
            stops: self.visiting_order(),
            waypoint_order: self.waypoint_order(),
            excluded: self.excluded.clone(),
            distance_meters: self.total_distance_meters(),
            duration_seconds: self.total_duration_seconds(),
        }
    }
}

/// Detailed optimization result.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub path: Vec<LatLng>,
    pub stops: Vec<PlannedStop>,
    pub waypoint_order: Vec<usize>,
    pub excluded: Vec<ExcludedAddress>,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

/// Flatten leg steps into their start points plus the final end point.
pub fn step_path(legs: &[Leg]) -> Vec<LatLng> {
    let mut path: Vec<LatLng> = legs
        .iter()
        .flat_map(|leg| leg.steps.iter().map(|step| step.start_location))
        .collect();

    if let Some(last) = legs.iter().rev().find_map(|leg| leg.steps.last()) {
        path.push(last.end_location);
    }
    path
}

/// Ask the provider for a waypoint-optimized route over the resolved entries.
///
/// Fails with `InsufficientWaypoints` before any provider call when fewer
/// than two entries carry coordinates.
pub async fn optimize_route(
    client: &MapsClient,
    confirmed: &[ConfirmedAddress],
    config: &DirectionsConfig,
) -> PlanResult<OptimizedRoute> {
    let (resolved, excluded) = partition_confirmed(confirmed);

    if !excluded.is_empty() {
        tracing::info!(
            excluded = excluded.len(),
            indices = ?excluded.iter().map(|e| e.index).collect::<Vec<_>>(),
            "Excluding unresolved addresses from optimization"
        );
        metrics::record_excluded(excluded.len());
    }

    let stops = TripStops::from_resolved(resolved, config.max_waypoints)?;

    tracing::debug!(
        waypoints = stops.waypoints.len(),
        mode = ?config.mode,
        "Requesting optimized route"
    );

    let route = client
        .directions(&stops.request())
        .await?
        .into_iter()
        .next()
        .ok_or(PlanError::NoRoute)?;

    tracing::info!(
        legs = route.legs.len(),
        waypoint_order = ?route.waypoint_order,
        "Route optimized"
    );

    Ok(OptimizedRoute {
        stops,
        route,
        excluded,
    })
}
