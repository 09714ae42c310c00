//! Planning workflow subsystem.
//!
//! # Data Flow
//! ```text
//! Raw addresses
//!     → geocode.rs (one provider lookup per address, order preserved)
//!     → [client reviews / corrects: state held by the client]
//! Confirmed addresses
//!     → optimize.rs (filter resolved, fix endpoints, provider reorders waypoints)
//!     → OptimizedRoute (path, visiting order, excluded entries)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a request; the client resubmits the list
//! - Unresolved addresses are data, not errors
//! - Fewer than two resolved stops fails before calling the provider

pub mod geocode;
pub mod optimize;
pub mod types;

pub use geocode::geocode_addresses;
pub use optimize::{optimize_route, OptimizedRoute, RoutePlan};
pub use types::{
    ConfirmedAddress, ExcludedAddress, GeocodedAddress, PlanError, PlanResult, PlannedStop,
};
