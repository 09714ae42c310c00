//! Address geocoding and route optimization backend.
//!
//! Two-stage workflow over a maps provider: upload addresses and review the
//! geocoded results, then submit the confirmed list for a waypoint-optimized
//! route.

pub mod addresses;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod maps;
pub mod observability;
pub mod planning;
pub mod resilience;

pub use config::PlannerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
