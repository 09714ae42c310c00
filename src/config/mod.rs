//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT, GOOGLE_MAPS_API_KEY)
//!     → validation.rs (semantic checks)
//!     → PlannerConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - The provider credential only ever comes from config or environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DirectionsConfig, GeocodingConfig, ListenerConfig, LogFormat, MapsConfig,
    ObservabilityConfig, PlannerConfig, RetryConfig, TimeoutConfig, TravelMode, UploadConfig,
};
