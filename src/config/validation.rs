//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check provider endpoints are usable URLs
//! - Refuse to start without a provider credential
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlannerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::PlannerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &PlannerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.maps.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "maps.api_key",
            "must be set (GOOGLE_MAPS_API_KEY)",
        ));
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }

    for (field, value) in [
        ("maps.geocode_url", &config.maps.geocode_url),
        ("maps.directions_url", &config.maps.directions_url),
    ] {
        if let Err(message) = check_http_url(value) {
            errors.push(ValidationError::new(field, message));
        }
    }

    if config.geocoding.concurrency == 0 {
        errors.push(ValidationError::new("geocoding.concurrency", "must be at least 1"));
    }

    if config.directions.max_waypoints == 0 {
        errors.push(ValidationError::new("directions.max_waypoints", "must be at least 1"));
    }

    if config.uploads.max_bytes == 0 {
        errors.push(ValidationError::new("uploads.max_bytes", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.timeouts.provider_secs == 0 {
        errors.push(ValidationError::new("timeouts.provider_secs", "must be greater than 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("'{}' is not a valid url: {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
