//! Maps provider HTTP client with timeout, status handling and retries.
//!
//! # Responsibilities
//! - Build geocoding and directions requests (credential, locale, mode)
//! - Enforce the per-call deadline
//! - Map HTTP and payload statuses to `MapsError`
//! - Retry transient failures according to the retry policy

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::{MapsConfig, RetryConfig, TimeoutConfig, TravelMode};
use crate::maps::types::*;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Payload fields every provider response carries.
trait ProviderStatus {
    fn status(&self) -> &str;
    fn error_message(&self) -> Option<&str>;
}

impl ProviderStatus for GeocodeResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl ProviderStatus for DirectionsResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Client for the geocoding and directions APIs.
#[derive(Clone)]
pub struct MapsClient {
    inner: reqwest::Client,
    geocode_url: Url,
    directions_url: Url,
    api_key: String,
    language: Option<String>,
    region: Option<String>,
    mode: TravelMode,
    retry: RetryPolicy,
    timeout_secs: u64,
}

impl MapsClient {
    /// Create a new client.
    ///
    /// No request is made; an unreachable provider surfaces on first use.
    pub fn new(
        config: &MapsConfig,
        mode: TravelMode,
        timeouts: &TimeoutConfig,
        retries: &RetryConfig,
    ) -> MapsResult<Self> {
        let geocode_url = parse_url(&config.geocode_url)?;
        let directions_url = parse_url(&config.directions_url)?;

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.provider_secs))
            .user_agent(concat!("route-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| MapsError::Transport {
                api: Api::Geocode,
                source,
            })?;

        Ok(Self {
            inner,
            geocode_url,
            directions_url,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
            mode,
            retry: RetryPolicy::from_config(retries),
            timeout_secs: timeouts.provider_secs,
        })
    }

    /// Look up candidates for a free-text address, highest confidence first.
    ///
    /// `ZERO_RESULTS` yields an empty list.
    pub async fn geocode(&self, address: &str) -> MapsResult<Vec<GeocodeResult>> {
        let mut url = self.geocode_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("address", address);
            if let Some(language) = &self.language {
                query.append_pair("language", language);
            }
            if let Some(region) = &self.region {
                query.append_pair("region", region);
            }
            query.append_pair("key", &self.api_key);
        }

        let response: GeocodeResponse = self.get_json(Api::Geocode, url).await?;
        Ok(response.results)
    }

    /// Request routes for the given stops.
    ///
    /// `ZERO_RESULTS` / `NOT_FOUND` yield an empty list.
    pub async fn directions(&self, request: &DirectionsRequest) -> MapsResult<Vec<Route>> {
        let mut url = self.directions_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("origin", &request.origin.to_query());
            query.append_pair("destination", &request.destination.to_query());
            if let Some(waypoints) = request.waypoints_param() {
                query.append_pair("waypoints", &waypoints);
            }
            query.append_pair("mode", self.mode.as_str());
            if let Some(language) = &self.language {
                query.append_pair("language", language);
            }
            if let Some(region) = &self.region {
                query.append_pair("region", region);
            }
            query.append_pair("key", &self.api_key);
        }

        let response: DirectionsResponse = self.get_json(Api::Directions, url).await?;
        Ok(response.routes)
    }

    /// Issue a GET with retries and decode a provider payload.
    async fn get_json<T>(&self, api: Api, url: Url) -> MapsResult<T>
    where
        T: DeserializeOwned + ProviderStatus,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.get_once::<T>(api, url.clone()).await {
                Ok(payload) => {
                    metrics::record_provider_call(api.as_str(), "ok");
                    return Ok(payload);
                }
                Err(e) => {
                    metrics::record_provider_call(api.as_str(), "error");
                    if self.retry.should_retry(attempts, &e) {
                        let delay = self.retry.delay(attempts);
                        tracing::info!(
                            api = %api,
                            attempt = attempts,
                            delay = ?delay,
                            error = %e,
                            "Retrying provider call"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(api = %api, attempts, error = %e, "Provider call failed");
                    return Err(e);
                }
            }
        }
    }

    async fn get_once<T>(&self, api: Api, url: Url) -> MapsResult<T>
    where
        T: DeserializeOwned + ProviderStatus,
    {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(api, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapsError::Http {
                api,
                status: status.as_u16(),
            });
        }

        let payload: T = response
            .json()
            .await
            .map_err(|e| self.transport_error(api, e))?;

        check_status(api, payload.status(), payload.error_message())?;
        Ok(payload)
    }

    fn transport_error(&self, api: Api, source: reqwest::Error) -> MapsError {
        if source.is_timeout() {
            MapsError::Timeout {
                api,
                secs: self.timeout_secs,
            }
        } else {
            // The request url carries the API key.
            MapsError::Transport {
                api,
                source: source.without_url(),
            }
        }
    }
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("geocode_url", &self.geocode_url.as_str())
            .field("directions_url", &self.directions_url.as_str())
            .field("mode", &self.mode)
            .field("max_attempts", &self.retry.max_attempts())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn parse_url(raw: &str) -> MapsResult<Url> {
    raw.parse()
        .map_err(|e| MapsError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Accept OK and the empty-result statuses; anything else is a provider error.
fn check_status(api: Api, status: &str, message: Option<&str>) -> MapsResult<()> {
    match status {
        STATUS_OK | STATUS_ZERO_RESULTS => Ok(()),
        STATUS_NOT_FOUND if api == Api::Directions => Ok(()),
        other => Err(MapsError::Status {
            api,
            status: other.to_string(),
            message: message.map(str::to_string),
        }),
    }
}
