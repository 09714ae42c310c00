//! Geocoding stage: raw addresses → formatted addresses with coordinates.

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::config::GeocodingConfig;
use crate::maps::{GeocodeResult, MapsClient};
use crate::observability::metrics;
use crate::planning::types::{GeocodedAddress, PlanResult};

/// Build the stage output for one address from the provider's candidates.
///
/// The first candidate wins; no candidates leaves the raw text untouched.
pub fn from_candidates(raw: &str, candidates: Vec<GeocodeResult>) -> GeocodedAddress {
    match candidates.into_iter().next() {
        Some(best) => GeocodedAddress::resolved(best.formatted_address, best.geometry.location),
        None => GeocodedAddress::unresolved(raw),
    }
}

/// Geocode every address, one provider call each, preserving input order.
///
/// With `fail_fast` the first provider failure aborts the batch; otherwise a
/// failing address is emitted unresolved and the batch continues.
pub async fn geocode_addresses(
    client: &MapsClient,
    addresses: &[String],
    config: &GeocodingConfig,
) -> PlanResult<Vec<GeocodedAddress>> {
    let concurrency = config.concurrency.max(1);
    let fail_fast = config.fail_fast;

    tracing::debug!(count = addresses.len(), concurrency, fail_fast, "Geocoding addresses");

    // Owned items keep the buffered futures `Send` for the handler.
    let geocoded: Vec<GeocodedAddress> = stream::iter(addresses.iter().cloned().enumerate())
        .map(|(index, raw)| async move { geocode_one(client, index, &raw, fail_fast).await })
        .buffered(concurrency)
        .try_collect()
        .await?;

    let resolved = geocoded.iter().filter(|g| g.is_resolved()).count();
    tracing::info!(
        total = geocoded.len(),
        resolved,
        unresolved = geocoded.len() - resolved,
        "Geocoding complete"
    );

    Ok(geocoded)
}

async fn geocode_one(
    client: &MapsClient,
    index: usize,
    raw: &str,
    fail_fast: bool,
) -> PlanResult<GeocodedAddress> {
    if raw.is_empty() {
        metrics::record_geocoded(false);
        return Ok(GeocodedAddress::unresolved(raw));
    }

    let geocoded = match client.geocode(raw).await {
        Ok(candidates) => from_candidates(raw, candidates),
        Err(e) if !fail_fast => {
            tracing::warn!(
                index,
                address = %raw,
                error = %e,
                "Geocoding failed, keeping address unresolved"
            );
            GeocodedAddress::unresolved(raw)
        }
        Err(e) => return Err(e.into()),
    };

    if !geocoded.is_resolved() {
        tracing::debug!(index, address = %raw, "Address not found");
    }
    metrics::record_geocoded(geocoded.is_resolved());
    Ok(geocoded)
}
