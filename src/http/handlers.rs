//! Endpoint handlers.

use std::io;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::addresses::{read_addresses, ReadOptions};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::http::upload::SpoolFile;
use crate::maps::LatLng;
use crate::planning::{
    geocode_addresses, optimize_route, ConfirmedAddress, GeocodedAddress, RoutePlan,
};

/// Multipart field carrying the address file.
pub const UPLOAD_FIELD: &str = "file";

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub corrected_addresses: Vec<ConfirmedAddress>,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Accept an address file, geocode every line and return the results for review.
pub async fn check_addresses(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<GeocodedAddress>>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Rejected {
        status: e.status(),
        message: e.body_text(),
    })?;

    let contents = read_upload_field(&mut multipart).await?;
    let spool = SpoolFile::create(&state.config.uploads.dir, &contents).await?;

    let options = ReadOptions {
        skip_blank_lines: state.config.uploads.skip_blank_lines,
    };
    let addresses = read_addresses(spool.path(), options)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => ApiError::bad_request("upload is not valid UTF-8 text"),
            _ => ApiError::Io(e),
        })?;
    drop(spool);

    tracing::info!(count = addresses.len(), bytes = contents.len(), "Addresses uploaded");

    let geocoded = geocode_addresses(&state.maps, &addresses, &state.config.geocoding).await?;
    Ok(Json(geocoded))
}

/// Optimize the confirmed list; returns the route path for map rendering.
pub async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<Vec<LatLng>>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;
    let route = optimize_route(
        &state.maps,
        &request.corrected_addresses,
        &state.config.directions,
    )
    .await?;
    Ok(Json(route.path()))
}

/// Optimize the confirmed list; returns path, visiting order and excluded entries.
pub async fn optimize_plan(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<RoutePlan>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;
    let route = optimize_route(
        &state.maps,
        &request.corrected_addresses,
        &state.config.directions,
    )
    .await?;
    Ok(Json(route.to_plan()))
}

async fn read_upload_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    let multipart_error = |e: axum::extract::multipart::MultipartError| ApiError::Rejected {
        status: e.status(),
        message: e.body_text(),
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(multipart_error)?;
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::bad_request(format!("missing multipart field `{}`", UPLOAD_FIELD)))
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    }
}
