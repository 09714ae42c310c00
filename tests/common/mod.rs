//! Shared utilities for integration testing: a mock maps provider and a
//! planner server wired to it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

use route_planner::config::PlannerConfig;
use route_planner::http::HttpServer;
use route_planner::lifecycle::Shutdown;

pub const API_KEY: &str = "test-key";

pub const INFINITE_LOOP: &str = "1 Infinite Loop, Cupertino, CA";
pub const AMPHITHEATRE: &str = "1600 Amphitheatre Pkwy, Mountain View, CA";
pub const FERRY_BUILDING: &str = "Ferry Building, San Francisco, CA";
pub const STANFORD: &str = "Stanford University, CA";

/// Address that makes the mock answer `REQUEST_DENIED`.
pub const DENIED: &str = "trigger request denied";
/// Address that makes the mock answer `OVER_QUERY_LIMIT` while `flaky_failures` > 0.
pub const FLAKY: &str = "flaky lookup";

/// Origin latitudes that make the mock directions API find no route.
pub const NO_ROUTE_ZERO_RESULTS: f64 = 0.0;
pub const NO_ROUTE_NOT_FOUND: f64 = 1.0;
pub const NO_ROUTE_EMPTY: f64 = 2.0;

/// (query, formatted address, lat, lng)
const FIXTURES: &[(&str, &str, f64, f64)] = &[
    (INFINITE_LOOP, "1 Infinite Loop, Cupertino, CA 95014, USA", 37.3318, -122.0312),
    (
        AMPHITHEATRE,
        "Google Building 40, 1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
        37.4220,
        -122.0841,
    ),
    (FERRY_BUILDING, "1 Ferry Building, San Francisco, CA 94111, USA", 37.7955, -122.3937),
    (STANFORD, "450 Jane Stanford Way, Stanford, CA 94305, USA", 37.4275, -122.1697),
    (FLAKY, "Flaky Lookup, Palo Alto, CA 94301, USA", 37.4419, -122.1430),
];

pub fn fixture(address: &str) -> Option<(&'static str, f64, f64)> {
    FIXTURES
        .iter()
        .find(|(query, ..)| *query == address)
        .map(|(_, formatted, lat, lng)| (*formatted, *lat, *lng))
}

/// Observable and programmable state of the mock provider.
#[derive(Default)]
pub struct MockMaps {
    pub geocode_calls: AtomicU32,
    pub directions_calls: AtomicU32,
    pub flaky_failures: AtomicU32,
    delays: Mutex<HashMap<String, Duration>>,
    last_directions: Mutex<Option<HashMap<String, String>>>,
}

impl MockMaps {
    /// Delay the geocoding answer for one address.
    pub fn delay(&self, address: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(address.to_string(), delay);
    }

    pub fn geocode_calls(&self) -> u32 {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn directions_calls(&self) -> u32 {
        self.directions_calls.load(Ordering::SeqCst)
    }

    /// Query parameters of the most recent directions call.
    pub fn last_directions(&self) -> Option<HashMap<String, String>> {
        self.last_directions.lock().unwrap().clone()
    }
}

/// Start a mock maps provider on an ephemeral port.
pub async fn start_mock_maps() -> (SocketAddr, Arc<MockMaps>) {
    let state = Arc::new(MockMaps::default());
    let app = Router::new()
        .route("/geocode/json", get(geocode))
        .route("/directions/json", get(directions))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

async fn geocode(
    State(state): State<Arc<MockMaps>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.geocode_calls.fetch_add(1, Ordering::SeqCst);

    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return Json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }));
    }

    let address = params.get("address").cloned().unwrap_or_default();
    let delay = state.delays.lock().unwrap().get(&address).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if address == DENIED {
        return Json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "denied by test",
            "results": []
        }));
    }

    if address == FLAKY {
        let remaining = state.flaky_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            state.flaky_failures.fetch_sub(1, Ordering::SeqCst);
            return Json(json!({"status": "OVER_QUERY_LIMIT", "results": []}));
        }
    }

    match fixture(&address) {
        Some((formatted, lat, lng)) => Json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": formatted,
                "geometry": {"location": {"lat": lat, "lng": lng}, "location_type": "ROOFTOP"},
                "place_id": format!("place-{}", address.len())
            }]
        })),
        None => Json(json!({"status": "ZERO_RESULTS", "results": []})),
    }
}

/// Answers with one route that visits the waypoints in reverse.
async fn directions(
    State(state): State<Arc<MockMaps>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.directions_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_directions.lock().unwrap() = Some(params.clone());

    let parse = |raw: &str| -> Option<(f64, f64)> {
        let (lat, lng) = raw.split_once(',')?;
        Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
    };

    let (Some(origin), Some(destination)) = (
        params.get("origin").and_then(|o| parse(o.as_str())),
        params.get("destination").and_then(|d| parse(d.as_str())),
    ) else {
        return Json(json!({"status": "INVALID_REQUEST", "routes": []}));
    };

    if origin.0 == NO_ROUTE_ZERO_RESULTS {
        return Json(json!({"status": "ZERO_RESULTS", "routes": []}));
    }
    if origin.0 == NO_ROUTE_NOT_FOUND {
        return Json(json!({"status": "NOT_FOUND", "routes": []}));
    }
    if origin.0 == NO_ROUTE_EMPTY {
        return Json(json!({"status": "OK", "routes": []}));
    }

    let waypoints: Vec<(f64, f64)> = params
        .get("waypoints")
        .map(|w| {
            w.split('|')
                .filter(|p| !p.starts_with("optimize:"))
                .filter_map(parse)
                .collect()
        })
        .unwrap_or_default();

    let order: Vec<usize> = (0..waypoints.len()).rev().collect();
    let mut stops = vec![origin];
    stops.extend(order.iter().map(|&i| waypoints[i]));
    stops.push(destination);

    let point = |(lat, lng): (f64, f64)| json!({"lat": lat, "lng": lng});
    let midpoint = |a: (f64, f64), b: (f64, f64)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);

    let legs: Vec<Value> = stops
        .windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            let mid = midpoint(from, to);
            json!({
                "start_location": point(from),
                "end_location": point(to),
                "distance": {"text": "1.0 km", "value": 1000},
                "duration": {"text": "2 mins", "value": 120},
                "steps": [
                    {"start_location": point(from), "end_location": point(mid)},
                    {"start_location": point(mid), "end_location": point(to)}
                ]
            })
        })
        .collect();

    Json(json!({
        "status": "OK",
        "routes": [{
            "summary": "mock route",
            "legs": legs,
            "waypoint_order": order
        }]
    }))
}

/// Planner configuration pointing at the mock provider.
pub fn planner_config(maps_addr: SocketAddr, upload_dir: &TempDir) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.maps.api_key = API_KEY.to_string();
    config.maps.geocode_url = format!("http://{}/geocode/json", maps_addr);
    config.maps.directions_url = format!("http://{}/directions/json", maps_addr);
    config.uploads.dir = upload_dir.path().to_path_buf();
    config.timeouts.provider_secs = 5;
    config
}

/// A running planner bound to an ephemeral port.
pub struct TestPlanner {
    pub base_url: String,
    pub upload_dir: TempDir,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestPlanner {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST an address file as the multipart `file` field.
    pub async fn upload(&self, contents: &str) -> reqwest::Response {
        let part = reqwest::multipart::Part::text(contents.to_string())
            .file_name("addresses.txt")
            .mime_str("text/plain")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("file", part);

        self.client
            .post(self.url("/check_addresses"))
            .multipart(form)
            .send()
            .await
            .expect("planner unreachable")
    }

    pub async fn optimize(&self, path: &str, corrected: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&json!({ "corrected_addresses": corrected }))
            .send()
            .await
            .expect("planner unreachable")
    }

    /// Number of files left in the upload spool directory.
    pub fn spooled_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

impl Drop for TestPlanner {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a planner; `configure` adjusts the config before the server is built.
pub async fn start_planner<F>(maps_addr: SocketAddr, configure: F) -> TestPlanner
where
    F: FnOnce(&mut PlannerConfig),
{
    let upload_dir = TempDir::new().unwrap();
    let mut config = planner_config(maps_addr, &upload_dir);
    configure(&mut config);

    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestPlanner {
        base_url: format!("http://{}", addr),
        upload_dir,
        client,
        shutdown,
    }
}
