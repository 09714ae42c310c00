//! Concurrent upload load test.
//!
//! Every task uploads its own address list; each response must describe that
//! list and no other.

use std::time::{Duration, Instant};

use serde_json::Value;

mod common;

use common::{AMPHITHEATRE, FERRY_BUILDING, INFINITE_LOOP, STANFORD};

#[tokio::test]
async fn test_concurrent_uploads_do_not_interfere() {
    let (maps_addr, maps) = common::start_mock_maps().await;
    // Slow one lookup so uploads overlap while spooled.
    maps.delay(FERRY_BUILDING, Duration::from_millis(50));
    let planner = common::start_planner(maps_addr, |config| {
        config.geocoding.concurrency = 2;
    })
    .await;

    let lists: Vec<Vec<&'static str>> = vec![
        vec![INFINITE_LOOP, AMPHITHEATRE],
        vec![FERRY_BUILDING, STANFORD, INFINITE_LOOP],
        vec![STANFORD],
        vec![AMPHITHEATRE, FERRY_BUILDING],
    ];

    let concurrency = 16;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for i in 0..concurrency {
        let list = lists[i % lists.len()].clone();
        let base_url = planner.base_url.clone();
        let client = planner.client.clone();
        tasks.push(tokio::spawn(async move {
            let part = reqwest::multipart::Part::text(list.join("\n")).file_name("addresses.txt");
            let form = reqwest::multipart::Form::new().part("file", part);

            let req_start = Instant::now();
            let res = client
                .post(format!("{}/check_addresses", base_url))
                .multipart(form)
                .send()
                .await
                .unwrap();
            assert!(res.status().is_success(), "upload {} failed: {}", i, res.status());
            let body: Value = res.json().await.unwrap();
            (list, body, req_start.elapsed())
        }));
    }

    let mut latencies = Vec::new();
    for task in tasks {
        let (list, body, latency) = task.await.unwrap();
        let formatted: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry[0].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = list.iter().map(|a| common::fixture(a).unwrap().0).collect();
        assert_eq!(formatted, expected);
        latencies.push(latency);
    }

    let duration = start.elapsed();
    latencies.sort();
    let p50 = latencies[latencies.len() / 2];
    let p95 = latencies[(latencies.len() as f64 * 0.95) as usize];

    println!("\n--- Upload Load Results ---");
    println!("Uploads:        {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("Geocode calls:  {}", maps.geocode_calls());
    println!("---------------------------\n");

    assert_eq!(planner.spooled_files(), 0, "spool files must not outlive requests");
}
