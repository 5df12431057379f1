mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::{ScriptedFetcher, harness};
use energy_common::Snapshot;
use energy_server::http::router;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn energy_data_returns_snapshot_json() {
    let h = harness(ScriptedFetcher::new());
    let app = router(h.service.clone(), None);

    let (status, body) = get(app, "/api/energy-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotes"]["wti"]["price"], 66.5);
    assert_eq!(body["quotes"]["vlsfo"]["source"], "estimated");
    assert!(body["spreads"]["brent_wti"].is_number());
    let snapshot: Snapshot = serde_json::from_value(body).unwrap();
    assert_eq!(snapshot.quotes.len(), 7);
}

#[tokio::test]
async fn energy_data_is_500_when_nothing_can_be_served() {
    let fetcher = ScriptedFetcher::new();
    fetcher.fail_all(true);
    let h = harness(fetcher);
    let app = router(h.service.clone(), None);

    let (status, body) = get(app, "/api/energy-data").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Aggregation failure"));
}

#[tokio::test]
async fn stale_snapshot_is_still_200() {
    let h = harness(ScriptedFetcher::new());
    h.service.snapshot().unwrap();
    h.clock.advance(common::WINDOW * 2);
    h.fetcher.fail_all(true);
    let app = router(h.service.clone(), None);

    let (status, body) = get(app, "/api/energy-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotes"]["brent"]["source"], "live");
}

#[tokio::test]
async fn health_check_is_ok() {
    let h = harness(ScriptedFetcher::new());
    let app = router(h.service.clone(), None);

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(h.fetcher.calls(), 0);
}
