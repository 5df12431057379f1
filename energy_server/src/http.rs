//! HTTP surface: the snapshot endpoint, a health check and optional static files.
//!
//! The service is synchronous, so handlers hop onto the blocking pool with
//! `spawn_blocking` before touching it.
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use energy_common::net::{ENERGY_DATA_PATH, HEALTH_PATH};
use log::error;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::service::EnergyService;

/// Build the application router.
pub fn router(service: Arc<EnergyService>, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route(ENERGY_DATA_PATH, get(get_energy_data))
        .route(HEALTH_PATH, get(health_check))
        .with_state(service);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };
    app.layer(CorsLayer::permissive())
}

async fn get_energy_data(State(service): State<Arc<EnergyService>>) -> Response {
    match tokio::task::spawn_blocking(move || service.snapshot()).await {
        Ok(Ok(snapshot)) => Json(snapshot.as_ref().clone()).into_response(),
        Ok(Err(e)) => {
            error!("Energy data unavailable: {}", e);
            error_response(e.to_string())
        }
        Err(e) => {
            error!("Snapshot task failed: {}", e);
            error_response("internal error".to_string())
        }
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn error_response(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
