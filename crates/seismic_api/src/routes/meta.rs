//! Service metadata routes: root redirect, route listing, health check.

use crate::error::ApiError;
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde_json::{json, Value};

pub(crate) async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

pub(crate) async fn ping() -> Json<Value> {
    Json(json!({ "message": seismic_core::ping() }))
}

pub(crate) async fn docs() -> Json<Value> {
    Json(json!({
        "title": "Seismic activity assessment API",
        "version": seismic_core::core_version(),
        "routes": [
            { "method": "GET", "path": "/api/seismicactivity/", "status": 200 },
            { "method": "GET", "path": "/api/seismicactivity/{station_name}", "status": 200 },
            { "method": "POST", "path": "/api/seismicactivity", "status": 201 },
            { "method": "PUT", "path": "/api/seismicactivity", "status": 202 },
            { "method": "DELETE", "path": "/api/seismicactivity/{station_name}", "status": 200 },
            { "method": "GET", "path": "/api/station", "status": 200 },
            { "method": "POST", "path": "/api/station", "status": 201 },
            { "method": "GET", "path": "/api/danger_type", "status": 200 },
            { "method": "POST", "path": "/api/danger_type", "status": 201 },
            { "method": "GET", "path": "/api/ping", "status": 200 }
        ]
    }))
}

pub(crate) async fn not_found(uri: Uri) -> impl IntoResponse {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
