//! HTTP surface of the seismic observation service.
//!
//! # Responsibility
//! - Route `/api` requests to `ObservationService` operations.
//! - Run blocking storage work off the async runtime.
//! - Map service failures to status codes and `{"detail"}` bodies.

use axum::routing::get;
use axum::Router;
use log::info;
use seismic_core::ObservationService;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub mod config;
pub mod error;
mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    service: ObservationService,
}

impl ApiState {
    pub fn new(service: ObservationService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ObservationService {
        &self.service
    }
}

/// Builds the application router with permissive CORS.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api", get(routes::meta::root))
        .route("/api/", get(routes::meta::root))
        .route("/api/ping", get(routes::meta::ping))
        .route("/docs", get(routes::meta::docs))
        .route(
            "/api/seismicactivity",
            get(routes::seismic_activity::list)
                .post(routes::seismic_activity::create)
                .put(routes::seismic_activity::update),
        )
        .route("/api/seismicactivity/", get(routes::seismic_activity::list))
        .route(
            "/api/seismicactivity/:station_name",
            get(routes::seismic_activity::by_station_name)
                .delete(routes::seismic_activity::delete_by_station_name),
        )
        .route(
            "/api/station",
            get(routes::reference::list_stations).post(routes::reference::create_station),
        )
        .route(
            "/api/danger_type",
            get(routes::reference::list_hazard_types)
                .post(routes::reference::create_hazard_type),
        )
        .fallback(routes::meta::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on `bind_addr` until Ctrl-C.
pub async fn serve(state: ApiState, bind_addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(
        "event=server_start module=api status=ok addr={} db_path={}",
        listener.local_addr()?,
        state.service().sessions().db_path().display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("event=server_signal module=api status=error error={err}");
        std::future::pending::<()>().await;
    }
}
