// HTTP routes over the latest published snapshot

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::worker::SnapshotRx;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_rx: SnapshotRx,
}

pub fn app(snapshot_rx: SnapshotRx) -> Router {
    let state = AppState { snapshot_rx };
    Router::new()
        .route("/", get(|| async { "correlator: topology and metrics correlation" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/applications", get(http::applications_handler)) // GET /api/applications
        .route(
            "/api/applications/{id}/network",
            get(http::network_handler),
        ) // GET /api/applications/{id}/network
        .route("/api/applications/{id}/rds", get(http::rds_handler)) // GET /api/applications/{id}/rds
        .route("/api/nodes/{key}", get(http::node_handler)) // GET /api/nodes/{key}
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
