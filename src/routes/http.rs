// GET handlers: version, applications, per-application dashboards, nodes

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::model::{ApplicationId, Snapshot};
use crate::timeseries::{Context, Timestamp};
use crate::version::{NAME, VERSION};
use crate::views;
use crate::widgets::RenderedDashboard;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Upper bound on buckets a single request may render.
const MAX_BUCKETS: usize = 10_000;

/// Optional window override; anything missing falls back to the snapshot's context.
#[derive(Debug, Default, Deserialize)]
pub(super) struct WindowQuery {
    from: Option<Timestamp>,
    to: Option<Timestamp>,
    step: Option<Timestamp>,
}

impl WindowQuery {
    fn resolve(&self, base: Context) -> Result<Context, (StatusCode, String)> {
        let from = self.from.unwrap_or(base.from);
        let to = self.to.unwrap_or(base.to);
        let step = self.step.unwrap_or(base.step);
        if step <= 0 {
            return Err((StatusCode::BAD_REQUEST, format!("step must be > 0, got {}", step)));
        }
        if to < from {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("to ({}) must not be before from ({})", to, from),
            ));
        }
        let ctx = Context::new(from, to, step);
        if ctx.len() > MAX_BUCKETS {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("window has {} buckets, max {}", ctx.len(), MAX_BUCKETS),
            ));
        }
        Ok(ctx)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ApplicationSummary {
    id: ApplicationId,
    instances: usize,
}

fn latest(state: &AppState) -> Result<Arc<Snapshot>, (StatusCode, String)> {
    state.snapshot_rx.borrow().clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "no snapshot published yet".to_string(),
    ))
}

fn parse_id(raw: &str) -> Result<ApplicationId, (StatusCode, String)> {
    raw.parse()
        .map_err(|e: crate::model::IdError| (StatusCode::BAD_REQUEST, e.to_string()))
}

fn not_found(what: &str, key: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found: {}", what, key))
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/applications
pub(super) async fn applications_handler(
    State(state): State<AppState>,
) -> ApiResult<Vec<ApplicationSummary>> {
    let snapshot = latest(&state)?;
    let list = snapshot
        .world
        .applications
        .values()
        .map(|app| ApplicationSummary {
            id: app.id.clone(),
            instances: app.instances.len(),
        })
        .collect();
    Ok(Json(list))
}

/// GET /api/applications/{id}/network
pub(super) async fn network_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<RenderedDashboard> {
    let snapshot = latest(&state)?;
    let ctx = window.resolve(snapshot.ctx)?;
    let app_id = parse_id(&id)?;
    let app = snapshot
        .world
        .get_application(&app_id)
        .ok_or_else(|| not_found("application", &id))?;
    Ok(Json(views::network(app, &snapshot.world).render(&ctx)))
}

/// GET /api/applications/{id}/rds
pub(super) async fn rds_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<RenderedDashboard> {
    let snapshot = latest(&state)?;
    let ctx = window.resolve(snapshot.ctx)?;
    let app_id = parse_id(&id)?;
    let app = snapshot
        .world
        .get_application(&app_id)
        .ok_or_else(|| not_found("application", &id))?;
    Ok(Json(views::rds(&ctx, app).render(&ctx)))
}

/// GET /api/nodes/{key}
pub(super) async fn node_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(window): Query<WindowQuery>,
) -> ApiResult<RenderedDashboard> {
    let snapshot = latest(&state)?;
    let ctx = window.resolve(snapshot.ctx)?;
    let node = snapshot
        .world
        .get_node(&key)
        .ok_or_else(|| not_found("node", &key))?;
    Ok(Json(views::node(&ctx, node).render(&ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_falls_back_to_snapshot_context() {
        let base = Context::new(0, 600, 60);
        let q = WindowQuery {
            from: Some(300),
            ..Default::default()
        };
        assert_eq!(q.resolve(base).unwrap(), Context::new(300, 600, 60));
    }

    #[test]
    fn window_rejects_inverted_range_and_bad_step() {
        let base = Context::new(0, 600, 60);
        let inverted = WindowQuery {
            from: Some(700),
            ..Default::default()
        };
        assert_eq!(inverted.resolve(base).unwrap_err().0, StatusCode::BAD_REQUEST);
        let zero_step = WindowQuery {
            step: Some(0),
            ..Default::default()
        };
        assert_eq!(zero_step.resolve(base).unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn window_rejects_too_many_buckets() {
        let base = Context::new(0, 600, 60);
        let huge = WindowQuery {
            from: Some(0),
            to: Some(1_000_000_000_000),
            step: Some(1),
        };
        let (status, msg) = huge.resolve(base).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("buckets"));

        let at_limit = WindowQuery {
            from: Some(0),
            to: Some((MAX_BUCKETS as i64 - 1) * 60),
            step: None,
        };
        assert_eq!(at_limit.resolve(base).unwrap().len(), MAX_BUCKETS);
    }

    #[test]
    fn window_near_timestamp_limits_resolves() {
        let base = Context::new(0, 600, 60);
        let extreme = WindowQuery {
            from: Some(0),
            to: Some(i64::MAX),
            step: Some(i64::MAX / 2),
        };
        let ctx = extreme.resolve(base).unwrap();
        assert_eq!(ctx.buckets().count(), 3);
    }
}
