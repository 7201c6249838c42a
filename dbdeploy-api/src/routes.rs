//! HTTP routes
//!
//! `POST /deploy_stateful` provisions a database; the remaining routes are
//! read-only (catalog listing and health probes).

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dbdeploy_common::{DatabaseInfo, DbType, DeployResponse};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::catalog;
use crate::error::ApiError;
use crate::health::{HealthResponse, LivenessResponse, ReadinessResponse};
use crate::state::AppState;

/// Query string of `POST /deploy_stateful`
#[derive(Debug, Deserialize)]
pub struct DeployParams {
    pub db_name: String,
    /// Kept as text so unknown engines surface as a typed rejection
    #[serde(default)]
    pub db_type: Option<String>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/deploy_stateful", post(deploy_stateful))
        .route("/api/databases", get(list_databases))
        .route("/api/health", get(health_check))
        .route("/api/health/detailed", get(health_detailed))
        .route("/api/health/live", get(liveness_probe))
        .route("/api/health/ready", get(readiness_probe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn deploy_stateful(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DeployParams>, QueryRejection>,
) -> Result<(StatusCode, Json<DeployResponse>), ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let db_type = params
        .db_type
        .as_deref()
        .unwrap_or(DbType::default().as_str())
        .to_string();

    let response = state
        .deployment_manager
        .deploy_named(&params.db_name, &db_type)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_databases() -> Json<Vec<DatabaseInfo>> {
    Json(catalog::list())
}

/// Simple liveness check
async fn health_check() -> &'static str {
    "OK"
}

/// Detailed health check with component status
async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let checker = &state.health_checker;
    let components = vec![
        checker
            .check_kubernetes(state.deployment_manager.cluster())
            .await,
    ];

    Json(checker.build_response(components))
}

/// Liveness probe for container orchestration
async fn liveness_probe(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(state.health_checker.liveness())
}

/// Readiness probe for container orchestration
async fn readiness_probe(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let checker = &state.health_checker;
    let components = vec![
        checker
            .check_kubernetes(state.deployment_manager.cluster())
            .await,
    ];
    let response = checker.readiness(&components);

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
