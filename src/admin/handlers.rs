use axum::{extract::State, Json};
use serde::Serialize;

use crate::guard::{GuardSummary, LockoutPolicy};
use crate::http::response::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub policy: LockoutPolicy,
}

#[derive(Serialize)]
pub struct EvictionReport {
    pub evicted: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        policy: *state.guard.policy(),
    })
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<GuardSummary>, ApiError> {
    Ok(Json(state.guard.summary()?))
}

pub async fn evict(State(state): State<AppState>) -> Result<Json<EvictionReport>, ApiError> {
    let evicted = state.guard.evict_expired()?;
    tracing::info!(evicted, "Manual eviction requested via admin API");
    Ok(Json(EvictionReport { evicted }))
}
