//! Lockout API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::guard::{LockoutStatus, SubjectId};
use crate::http::response::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /v1/subjects/{subject}/lockout`
pub async fn get_lockout(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<LockoutStatus>, ApiError> {
    let subject = SubjectId::parse(&raw)?;
    let status = state.resolve(state.guard.lockout_status(&subject), || {
        state.guard.fresh_status()
    })?;
    Ok(Json(status))
}

/// `POST /v1/subjects/{subject}/failures`
pub async fn record_failure(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<LockoutStatus>, ApiError> {
    let subject = SubjectId::parse(&raw)?;
    let status = state.resolve(state.guard.record_failure(&subject), || {
        state.guard.fresh_status()
    })?;
    Ok(Json(status))
}

/// `DELETE /v1/subjects/{subject}/failures`
pub async fn clear_failures(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
    let subject = SubjectId::parse(&raw)?;
    state.resolve(state.guard.clear_booking_code_failures(&subject), || ())?;
    Ok(StatusCode::NO_CONTENT)
}
