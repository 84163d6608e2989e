//! Lockout gate middleware for booking-code verification routes.
//!
//! ```ignore
//! let verify = Router::new()
//!     .route("/bookings/verify", post(verify_code))
//!     .route_layer(middleware::from_fn_with_state(state, lockout_gate));
//! ```
//!
//! Handlers behind the gate can take `Extension<SubjectId>`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::guard::SubjectId;
use crate::http::response::{locked_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Header carrying the subject a verification request is for.
pub const LOCKOUT_SUBJECT_HEADER: &str = "x-lockout-subject";

pub async fn lockout_gate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let parsed = match request.headers().get(LOCKOUT_SUBJECT_HEADER) {
        Some(raw) => SubjectId::from_bytes(raw.as_bytes()).map_err(ApiError::from),
        None => Err(ApiError::MissingHeader(LOCKOUT_SUBJECT_HEADER)),
    };
    let subject = match parsed {
        Ok(subject) => subject,
        Err(e) => {
            metrics::record_gate_rejection("bad_subject");
            return e.into_response();
        }
    };

    let status = state.resolve(state.guard.lockout_status(&subject), || {
        state.guard.fresh_status()
    });
    match status {
        Ok(status) if status.locked => {
            tracing::warn!(
                subject = %subject,
                locked_until = ?status.locked_until,
                "Verification refused for locked subject"
            );
            metrics::record_gate_rejection("locked");
            locked_response(status, state.guard.now_millis())
        }
        Ok(_) => {
            request.extensions_mut().insert(subject);
            next.run(request).await
        }
        Err(e) => {
            metrics::record_gate_rejection("store_unavailable");
            e.into_response()
        }
    }
}
