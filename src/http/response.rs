//! Response shaping for the lockout API.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::guard::{LockoutStatus, SubjectError};
use crate::store::StoreError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidSubject(#[from] SubjectError),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("missing or invalid bearer token")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSubject(_) => "invalid_subject",
            ApiError::StoreUnavailable(_) => "store_unavailable",
            ApiError::MissingHeader(_) => "missing_header",
            ApiError::Unauthorized => "unauthorized",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSubject(_) | ApiError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct LockedBody {
    #[serde(flatten)]
    status: LockoutStatus,
    message: String,
}

/// 429 for a locked subject, with `Retry-After` in whole seconds.
pub fn locked_response(status: LockoutStatus, now: u64) -> Response {
    let retry_after = status.retry_after_secs(now).unwrap_or(0);
    let body = LockedBody {
        status,
        message: status.describe(now),
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            ApiError::InvalidSubject(SubjectError::Empty).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::StoreUnavailable(StoreError::Unavailable("down".into()))
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_locked_response_sets_retry_after() {
        let response = locked_response(LockoutStatus::locked(61_500), 1_000);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "61");
    }
}
