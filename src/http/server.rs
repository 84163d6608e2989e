//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the lockout API and, optionally, admin routes
//! - Wire up middleware (request id, trace, timeout, no-store caching)
//! - Apply the configured store failure mode
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::{FailureMode, GuardConfig};
use crate::guard::LockoutGuard;
use crate::http::handlers::{clear_failures, get_lockout, health, record_failure};
use crate::http::response::ApiError;
use crate::store::StoreError;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub guard: LockoutGuard,
    pub failure_mode: FailureMode,
    pub admin_api_key: Arc<str>,
}

impl AppState {
    pub fn new(guard: LockoutGuard, failure_mode: FailureMode) -> Self {
        Self {
            guard,
            failure_mode,
            admin_api_key: Arc::from(""),
        }
    }

    pub fn from_config(config: &GuardConfig, guard: LockoutGuard) -> Self {
        Self {
            guard,
            failure_mode: config.store.failure_mode,
            admin_api_key: Arc::from(config.admin.api_key.as_str()),
        }
    }

    /// Apply the store failure mode to a guard result.
    ///
    /// Closed: the failure reaches the client as 503. Open: `fallback` stands
    /// in for the missing answer.
    pub fn resolve<T>(
        &self,
        result: Result<T, StoreError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => match self.failure_mode {
                FailureMode::Closed => Err(ApiError::StoreUnavailable(e)),
                FailureMode::Open => {
                    tracing::warn!(error = %e, "Attempt store failed, failing open");
                    Ok(fallback())
                }
            },
        }
    }
}

/// HTTP server for the lockout service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &GuardConfig, guard: LockoutGuard) -> Self {
        let state = AppState::from_config(config, guard);
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .route("/v1/subjects/{subject}/lockout", get(get_lockout))
            .route(
                "/v1/subjects/{subject}/failures",
                post(record_failure).delete(clear_failures),
            );

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        router
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
