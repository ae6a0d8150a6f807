//! Router assembly and the HTTP server loop.
//!
//! There are no routes: every request reaches
//! [`handlers::handle_request`] through the router fallback. Layers, from
//! outermost in:
//!
//! 1. `X-Request-Id` propagation
//! 2. `TraceLayer` request/response spans
//! 3. `TimeoutLayer` bounded by `REQUEST_TIMEOUT`
//!
//! The server drains in-flight requests on Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::{handlers, AppState};

/// Header used to correlate a request with its log lines.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Builds the service router.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use intake_api::{create_router, AppState, IntakeSettings};
/// use intake_core::SqliteContactStore;
/// use sqlx::SqlitePool;
///
/// async fn serve(pool: SqlitePool) -> std::io::Result<()> {
///     let state = AppState::new(
///         Arc::new(SqliteContactStore::new(pool)),
///         IntakeSettings::default().with_secret("s3cret"),
///     );
///     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
///     axum::serve(listener, create_router(state)).await
/// }
/// ```
pub fn create_router(state: AppState) -> Router {
    let timeout = state.settings.request_timeout;

    Router::new()
        .fallback(handlers::handle_request)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(propagate_request_id))
}

/// Reuses the caller's `X-Request-Id` when it is present, otherwise mints a
/// UUID, and echoes it on the response.
async fn propagate_request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| HeaderValue::try_from(Uuid::new_v4().to_string()).ok());

    if let Some(id) = &request_id {
        req.headers_mut().insert(REQUEST_ID_HEADER.clone(), id.clone());
    }

    let mut response = next.run(req).await;
    if let Some(id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), id);
    }
    response
}

/// Binds `addr` and serves until a shutdown signal arrives.
///
/// # Errors
///
/// Returns the I/O error if binding or accepting fails.
pub async fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, create_router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server drained");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };

    info!(signal, "Shutdown requested, draining in-flight requests");
}
