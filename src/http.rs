//! HTTP transport for the bridge server
//!
//! Thin adapter between axum and the transport-agnostic dispatcher. Routes:
//! - `POST /{method}` - invoke `{handlerType}_{methodName}`; the body is a
//!   JSON object mapping argument names to wire strings
//! - `GET /health`    - server status and request metrics
//!
//! Success answers `200 text/plain` with the wire-string result; any
//! dispatch failure answers `400` with the error message. A malformed
//! request can never take the process down.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use sysinfo::System;
use tracing::{info, warn};

use crate::context::ServerContext;
use crate::dispatcher::Dispatcher;
use crate::metrics::Metrics;

/// Shared state for the HTTP transport.
pub struct HttpState {
    pub dispatcher: Dispatcher,
    pub context: ServerContext,
    pub metrics: Metrics,
}

/// Build the application router. Separate from [`run_http_server`] so tests
/// can serve it on an ephemeral port.
pub fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{method}", post(invoke_handler))
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn run_http_server(
    state: Arc<HttpState>,
    bind_addr: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Bridge server listening on {}", addr);

    let app = router(Arc::clone(&state));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drop all live objects before exit, like a final flushMemory
    state.dispatcher.memory().flush();
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Parse the request body into the raw argument map. An empty body means
/// no arguments.
fn parse_raw_args(body: &[u8]) -> Result<HashMap<String, String>, serde_json::Error> {
    if body.is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_slice(body)
}

/// Adapter policy: collaborators that need a filesystem root receive the
/// server's files directory unless the caller supplied one.
fn inject_directory(raw_args: &mut HashMap<String, String>, context: &ServerContext) {
    raw_args
        .entry("directory".to_string())
        .or_insert_with(|| format!("\"{}\"", context.files_dir().display()));
}

/// POST /{method} - dispatch one operation.
async fn invoke_handler(
    State(state): State<Arc<HttpState>>,
    Path(method): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let mut raw_args = match parse_raw_args(&body) {
        Ok(args) => args,
        Err(e) => {
            warn!(%method, "Invalid request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            )
                .into_response();
        }
    };
    inject_directory(&mut raw_args, &state.context);

    let start = Instant::now();
    let result = tokio::task::spawn_blocking({
        let state = Arc::clone(&state);
        let method = method.clone();
        move || state.dispatcher.dispatch(&method, &raw_args)
    })
    .await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let handler_type = method.split_once('_').map(|(h, _)| h).unwrap_or("nohandler");

    match result {
        Ok(Ok(wire)) => {
            state
                .metrics
                .record_request(&method, handler_type, duration_ms, true);
            (StatusCode::OK, wire).into_response()
        }
        Ok(Err(e)) => {
            state
                .metrics
                .record_request(&method, handler_type, duration_ms, false);
            warn!(%method, code = e.code(), "Request failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            state
                .metrics
                .record_request(&method, handler_type, duration_ms, false);
            warn!(%method, "Dispatch task panicked: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string()).into_response()
        }
    }
}

/// GET /health - server status, handle count, metrics.
async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let mut sys = System::new();
    sys.refresh_memory();
    let memory_percent = if sys.total_memory() > 0 {
        sys.used_memory() as f32 / sys.total_memory() as f32 * 100.0
    } else {
        0.0
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "address": state.context.local_addr().to_string(),
        "handles": state.dispatcher.memory().len(),
        "operations": state.dispatcher.registry().operation_count(),
        "handlerTypes": state.dispatcher.registry().handler_types(),
        "memoryPercent": memory_percent,
        "metrics": state.metrics.snapshot(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_parse_raw_args_empty_body() {
        assert!(parse_raw_args(b"").unwrap().is_empty());
    }

    #[test]
    fn test_parse_raw_args_json_map() {
        let args = parse_raw_args(br#"{"value": "I42"}"#).unwrap();
        assert_eq!(args["value"], "I42");
    }

    #[test]
    fn test_parse_raw_args_rejects_non_map() {
        assert!(parse_raw_args(b"[1, 2]").is_err());
        assert!(parse_raw_args(b"not json").is_err());
    }

    #[test]
    fn test_inject_directory_only_when_absent() {
        let context = ServerContext::new("/data/files", IpAddr::V4(Ipv4Addr::LOCALHOST));

        let mut args = HashMap::new();
        inject_directory(&mut args, &context);
        assert_eq!(args["directory"], "\"/data/files\"");

        let mut args = HashMap::new();
        args.insert("directory".to_string(), "\"/custom\"".to_string());
        inject_directory(&mut args, &context);
        assert_eq!(args["directory"], "\"/custom\"");
    }
}
