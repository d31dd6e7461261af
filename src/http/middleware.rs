//! Cross-cutting middleware wired onto the supplied handler.
//!
//! The handler itself is opaque; this module only attaches the request
//! logger, the panic-recovery wrapper, and the response timeout.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;

/// Wrap the handler with the standard middleware stack.
///
/// Outermost to innermost: request logging, panic recovery, response
/// timeout. The timeout carries the mode-dependent effective write
/// timeout from the config.
pub fn apply(handler: Router, config: &ServerConfig) -> Router {
    let panic_recovery = CatchPanicLayer::custom(handle_panic);
    let timeout = TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, config.write_timeout());

    if config.mode.is_debug() {
        handler.layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().include_headers(true))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(panic_recovery)
                .layer(timeout),
        )
    } else {
        handler.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(panic_recovery)
                .layer(timeout),
        )
    }
}

/// Convert a handler panic into a logged 500 response instead of
/// tearing down the connection task.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
