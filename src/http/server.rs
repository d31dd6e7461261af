//! HTTP server lifecycle.
//!
//! # Responsibilities
//! - Bind the listener and apply the timeout policy from `ServerConfig`
//! - Wire up middleware (request logging, panic recovery, timeout)
//! - Run the accept loop without blocking the caller of `start`
//! - Drain in-flight connections on `stop`, bounded by a grace period
//!
//! Exactly one `start` and exactly one `stop` per handle; `stop`
//! consumes the handle so a second call cannot compile.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::config::ServerConfig;
use crate::http::middleware;

/// Grace period granted to in-flight requests during shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A running HTTP server.
///
/// Returned by [`ServerHandle::start`]; owns the serve task and the
/// shutdown signal. Lives until [`ServerHandle::stop`] completes.
pub struct ServerHandle {
    local_addr: SocketAddr,
    config: ServerConfig,
    shutdown_tx: watch::Sender<()>,
    serve_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Bind the listener and launch the accept loop.
    ///
    /// Returns as soon as the loop is running. A bind failure is fatal:
    /// a service that cannot listen cannot serve its purpose, so the
    /// process exits after an error log. After `start` returns the
    /// server is accepting connections; there is no third outcome.
    pub async fn start(handler: Router, config: ServerConfig) -> Self {
        let app = middleware::apply(handler, &config);

        let listener = match TcpListener::bind(config.listen_address.as_str()).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!(
                    address = %config.listen_address,
                    error = %err,
                    "failed to bind http listener"
                );
                std::process::exit(1);
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::error!(error = %err, "failed to resolve bound listener address");
                std::process::exit(1);
            }
        };

        tracing::info!(
            address = %local_addr,
            mode = ?config.mode,
            read_timeout = ?config.read_timeout(),
            write_timeout = ?config.write_timeout(),
            "starting http server"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let serve_task = tokio::spawn(serve(listener, app, config.clone(), shutdown_rx));

        Self {
            local_addr,
            config,
            shutdown_tx,
            serve_task,
        }
    }

    /// Address the listener is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shut the server down gracefully.
    ///
    /// Stops accepting new connections, then waits up to
    /// [`SHUTDOWN_GRACE`] for in-flight requests. If the deadline
    /// elapses the serve task is aborted, which drops the connection
    /// set and aborts every remaining connection task with it; only a
    /// serve-task failure is fatal.
    pub async fn stop(mut self) {
        tracing::info!("shutting down http server");
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut self.serve_task).await {
            Ok(Ok(())) => tracing::info!("http server stopped"),
            Ok(Err(err)) => {
                tracing::error!(error = %err, "cannot shut down http server");
                std::process::exit(1);
            }
            Err(_) => {
                self.serve_task.abort();
                tracing::warn!(
                    grace = ?SHUTDOWN_GRACE,
                    "shutdown grace period elapsed, closing remaining connections"
                );
            }
        }
    }
}

/// Accept loop. Serves each connection on its own task and registers it
/// with the graceful-shutdown watcher so `stop` can drain them.
async fn serve(
    listener: TcpListener,
    app: Router,
    config: ServerConfig,
    mut shutdown_rx: watch::Receiver<()>,
) {
    let service = TowerToHyperService::new(app);

    let mut builder = ConnectionBuilder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(config.read_timeout())
        .max_buf_size(config.header_cap_bytes());
    builder.http2().timer(TokioTimer::new());

    let graceful = GracefulShutdown::new();

    // Connection tasks live in the set so that aborting this task
    // aborts them too.
    let mut connections: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(err) if is_transient(&err) => {
                        tracing::warn!(error = %err, "transient accept error");
                        continue;
                    }
                    Err(err) => {
                        // A listener that can no longer accept is fatal:
                        // the service cannot perform its purpose.
                        tracing::error!(
                            address = %config.listen_address,
                            error = %err,
                            "http listener failed"
                        );
                        std::process::exit(1);
                    }
                };

                tracing::debug!(peer = %peer_addr, "connection accepted");

                let conn = builder.serve_connection_with_upgrades(
                    TokioIo::new(stream),
                    service.clone(),
                );
                let conn = graceful.watch(conn.into_owned());
                connections.spawn(async move {
                    if let Err(err) = conn.await {
                        tracing::debug!(error = %err, "connection closed with error");
                    }
                });
            }
            Some(_) = connections.join_next() => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    // Stop accepting first, then drain what is still in flight.
    drop(listener);
    graceful.shutdown().await;
    while connections.join_next().await.is_some() {}
}

/// Per-connection failures that do not indicate a broken listener.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
