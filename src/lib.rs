//! HTTP service lifecycle toolkit.
//!
//! Two independent, co-located concerns:
//!
//! ```text
//! ServerHandle::start(handler, config) ──▶ accept loop (own task)
//!         │                                    │
//!         ▼                                    ▼
//!   returns handle                   per-connection serving
//!         │                          (logger / recovery / timeout)
//!         ▼
//! ServerHandle::stop() ──▶ drain in-flight, 5s grace, force-close
//!
//! registry::report(url, addr, user, pass) ──▶ one authenticated POST
//!                                             to the discovery service
//! ```
//!
//! Routing and request handlers are supplied by the caller as an opaque
//! `axum::Router`; process signal handling is the caller's job too.

pub mod config;
pub mod http;
pub mod observability;
pub mod registry;

pub use config::{RunMode, ServerConfig, ServiceConfig};
pub use http::ServerHandle;
pub use registry::report;
