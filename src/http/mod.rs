//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! ServerHandle::start(handler, config)
//!     → middleware.rs (logger, panic recovery, timeout)
//!     → server.rs (bind, accept loop on its own task)
//!     → per-connection hyper serving (HTTP/1.1 + HTTP/2)
//!
//! ServerHandle::stop()
//!     → stop accepting → drain in-flight (5s grace) → force-close
//! ```
//!
//! # Design Decisions
//! - The handler is an opaque `axum::Router`; routing is not this
//!   crate's concern
//! - Connections are served through the hyper-util auto builder so the
//!   header read timeout and header size cap are actually enforced
//! - Bind/serve failures terminate the process; a shutdown that merely
//!   overruns its grace period does not

pub mod middleware;
pub mod server;

pub use server::{ServerHandle, SHUTDOWN_GRACE};
