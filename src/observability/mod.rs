//! Observability subsystem.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Colored, verbose output in debug mode; plain, reduced output in
//!   release mode
//! - Log level overridable via `RUST_LOG`

pub mod logging;
