//! Discovery registration subsystem.
//!
//! Announces this process's address to an external discovery service.
//! One outbound call, best effort; this crate never queries the
//! discovery service back.

pub mod reporter;

pub use reporter::{report, try_report, ReportError};
