//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validate() (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Mode-dependent timeout policy lives on the schema type itself so
//!   callers cannot bypass it

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::{RegistryConfig, RunMode, ServerConfig, ServiceConfig};
