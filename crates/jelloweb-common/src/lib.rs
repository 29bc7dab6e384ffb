//! jelloweb-common — Shared configuration and error types used by the jello-web crates.

pub mod error;
pub mod config;

// Re-export commonly used types
pub use config::{Config, KeySource, RenderConfig, SecurityConfig, ServerConfig, MAX_CSRF_TIME_LIMIT_SECS};
pub use error::{JelloWebError, Result};
