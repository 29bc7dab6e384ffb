//! Shared application state for the web server.

use std::sync::Arc;

use chrono::Duration;
use jelloweb_common::{Config, KeySource, MAX_CSRF_TIME_LIMIT_SECS};
use jelloweb_engine::{ParserRegistry, PathEngine, QueryEngine};
use minijinja::Environment;
use secrecy::SecretString;

use crate::error::WebError;
use crate::templates;

/// Shared state injected into every Axum handler. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub secret: SecretString,
    pub key_source: KeySource,
    pub engine: Arc<dyn QueryEngine>,
    pub parsers: Arc<ParserRegistry>,
    pub templates: Environment<'static>,
}

impl AppState {
    /// Build state with the key resolved from `APP_KEY` / the config file.
    pub fn new(config: Config) -> Result<Self, WebError> {
        let (secret, key_source) = config.resolve_secret();
        Self::with_secret(config, secret, key_source)
    }

    pub fn with_secret(
        config: Config,
        secret: SecretString,
        key_source: KeySource,
    ) -> Result<Self, WebError> {
        Ok(Self {
            config,
            secret,
            key_source,
            engine: Arc::new(PathEngine),
            parsers: Arc::new(ParserRegistry::with_builtin()),
            templates: templates::environment()?,
        })
    }

    pub fn csrf_time_limit(&self) -> Duration {
        let secs = self.config.security.csrf_time_limit_secs.min(MAX_CSRF_TIME_LIMIT_SECS);
        Duration::seconds(secs as i64)
    }
}

pub type SharedState = Arc<AppState>;
