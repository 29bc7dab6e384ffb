//! Configuration loading for jello-web.
//! Reads jelloweb.toml from the current directory or the path in JELLOWEB_CONFIG.
//! A missing file is not an error: every field has a default.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{JelloWebError, Result};

/// Secret used when neither `APP_KEY` nor `security.secret_key` is set.
pub const DEVELOPMENT_KEY: &str = "deadbeef";

/// Longest accepted CSRF token lifetime.
pub const MAX_CSRF_TIME_LIMIT_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on a submitted form body, in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

fn default_host()            -> String { "127.0.0.1".to_string() }
fn default_port()            -> u16    { 5000 }
fn default_max_input_bytes() -> usize  { 2 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Production key from the config file. `APP_KEY` takes precedence.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,
    #[serde(default = "default_csrf_time_limit")]
    pub csrf_time_limit_secs: u64,
}

fn default_csrf_time_limit() -> u64 { 3600 }

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            csrf_time_limit_secs: default_csrf_time_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Disable syntax highlighting.
    #[serde(default)]
    pub mono: bool,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize { 2 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self { mono: false, indent: default_indent() }
    }
}

/// Where the signing key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Production,
    Development,
}

impl KeySource {
    /// Line logged at startup.
    pub fn describe(self) -> &'static str {
        match self {
            KeySource::Production => "Using production key",
            KeySource::Development => "Using development key (set APP_KEY in production)",
        }
    }
}

#[cfg(test)]
mod tests;

impl Config {
    /// Load configuration from jelloweb.toml.
    /// Checks JELLOWEB_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var("JELLOWEB_CONFIG")
            .unwrap_or_else(|_| "jelloweb.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::info!(path = %path, "No config file found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_input_bytes == 0 {
            return Err(JelloWebError::Config(
                "server.max_input_bytes must be greater than zero".to_string(),
            ));
        }
        if self.security.csrf_time_limit_secs == 0 {
            return Err(JelloWebError::Config(
                "security.csrf_time_limit_secs must be greater than zero".to_string(),
            ));
        }
        if self.security.csrf_time_limit_secs > MAX_CSRF_TIME_LIMIT_SECS {
            return Err(JelloWebError::Config(format!(
                "security.csrf_time_limit_secs must be at most {} (7 days), got {}",
                MAX_CSRF_TIME_LIMIT_SECS, self.security.csrf_time_limit_secs
            )));
        }
        if self.render.indent > 16 {
            return Err(JelloWebError::Config(format!(
                "render.indent must be at most 16, got {}",
                self.render.indent
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the signing key from `APP_KEY`, then the config file,
    /// falling back to the development key.
    pub fn resolve_secret(&self) -> (SecretString, KeySource) {
        self.resolve_secret_with(std::env::var("APP_KEY").ok())
    }

    pub fn resolve_secret_with(&self, app_key: Option<String>) -> (SecretString, KeySource) {
        let production = app_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.security.secret_key.clone().filter(|k| !k.is_empty()));

        match production {
            Some(key) => (SecretString::from(key), KeySource::Production),
            None => (SecretString::from(DEVELOPMENT_KEY.to_string()), KeySource::Development),
        }
    }
}
