//! Gate configuration.
//!
//! Layered with the `config` crate, later sources winning:
//! 1. Built-in defaults
//! 2. `sessiongate.toml` (or the file named by `SESSIONGATE_CONFIG`), if present
//! 3. `SESSIONGATE__*` environment variables, e.g. `SESSIONGATE__API_BASE_URL`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sessiongate_domain::{DEFAULT_PUBLIC_PATHS, LOGIN_PATH, PublicPaths};
use thiserror::Error;
use url::Url;

use crate::gateway::DEFAULT_AUTO_LOGIN_PATH;
use crate::persistence::FileSnapshotStorage;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SESSIONGATE_CONFIG";
/// Config file read from the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "sessiongate.toml";
/// Prefix of overriding environment variables.
pub const ENV_PREFIX: &str = "SESSIONGATE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid configuration: {field}: {message}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Settings for the gate, its transport and its storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Root of the API, e.g. `http://localhost:3000/api`.
    pub api_base_url: String,
    /// Auto-login document, relative to the API base or absolute.
    /// `None` disables auto-login.
    pub auto_login_url: Option<String>,
    /// Snapshot directory. Defaults to the platform config directory.
    pub snapshot_dir: Option<PathBuf>,
    /// Storage key of the session snapshot.
    pub snapshot_key: String,
    /// Redirect target after invalidation.
    pub login_path: String,
    /// Paths where invalidation does not redirect.
    pub public_paths: Vec<String>,
    /// Per-request timeout.
    pub request_timeout_ms: u64,
    /// Upper bound on waiting for rehydration before arming the gate.
    pub bootstrap_timeout_ms: u64,
    /// TTL of cached GET responses.
    pub cache_ttl_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            auto_login_url: Some(DEFAULT_AUTO_LOGIN_PATH.to_string()),
            snapshot_dir: None,
            snapshot_key: "session".to_string(),
            login_path: LOGIN_PATH.to_string(),
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(ToString::to_string).collect(),
            request_timeout_ms: 30_000,
            bootstrap_timeout_ms: 5_000,
            cache_ttl_secs: 300,
        }
    }
}

impl GateConfig {
    /// Loads from the default file location and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path, None)
    }

    /// Loads from `path` (optional) and the environment.
    ///
    /// `env` replaces the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load_from(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("public_paths")
            .try_parsing(true)
            .source(env);

        let config: Self = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base_url).map_err(|e| ConfigError::Invalid {
            field: "api_base_url",
            message: e.to_string(),
        })?;

        if !self.login_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "login_path",
                message: format!("must start with '/': {}", self.login_path),
            });
        }

        if let Some(bad) = self.public_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::Invalid {
                field: "public_paths",
                message: format!("must start with '/': {bad}"),
            });
        }

        if self.snapshot_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "snapshot_key",
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The configured allowlist.
    #[must_use]
    pub fn public_paths(&self) -> PublicPaths {
        PublicPaths::new(self.public_paths.iter().cloned())
    }

    /// Snapshot directory, falling back to the platform default.
    #[must_use]
    pub fn resolved_snapshot_dir(&self) -> Option<PathBuf> {
        self.snapshot_dir
            .clone()
            .or_else(FileSnapshotStorage::default_dir)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Rehydration wait bound.
    #[must_use]
    pub const fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.bootstrap_timeout_ms)
    }

    /// Response cache TTL.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
