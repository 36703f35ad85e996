//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

static DEFAULT_API_URL: &str = "http://localhost:4000/api";
static DEFAULT_STORAGE_PATH: &str = "~/.local/share/agenda/storage.toml";

const DEFAULT_ERROR_CLEAR_DELAY_MS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("agenda").join("storage.toml"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH))
}

fn default_error_clear_delay_ms() -> u64 {
    DEFAULT_ERROR_CLEAR_DELAY_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Configuration at ~/.config/agenda/config.toml
///
/// Every key can be overridden with an `AGENDA_` environment variable,
/// e.g. `AGENDA_API_URL`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AgendaConfig {
    /// Base URL of the backend, including any path prefix (`.../api`).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// How long a session error stays visible before it is cleared.
    #[serde(default = "default_error_clear_delay_ms")]
    pub error_clear_delay_ms: u64,

    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            api_url: default_api_url(),
            error_clear_delay_ms: default_error_clear_delay_ms(),
            storage_path: default_storage_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (if any) layered under `AGENDA_*` environment variables.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("AGENDA").try_parsing(true))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    pub fn error_clear_delay(&self) -> Duration {
        Duration::from_millis(self.error_clear_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Storage path with `~` expanded to the home directory.
    pub fn storage_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.storage_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }
}
