//! SDK configuration management.
//!
//! This module handles loading and saving the configuration, which includes
//! the API URL, the authentication identity and the kind of session store.
//!
//! Configuration is stored at `~/.config/streamone/config.json`. Environment
//! variables override what the file says.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::{DEFAULT_API_URL, REQUEST_TIMEOUT_SECS};
use crate::api::ApiClient;
use crate::auth::AuthenticationType;
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "streamone";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "STREAMONE_API_URL";
const ENV_APPLICATION_ID: &str = "STREAMONE_APPLICATION_ID";
const ENV_APPLICATION_PSK: &str = "STREAMONE_APPLICATION_PSK";
const ENV_USER_ID: &str = "STREAMONE_USER_ID";
const ENV_USER_PSK: &str = "STREAMONE_USER_PSK";

/// Where sessions are kept between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// Lost when the process exits
    Memory,
    /// Kept in the cache directory, survives restarts
    #[default]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub authentication: Option<AuthenticationType>,
    #[serde(default)]
    pub session_store: SessionStoreKind,
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    /// Override settings from `STREAMONE_*` environment variables.
    ///
    /// Application credentials win over user credentials when both are set.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let (Some(id), Some(psk)) = (var(ENV_APPLICATION_ID), var(ENV_APPLICATION_PSK)) {
            self.authentication = Some(AuthenticationType::application(id, psk));
        } else if let (Some(id), Some(psk)) = (var(ENV_USER_ID), var(ENV_USER_PSK)) {
            self.authentication = Some(AuthenticationType::user(id, psk));
        }
    }

    /// Build an API client for the configured URL and identity.
    pub fn api_client(&self) -> Result<ApiClient> {
        let authentication = self.authentication.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No authentication configured; set {} and {}",
                ENV_APPLICATION_ID,
                ENV_APPLICATION_PSK
            )
        })?;
        let client = ApiClient::with_timeout(self.api_url(), authentication, self.request_timeout())
            .context("Failed to build API client")?;
        Ok(client)
    }

    /// Open the configured kind of session store.
    pub fn open_session_store(&self) -> Result<Arc<dyn SessionStore>> {
        match self.session_store {
            SessionStoreKind::Memory => Ok(Arc::new(MemorySessionStore::new())),
            SessionStoreKind::File => {
                let store = FileSessionStore::open(self.cache_dir()?)?;
                Ok(Arc::new(store))
            }
        }
    }
}
