use crate::action::ActionKind;
use crate::error::ConfigError;
use crate::error::Result;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::store::DEFAULT_TRACKED_ACTIONS;
use crate::store::StaleResponsePolicy;
use crate::store::StoreOptions;
use gitss_backend_client::ClientOptions;
use gitss_backend_client::DEFAULT_BASE_URL;
use gitss_backend_client::DEFAULT_TIMEOUT;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Contents of `gitss.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GitssConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Root of the gitss server; `/api/v1/...` is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Maximum number of undo steps kept.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// What to do with a search response that arrives after a newer search
    /// was started.
    #[serde(default)]
    pub stale_responses: StaleResponsePolicy,

    /// Actions that create an undo checkpoint.
    #[serde(default = "default_tracked_actions")]
    pub tracked_actions: Vec<ActionKind>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_tracked_actions() -> Vec<ActionKind> {
    DEFAULT_TRACKED_ACTIONS.to_vec()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            stale_responses: StaleResponsePolicy::default(),
            tracked_actions: default_tracked_actions(),
        }
    }
}

impl GitssConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_secs must be > 0".to_string(),
            ));
        }
        let url = Url::parse(&self.backend.base_url).map_err(|err| {
            ConfigError::Invalid(format!(
                "backend.base_url {:?} is not a url: {err}",
                self.backend.base_url
            ))
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url {:?} cannot carry a path",
                self.backend.base_url
            )));
        }
        if self.store.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "store.history_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.backend.base_url.clone(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            history_limit: self.store.history_limit,
            stale_responses: self.store.stale_responses,
            tracked_actions: self.store.tracked_actions.clone(),
        }
    }
}
