use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::board::BoardOptions;
use crate::orchestrator::ReconcileMode;
use crate::transitions::{TransitionPolicy, TransitionTable};

/// Top-level configuration loaded from `~/.leadboard/config.toml`.
///
/// **Security**: This struct never stores API tokens. The `[api]` section
/// only names the environment variable to read; see [`CredentialProvider`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub kanban: KanbanConfig,
}

impl Config {
    /// Load config from `~/.leadboard/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(path)
        } else {
            let cfg = Config::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let cfg: Config = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Semantic validation for settings that are not fully expressible via type checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.kanban.validate()?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".leadboard")
            .join("config.toml")
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout. Unset means the HTTP client default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Env var holding the bearer token (default: `LEADBOARD_API_TOKEN`).
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            token_env: default_token_env(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.token_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.token_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        CredentialProvider::from_env(&self.token_env)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_token_env() -> String {
    "LEADBOARD_API_TOKEN".into()
}

// ---------------------------------------------------------------------------
// Kanban settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanConfig {
    /// `limit` sent with the board's lead fetch.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub reconcile: ReconcileMode,
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
    /// Render `open` leads in the New column.
    #[serde(default)]
    pub open_as_new: bool,
    /// Toast auto-dismiss delay.
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            reconcile: ReconcileMode::default(),
            transition_policy: TransitionPolicy::default(),
            open_as_new: false,
            toast_ms: default_toast_ms(),
        }
    }
}

impl KanbanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 || self.page_limit > 500 {
            return Err(ConfigError::Validation(
                "kanban.page_limit must be between 1 and 500".to_string(),
            ));
        }
        if self.toast_ms == 0 {
            return Err(ConfigError::Validation(
                "kanban.toast_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn board_options(&self) -> BoardOptions {
        BoardOptions {
            open_as_new: self.open_as_new,
        }
    }

    pub fn transitions(&self) -> TransitionTable {
        TransitionTable::for_policy(self.transition_policy)
    }
}

fn default_page_limit() -> u32 {
    100
}
fn default_toast_ms() -> u64 {
    4000
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Reads credentials from environment variables at runtime.
///
/// Config stores env var *names*; this provider resolves them on demand.
pub struct CredentialProvider;

impl CredentialProvider {
    /// Read a credential from a named env var. Empty values count as unset.
    pub fn from_env(var_name: &str) -> Option<String> {
        std::env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
