//! Configuration for impanel
//!
//! Backend endpoint and access-gate settings. Values come from defaults,
//! then `~/.impanel/config.toml` when present, then environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gate::DEFAULT_SESSION_MINUTES;

/// Environment variable overriding the backend base URL
pub const ENV_BACKEND_URL: &str = "IMPANEL_BACKEND_URL";
/// Environment variable overriding the gate password
pub const ENV_ACCESS_PASSWORD: &str = "IMPANEL_ACCESS_PASSWORD";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpanelConfig {
    /// Backend endpoint settings
    pub backend: BackendConfig,
    /// Access gate settings
    pub gate: GateConfig,
}

impl Default for ImpanelConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            gate: GateConfig::default(),
        }
    }
}

/// Backend endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the review backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Access gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Shared password; `None` leaves the gate disabled
    pub password: Option<String>,
    /// Session lifetime in minutes
    pub session_minutes: i64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            password: None,
            session_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

impl ImpanelConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Default location: `~/.impanel/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".impanel").join("config.toml"))
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        let config = Self::from_toml(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location
    ///
    /// A missing config file is not an error; defaults apply. Environment
    /// overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
        if let Ok(password) = std::env::var(ENV_ACCESS_PASSWORD) {
            if !password.is_empty() {
                self.gate.password = Some(password);
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "backend.base_url must not be empty".to_string(),
            });
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "backend.timeout_secs must be positive".to_string(),
            });
        }
        if self.gate.session_minutes <= 0 {
            return Err(ConfigError::Invalid {
                message: "gate.session_minutes must be positive".to_string(),
            });
        }
        Ok(())
    }
}
