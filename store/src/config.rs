//! # Client configuration — `registrack.toml`
//!
//! Defines the TOML configuration file shipped with the client (filename:
//! [`ClientConfig::filename`] = `"registrack.toml"`). It selects the backend
//! base URL, the request timeout, and the runtime mode that decides whether the
//! encrypted storage tier is engaged.
//!
//! ```toml
//! [api]
//! base_url = "https://api.registrack.example/api"
//! timeout_secs = 150
//!
//! [runtime]
//! mode = "production"     # "development" skips the encrypted tier
//! ```
//!
//! All structs derive `Default` so a missing or empty file is equivalent to a
//! development configuration.

use serde::{Deserialize, Serialize};

/// Runtime mode. Only production engages the encrypted secret store.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeMode::Production)
    }
}

/// Top-level configuration stored in `registrack.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Backend endpoint configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    150
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Runtime section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub mode: RuntimeMode,
}

impl ClientConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: String) -> Self {
        Self {
            api: ApiConfig {
                base_url,
                ..ApiConfig::default()
            },
            runtime: RuntimeConfig::default(),
        }
    }

    /// Builder method to set the runtime mode.
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.runtime.mode = mode;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "registrack.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
