//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::GateMode;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Backend connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the session lives between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,

    /// Poll interval used by `storedesk watch`
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
}

fn default_session_path() -> PathBuf {
    PathBuf::from("./.storedesk/session.json")
}

fn default_watch_interval_ms() -> u64 {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
            watch_interval_ms: default_watch_interval_ms(),
        }
    }
}

/// Route gate behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthConfig {
    /// Cross-check the stored role against the bearer token's claims
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    pub fn gate_mode(&self) -> GateMode {
        if self.auth.strict {
            GateMode::Strict
        } else {
            GateMode::Trusting
        }
    }
}
