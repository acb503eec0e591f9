//! Plugin configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/hyprgrd/plugin.json`, next to the daemon's
//! own `config.json`.  A missing file is not an error: every field falls
//! back to its compiled-in default.
//!
//! # Example
//!
//! ```json
//! {
//!   "socket_path": "/run/user/1000/hyprgrd.sock",
//!   "gestures": {
//!     "forward": true,
//!     "fallback_fingers": 3
//!   }
//! }
//! ```

use crate::ipc::endpoint::Endpoint;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.  A minimal `{}` file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Explicit daemon socket, overriding `$XDG_RUNTIME_DIR/hyprgrd.sock`.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,

    /// Swipe forwarding settings.
    #[serde(default)]
    pub gestures: GestureConfig,
}

/// Swipe forwarding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Forward touchpad swipes to the daemon.  When `false` the host keeps
    /// every gesture.  Default: `true`.
    pub forward: bool,
    /// Finger count reported when a begin payload cannot be read.
    /// Default: `3`.
    pub fallback_fingers: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            forward: true,
            fallback_fingers: 3,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load from [`default_path`](Self::default_path), falling back to
    /// defaults if the file is missing or invalid.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        match Self::load(&path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                info!("no plugin config ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// `$XDG_CONFIG_HOME/hyprgrd/plugin.json`, or `$HOME/.config/...`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
                format!("{}/.config", home)
            });
        PathBuf::from(base).join("hyprgrd").join("plugin.json")
    }

    /// The daemon endpoint: the configured path, or the process default.
    pub fn endpoint(&self) -> Endpoint {
        match &self.socket_path {
            Some(path) => Endpoint::new(path),
            None => Endpoint::process_default().clone(),
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
