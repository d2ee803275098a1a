//! LLM provider settings
//!
//! The backend treats these as an opaque passthrough: the engine never
//! interprets them, it only copies them onto every generation request.

use crate::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

fn default_provider() -> String {
    "OpenRouter".to_string()
}

/// Provider/model/credential passthrough for generation requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider name understood by the backend (e.g. "OpenRouter")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier; empty means the backend's default
    #[serde(default)]
    pub model: String,

    /// API key forwarded verbatim
    #[serde(default)]
    pub api_key: String,

    /// Optional API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: String::new(),
            api_key: String::new(),
            base_url: None,
        }
    }
}

impl LlmSettings {
    /// Default settings file location (`~/.config/plotweave/settings.json`)
    pub fn default_path() -> EngineResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            crate::error::EngineError::config("Could not determine home directory")
        })?;
        Ok(home.join(".config").join("plotweave").join("settings.json"))
    }

    /// Load settings from a JSON file.
    ///
    /// A missing or unparseable file yields the defaults; settings are
    /// optional and never block the engine from starting.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
