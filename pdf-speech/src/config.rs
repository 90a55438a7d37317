//! pdf-speech configuration management.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const DEFAULT_ENGINE: &str = "cloud";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_BITRATE: &str = "128k";
const DEFAULT_SPEAKING_RATE: f32 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Default TTS engine ("cloud" or "offline")
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Voice language code passed to the engine
    #[serde(default = "default_language")]
    pub language: String,

    /// Speaking rate multiplier (0.5-2.0)
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,

    /// MP3 bitrate for the assembled output
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_speaking_rate() -> f32 {
    DEFAULT_SPEAKING_RATE
}

fn default_bitrate() -> String {
    DEFAULT_BITRATE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            language: default_language(),
            speaking_rate: default_speaking_rate(),
            bitrate: default_bitrate(),
        }
    }
}

impl AppConfig {
    /// Get the config file path: ~/.config/pdf-speech/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("pdf-speech")
            .join("config.toml"))
    }

    /// Load config from file, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
