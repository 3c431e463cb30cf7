use crate::defaults;
use crate::error::{CaptureError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub capture: CaptureConfig,
    pub recognition: RecognitionConfig,
    pub recording: RecordingConfig,
}

/// Chunk timing configuration shared by both capture strategies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub flush_interval_ms: u64,
    pub silence_timeout_ms: u64,
}

/// Continuous recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    pub language: String,
    pub max_restarts: u32,
}

/// Segmented recording configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordingConfig {
    pub format_preferences: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: defaults::FLUSH_INTERVAL_MS,
            silence_timeout_ms: defaults::SILENCE_TIMEOUT_MS,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
            max_restarts: defaults::MAX_RESTARTS,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            format_preferences: defaults::FORMAT_PREFERENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CaptureConfig {
    /// Periodic flush interval as a `Duration`.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Silence timeout as a `Duration`.
    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms)
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LECTERN_LANGUAGE → recognition.language
    /// - LECTERN_FLUSH_INTERVAL_MS → capture.flush_interval_ms
    /// - LECTERN_SILENCE_TIMEOUT_MS → capture.silence_timeout_ms
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("LECTERN_LANGUAGE")
            && !language.is_empty()
        {
            self.recognition.language = language;
        }

        if let Ok(interval) = std::env::var("LECTERN_FLUSH_INTERVAL_MS")
            && let Ok(ms) = interval.parse::<u64>()
        {
            self.capture.flush_interval_ms = ms;
        }

        if let Ok(timeout) = std::env::var("LECTERN_SILENCE_TIMEOUT_MS")
            && let Ok(ms) = timeout.parse::<u64>()
        {
            self.capture.silence_timeout_ms = ms;
        }

        self
    }

    /// Validate configuration values
    ///
    /// Both timers must be positive; a zero interval would flush empty
    /// accumulators in a tight loop.
    pub fn validate(&self) -> Result<()> {
        if self.capture.flush_interval_ms == 0 {
            return Err(CaptureError::ConfigInvalidValue {
                key: "capture.flush_interval_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.capture.silence_timeout_ms == 0 {
            return Err(CaptureError::ConfigInvalidValue {
                key: "capture.silence_timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.recognition.language.is_empty() {
            return Err(CaptureError::ConfigInvalidValue {
                key: "recognition.language".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
