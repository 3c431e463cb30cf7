//! Error types for lectern.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture mode errors
    #[error("No speech capture mode is available on this platform")]
    Unsupported,

    // Recognition errors
    #[error("Speech recognizer failed to start: {message}")]
    RecognizerStart { message: String },

    // Recording errors
    #[error("Microphone permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Audio recorder failed: {message}")]
    Recorder { message: String },

    // Suggestion boundary errors
    #[error("Malformed suggestion payload: {message}")]
    MalformedSuggestion { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CaptureError>;
