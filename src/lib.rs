//! lectern - Speech capture and chunking engine for live lesson delivery
//!
//! Captures speech through one of two strategies (native continuous
//! recognition, or segmented raw recording for platforms without one) and
//! hands off time-boxed transcript or audio chunks for downstream
//! suggestion processing.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod capability;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod event;
pub mod recognition;
pub mod recording;
pub mod runner;
pub mod suggestion;
pub mod transcript;

// Façade and lifecycle
pub use engine::{Backends, CaptureEngine, CaptureSession};

// Mode detection
pub use capability::{CapabilityProvider, CaptureMode, StaticCapabilities, detect_mode};

// Backend seams (source → driver → sink)
pub use recognition::{RecognizedSegment, RecognizerEvent, SpeechRecognizer};
pub use recording::AudioRecorder;

// Events
pub use event::{CaptureEvent, ChannelSink, CollectorSink, EventSink, StderrSink};

// Timing
pub use clock::{Clock, ManualClock, SystemClock};

// Async runner
pub use runner::{BackendEvent, EngineCommand, run};

// Error handling
pub use error::{CaptureError, Result};

// Config
pub use config::EngineConfig;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
