//! Capture mode detection.
//!
//! Platform capability is injected through [`CapabilityProvider`] so the
//! detector is a pure function that tests can exercise without a real
//! recognizer or microphone.

/// Capture strategy selected once at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Native streaming recognizer with interim results.
    ContinuousRecognition,
    /// Raw microphone capture broken into timed segments.
    SegmentedRecording,
    /// Neither strategy is available.
    Unsupported,
}

impl CaptureMode {
    /// Returns true if this mode can capture speech at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, CaptureMode::Unsupported)
    }

    /// Short name for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::ContinuousRecognition => "continuous-recognition",
            CaptureMode::SegmentedRecording => "segmented-recording",
            CaptureMode::Unsupported => "unsupported",
        }
    }
}

/// Answers what the platform can do.
pub trait CapabilityProvider {
    /// Whether a native continuous speech recognizer is available.
    fn has_continuous_recognition(&self) -> bool;

    /// Whether raw segmented audio recording is available.
    fn has_segmented_recording(&self) -> bool;
}

/// Selects the capture mode for a platform.
///
/// Priority order: continuous recognition first, segmented recording
/// second, else unsupported. Pure; callers cache the result for the
/// engine's lifetime since capability does not change mid-session.
pub fn detect_mode(caps: &dyn CapabilityProvider) -> CaptureMode {
    if caps.has_continuous_recognition() {
        CaptureMode::ContinuousRecognition
    } else if caps.has_segmented_recording() {
        CaptureMode::SegmentedRecording
    } else {
        CaptureMode::Unsupported
    }
}

/// Fixed capability answers for tests and headless setups.
#[derive(Debug, Clone, Copy)]
pub struct StaticCapabilities {
    pub continuous_recognition: bool,
    pub segmented_recording: bool,
}

impl StaticCapabilities {
    /// Platform with both strategies available.
    pub fn full() -> Self {
        Self {
            continuous_recognition: true,
            segmented_recording: true,
        }
    }

    /// Platform with neither strategy available.
    pub fn none() -> Self {
        Self {
            continuous_recognition: false,
            segmented_recording: false,
        }
    }
}

impl CapabilityProvider for StaticCapabilities {
    fn has_continuous_recognition(&self) -> bool {
        self.continuous_recognition
    }

    fn has_segmented_recording(&self) -> bool {
        self.segmented_recording
    }
}
