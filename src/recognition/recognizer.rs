use crate::error::{CaptureError, Result};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Launch parameters for the platform recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    /// BCP 47 language tag, fixed for the session.
    pub language: String,
    /// Keep recognizing across pauses instead of stopping after one phrase.
    pub continuous: bool,
    /// Deliver interim (unstable) hypotheses alongside finalized results.
    pub interim_results: bool,
}

impl RecognizerConfig {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// One result segment from the recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSegment {
    pub text: String,
    /// True once the platform marks this segment stable. Interim segments
    /// are never accumulated.
    pub is_final: bool,
}

impl RecognizedSegment {
    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Error categories reported by the recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerErrorKind {
    /// No speech was detected for a while. Not a real error.
    NoSpeech,
    /// The recognizer was aborted. Expected when the stop was intentional.
    Aborted,
    /// Anything else, with the platform's message.
    Other(String),
}

impl fmt::Display for RecognizerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognizerErrorKind::NoSpeech => write!(f, "no speech detected"),
            RecognizerErrorKind::Aborted => write!(f, "recognition aborted"),
            RecognizerErrorKind::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Event emitted by the platform recognizer, marshaled onto the engine's
/// thread by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerEvent {
    /// One or more result segments, interim or finalized.
    Result(Vec<RecognizedSegment>),
    /// The recognizer stopped, intentionally or not.
    Ended,
    /// The recognizer reported an error. Does not imply it stopped.
    Error(RecognizerErrorKind),
}

/// Handle to a platform streaming speech recognizer.
///
/// Implementations wrap whatever the platform provides; events flow back
/// through [`RecognizerEvent`], not through this trait.
pub trait SpeechRecognizer: Send {
    /// Configures and launches the recognizer. Called again for every
    /// automatic restart.
    fn start(&mut self, config: &RecognizerConfig) -> Result<()>;

    /// Requests the recognizer to stop. Must be safe to call when not
    /// running and safe to call twice.
    fn stop(&mut self);
}

#[derive(Debug, Default)]
struct MockRecognizerState {
    running: bool,
    start_calls: u32,
    stop_calls: u32,
    /// Fail `start` once this many calls have already succeeded.
    fail_start_from: Option<u32>,
    fail_always: bool,
    error_message: String,
    last_config: Option<RecognizerConfig>,
}

/// Mock recognizer for driver and engine tests.
///
/// Clones share state so a test can keep a handle for inspection while
/// the driver owns the boxed instance.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    state: Arc<Mutex<MockRecognizerState>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.lock().error_message = "mock recognizer error".to_string();
        mock
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockRecognizerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure every `start` call to fail.
    pub fn with_start_failure(self) -> Self {
        self.lock().fail_always = true;
        self
    }

    /// Configure `start` to fail once `calls` starts have succeeded.
    /// `with_start_failure_from(1)` lets the initial start succeed and
    /// fails the first restart.
    pub fn with_start_failure_from(self, calls: u32) -> Self {
        self.lock().fail_start_from = Some(calls);
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(self, message: &str) -> Self {
        self.lock().error_message = message.to_string();
        self
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn start_calls(&self) -> u32 {
        self.lock().start_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.lock().stop_calls
    }

    pub fn last_config(&self) -> Option<RecognizerConfig> {
        self.lock().last_config.clone()
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn start(&mut self, config: &RecognizerConfig) -> Result<()> {
        let mut state = self.lock();
        let succeeded_so_far = state.start_calls;
        state.last_config = Some(config.clone());

        let should_fail = state.fail_always
            || state
                .fail_start_from
                .is_some_and(|from| succeeded_so_far >= from);
        if should_fail {
            return Err(CaptureError::RecognizerStart {
                message: state.error_message.clone(),
            });
        }

        state.start_calls += 1;
        state.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.lock();
        state.stop_calls += 1;
        state.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_recognizer_start_stop() {
        let mock = MockRecognizer::new();
        let mut recognizer: Box<dyn SpeechRecognizer> = Box::new(mock.clone());

        let config = RecognizerConfig::new("en-US");
        recognizer.start(&config).unwrap();
        assert!(mock.is_running());
        assert_eq!(mock.start_calls(), 1);

        recognizer.stop();
        assert!(!mock.is_running());

        // Double stop is a no-op beyond the counter
        recognizer.stop();
        assert_eq!(mock.stop_calls(), 2);
    }

    #[test]
    fn test_mock_recognizer_records_config() {
        let mock = MockRecognizer::new();
        let mut recognizer = mock.clone();
        recognizer.start(&RecognizerConfig::new("de-DE")).unwrap();

        let config = mock.last_config().unwrap();
        assert_eq!(config.language, "de-DE");
        assert!(config.continuous);
        assert!(config.interim_results);
    }

    #[test]
    fn test_mock_recognizer_start_failure() {
        let mock = MockRecognizer::new()
            .with_start_failure()
            .with_error_message("service unavailable");
        let mut recognizer = mock.clone();

        let err = recognizer
            .start(&RecognizerConfig::new("en-US"))
            .unwrap_err();
        assert!(err.to_string().contains("service unavailable"));
        assert!(!mock.is_running());
    }

    #[test]
    fn test_mock_recognizer_fails_from_nth_start() {
        let mock = MockRecognizer::new().with_start_failure_from(2);
        let mut recognizer = mock.clone();
        let config = RecognizerConfig::new("en-US");

        assert!(recognizer.start(&config).is_ok());
        assert!(recognizer.start(&config).is_ok());
        assert!(recognizer.start(&config).is_err());
        assert_eq!(mock.start_calls(), 2);
    }

    #[test]
    fn test_segment_constructors() {
        let seg = RecognizedSegment::finalized("hello");
        assert!(seg.is_final);
        let seg = RecognizedSegment::interim("hel");
        assert!(!seg.is_final);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(RecognizerErrorKind::NoSpeech.to_string(), "no speech detected");
        assert_eq!(RecognizerErrorKind::Aborted.to_string(), "recognition aborted");
        assert_eq!(
            RecognizerErrorKind::Other("network".to_string()).to_string(),
            "network"
        );
    }
}
