//! Continuous recognition driver.
//!
//! Owns the pending chunk and the two flush deadlines. Every handler
//! returns its effects as values; the engine applies them, so nothing
//! here touches the transcript buffer or the event sink directly.

use crate::config::EngineConfig;
use crate::defaults;
use crate::event::DriverEffect;
use crate::recognition::recognizer::{
    RecognizerConfig, RecognizerErrorKind, RecognizerEvent, SpeechRecognizer,
};
use crate::transcript::PendingChunk;
use std::time::{Duration, Instant};

/// Tunables for the continuous recognition driver.
#[derive(Debug, Clone)]
pub struct ContinuousSettings {
    pub language: String,
    /// Periodic chunk flush interval.
    pub flush_interval: Duration,
    /// Early flush after this long without recognition activity.
    pub silence_timeout: Duration,
    /// Bound on automatic recognizer restarts per session.
    pub max_restarts: u32,
}

impl Default for ContinuousSettings {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
            flush_interval: Duration::from_millis(defaults::FLUSH_INTERVAL_MS),
            silence_timeout: Duration::from_millis(defaults::SILENCE_TIMEOUT_MS),
            max_restarts: defaults::MAX_RESTARTS,
        }
    }
}

impl From<&EngineConfig> for ContinuousSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            language: config.recognition.language.clone(),
            flush_interval: config.capture.flush_interval(),
            silence_timeout: config.capture.silence_timeout(),
            max_restarts: config.recognition.max_restarts,
        }
    }
}

/// Drives a native continuous recognizer and normalizes its events into
/// chunk and transcript effects.
pub struct ContinuousRecognitionDriver {
    recognizer: Box<dyn SpeechRecognizer>,
    recognizer_config: RecognizerConfig,
    settings: ContinuousSettings,
    pending: PendingChunk,
    restarts: u32,
    intentional_stop: bool,
    listening: bool,
    periodic_deadline: Option<Instant>,
    silence_deadline: Option<Instant>,
}

impl ContinuousRecognitionDriver {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, settings: ContinuousSettings) -> Self {
        let recognizer_config = RecognizerConfig::new(settings.language.clone());
        Self {
            recognizer,
            recognizer_config,
            settings,
            pending: PendingChunk::new(),
            restarts: 0,
            intentional_stop: false,
            listening: false,
            periodic_deadline: None,
            silence_deadline: None,
        }
    }

    /// Launches the recognizer and arms both flush deadlines.
    ///
    /// Failure is reported as an error effect and `false`; there is no
    /// retry at this level.
    pub fn start(&mut self, now: Instant) -> (bool, Vec<DriverEffect>) {
        if self.listening {
            return (true, Vec::new());
        }

        self.intentional_stop = false;
        self.restarts = 0;

        if let Err(e) = self.recognizer.start(&self.recognizer_config) {
            return (false, vec![DriverEffect::Error(e.to_string())]);
        }

        self.listening = true;
        self.periodic_deadline = Some(now + self.settings.flush_interval);
        self.silence_deadline = Some(now + self.settings.silence_timeout);
        (true, vec![DriverEffect::Listening(true)])
    }

    /// Handles one recognizer event.
    ///
    /// Once the stop was intentional every event is ignored, so a stale
    /// recognizer instance can never emit through a driver that already
    /// stopped.
    pub fn handle_event(&mut self, event: RecognizerEvent, now: Instant) -> Vec<DriverEffect> {
        if self.intentional_stop {
            return Vec::new();
        }

        match event {
            RecognizerEvent::Result(segments) => self.on_result(segments, now),
            RecognizerEvent::Ended => self.on_ended(now),
            RecognizerEvent::Error(kind) => self.on_error(kind),
        }
    }

    fn on_result(
        &mut self,
        segments: Vec<crate::recognition::recognizer::RecognizedSegment>,
        now: Instant,
    ) -> Vec<DriverEffect> {
        if !self.listening {
            return Vec::new();
        }

        // Any activity postpones the silence-triggered flush.
        self.silence_deadline = Some(now + self.settings.silence_timeout);

        let finalized: Vec<&str> = segments
            .iter()
            .filter(|s| s.is_final)
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if finalized.is_empty() {
            return Vec::new();
        }

        let text = finalized.join(" ");
        self.pending.push(&text);
        vec![DriverEffect::AppendTranscript(text)]
    }

    fn on_ended(&mut self, now: Instant) -> Vec<DriverEffect> {
        if !self.listening {
            return Vec::new();
        }

        if self.restarts < self.settings.max_restarts {
            self.restarts += 1;
            match self.recognizer.start(&self.recognizer_config) {
                Ok(()) => {
                    self.silence_deadline = Some(now + self.settings.silence_timeout);
                    Vec::new()
                }
                // A restart that fails is a hard stop.
                Err(_) => self.hard_stop(),
            }
        } else {
            self.hard_stop()
        }
    }

    fn on_error(&mut self, kind: RecognizerErrorKind) -> Vec<DriverEffect> {
        match kind {
            // Pauses in delivery are expected, not errors.
            RecognizerErrorKind::NoSpeech => Vec::new(),
            kind => vec![DriverEffect::Error(kind.to_string())],
        }
    }

    /// Fires whichever flush deadline has passed.
    ///
    /// Both deadlines funnel into the same flush primitive and re-arm
    /// together, so two deadlines passing in one poll cannot emit twice.
    pub fn poll(&mut self, now: Instant) -> Vec<DriverEffect> {
        if !self.listening {
            return Vec::new();
        }

        let periodic_due = self.periodic_deadline.is_some_and(|d| now >= d);
        let silence_due = self.silence_deadline.is_some_and(|d| now >= d);
        if !periodic_due && !silence_due {
            return Vec::new();
        }

        self.periodic_deadline = Some(now + self.settings.flush_interval);
        self.silence_deadline = Some(now + self.settings.silence_timeout);
        self.flush()
    }

    /// Flushes immediately and re-arms both deadlines.
    pub fn force_flush(&mut self, now: Instant) -> Vec<DriverEffect> {
        if !self.listening {
            return Vec::new();
        }
        self.periodic_deadline = Some(now + self.settings.flush_interval);
        self.silence_deadline = Some(now + self.settings.silence_timeout);
        self.flush()
    }

    /// Stops the recognizer, flushes any remainder, clears both deadlines.
    /// Safe to call twice and safe to call when never started.
    pub fn stop(&mut self) -> Vec<DriverEffect> {
        if self.intentional_stop && !self.listening {
            return Vec::new();
        }

        self.intentional_stop = true;
        self.recognizer.stop();
        self.periodic_deadline = None;
        self.silence_deadline = None;

        let mut effects = self.flush();
        if self.listening {
            self.listening = false;
            effects.push(DriverEffect::Listening(false));
        }
        effects
    }

    /// Discards any accumulated pending text without emitting it.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn pending_chunk(&self) -> &str {
        self.pending.as_str()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    fn hard_stop(&mut self) -> Vec<DriverEffect> {
        self.listening = false;
        self.periodic_deadline = None;
        self.silence_deadline = None;
        vec![DriverEffect::Listening(false)]
    }

    fn flush(&mut self) -> Vec<DriverEffect> {
        match self.pending.take() {
            Some(text) => vec![DriverEffect::ChunkReady(text)],
            None => Vec::new(),
        }
    }
}
