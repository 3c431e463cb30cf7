//! Capture engine façade.
//!
//! Unifies both capture strategies behind one interface and one event
//! sink. The engine owns the transcript buffer and the session state;
//! everything it does happens on the caller's thread, with backend
//! callbacks marshaled in through `handle_recognizer_event` and
//! `handle_recorder_data`.

use crate::capability::{CapabilityProvider, CaptureMode, detect_mode};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::CaptureError;
use crate::event::{CaptureEvent, DriverEffect, EventSink};
use crate::recognition::{
    ContinuousRecognitionDriver, ContinuousSettings, RecognizerEvent, SpeechRecognizer,
};
use crate::recording::{AudioRecorder, SegmentedRecordingDriver, SegmentedSettings};
use crate::transcript::TranscriptBuffer;
use std::sync::Arc;
use std::time::Instant;

/// The capture backends a platform provides.
///
/// Capability detection follows directly from which backends exist, so
/// this doubles as the engine's [`CapabilityProvider`].
pub struct Backends {
    pub recognizer: Option<Box<dyn SpeechRecognizer>>,
    pub recorder: Option<Box<dyn AudioRecorder>>,
}

impl Backends {
    pub fn new(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        recorder: Option<Box<dyn AudioRecorder>>,
    ) -> Self {
        Self {
            recognizer,
            recorder,
        }
    }
}

impl CapabilityProvider for Backends {
    fn has_continuous_recognition(&self) -> bool {
        self.recognizer.is_some()
    }

    fn has_segmented_recording(&self) -> bool {
        self.recorder.is_some()
    }
}

/// Live session bookkeeping. Created on `start`, destroyed on
/// `stop`/`reset` or when the active driver gives up.
#[derive(Debug, Clone, Copy)]
pub struct CaptureSession {
    pub started_at: Instant,
}

enum Driver {
    Continuous(ContinuousRecognitionDriver),
    Segmented(SegmentedRecordingDriver),
    Unsupported,
}

/// Public façade over the active capture strategy.
pub struct CaptureEngine {
    mode: CaptureMode,
    driver: Driver,
    transcript: TranscriptBuffer,
    session: Option<CaptureSession>,
    listening: bool,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl CaptureEngine {
    /// Builds an engine for whatever the given backends can do. The mode
    /// is chosen here, once, and never changes.
    pub fn new(
        backends: Backends,
        config: &EngineConfig,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mode = detect_mode(&backends);
        let driver = match (mode, backends.recognizer, backends.recorder) {
            (CaptureMode::ContinuousRecognition, Some(recognizer), _) => Driver::Continuous(
                ContinuousRecognitionDriver::new(recognizer, ContinuousSettings::from(config)),
            ),
            (CaptureMode::SegmentedRecording, _, Some(recorder)) => Driver::Segmented(
                SegmentedRecordingDriver::new(recorder, SegmentedSettings::from(config)),
            ),
            _ => Driver::Unsupported,
        };

        Self {
            mode,
            driver,
            transcript: TranscriptBuffer::new(),
            session: None,
            listening: false,
            sink,
            clock,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn supported(&self) -> bool {
        self.mode.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Begins capturing. In segmented-recording mode this suspends until
    /// the user answers the microphone permission prompt.
    ///
    /// Returns false on immediate failure (unsupported platform,
    /// recognizer launch failure, permission denied); the cause is
    /// reported through the event sink.
    pub async fn start(&mut self) -> bool {
        if self.listening {
            return true;
        }

        let now = self.clock.now();
        let (ok, effects) = match &mut self.driver {
            Driver::Continuous(driver) => driver.start(now),
            Driver::Segmented(driver) => driver.start(now).await,
            Driver::Unsupported => {
                self.sink.emit(CaptureEvent::Error {
                    message: CaptureError::Unsupported.to_string(),
                });
                return false;
            }
        };

        self.apply(effects);
        if ok {
            self.session = Some(CaptureSession { started_at: now });
        }
        ok
    }

    /// Stops capturing: final flush, timers cleared, hardware released.
    /// Safe to call repeatedly and safe to call when never started.
    pub fn stop(&mut self) {
        let effects = match &mut self.driver {
            Driver::Continuous(driver) => driver.stop(),
            Driver::Segmented(driver) => driver.stop(),
            Driver::Unsupported => Vec::new(),
        };
        self.apply(effects);
        self.session = None;
    }

    /// Stops, then clears the transcript and any pending state.
    pub fn reset(&mut self) {
        self.stop();
        if let Driver::Continuous(driver) = &mut self.driver {
            driver.clear_pending();
        }
        self.transcript.clear();
    }

    /// The cumulative session transcript.
    pub fn transcript(&self) -> &str {
        self.transcript.as_str()
    }

    /// Text accumulated since the last flush. Always empty in
    /// segmented-recording mode, where chunks are audio.
    pub fn pending_chunk(&self) -> &str {
        match &self.driver {
            Driver::Continuous(driver) => driver.pending_chunk(),
            _ => "",
        }
    }

    /// Flushes the current accumulator immediately.
    pub fn force_flush(&mut self) {
        let now = self.clock.now();
        let effects = match &mut self.driver {
            Driver::Continuous(driver) => driver.force_flush(now),
            Driver::Segmented(driver) => driver.force_flush(now),
            Driver::Unsupported => Vec::new(),
        };
        self.apply(effects);
    }

    /// External injection point: appends text an external transcription
    /// step recognized from an audio chunk.
    pub fn append_transcript(&mut self, text: &str) {
        if self.transcript.append(text) {
            self.sink.emit(CaptureEvent::Transcript {
                full_text: self.transcript.as_str().to_string(),
            });
        }
    }

    /// Timer entry point; fires whichever flush deadline has passed.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        let effects = match &mut self.driver {
            Driver::Continuous(driver) => driver.poll(now),
            Driver::Segmented(driver) => driver.poll(now),
            Driver::Unsupported => Vec::new(),
        };
        self.apply(effects);
    }

    /// Marshaling point for recognizer callbacks. Ignored outside
    /// continuous-recognition mode.
    pub fn handle_recognizer_event(&mut self, event: RecognizerEvent) {
        if let Driver::Continuous(driver) = &mut self.driver {
            let now = self.clock.now();
            let effects = driver.handle_event(event, now);
            self.apply(effects);
        }
    }

    /// Marshaling point for recorder data callbacks. Ignored outside
    /// segmented-recording mode.
    pub fn handle_recorder_data(&mut self, data: Vec<u8>) {
        if let Driver::Segmented(driver) = &mut self.driver {
            driver.handle_data(data);
        }
    }

    /// Recognizer restarts performed in the current session.
    pub fn restarts(&self) -> u32 {
        match &self.driver {
            Driver::Continuous(driver) => driver.restarts(),
            _ => 0,
        }
    }

    fn apply(&mut self, effects: Vec<DriverEffect>) {
        for effect in effects {
            match effect {
                DriverEffect::AppendTranscript(text) => {
                    if self.transcript.append(&text) {
                        self.sink.emit(CaptureEvent::Transcript {
                            full_text: self.transcript.as_str().to_string(),
                        });
                    }
                }
                DriverEffect::ChunkReady(text) => {
                    self.sink.emit(CaptureEvent::ChunkReady { text });
                }
                DriverEffect::AudioChunkReady { base64, mime_type } => {
                    self.sink
                        .emit(CaptureEvent::AudioChunkReady { base64, mime_type });
                }
                DriverEffect::Listening(listening) => {
                    if self.listening != listening {
                        self.listening = listening;
                        if !listening {
                            self.session = None;
                        }
                        self.sink.emit(CaptureEvent::Status { listening });
                    }
                }
                DriverEffect::Error(message) => {
                    self.sink.emit(CaptureEvent::Error { message });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event::CollectorSink;
    use crate::recognition::{MockRecognizer, RecognizedSegment};
    use crate::recording::MockRecorder;
    use std::time::Duration;

    struct Harness {
        engine: CaptureEngine,
        sink: Arc<CollectorSink>,
        clock: ManualClock,
    }

    fn continuous_harness(mock: &MockRecognizer) -> Harness {
        let sink = Arc::new(CollectorSink::new());
        let clock = ManualClock::new();
        let engine = CaptureEngine::new(
            Backends::new(Some(Box::new(mock.clone())), None),
            &EngineConfig::default(),
            sink.clone(),
            Arc::new(clock.clone()),
        );
        Harness {
            engine,
            sink,
            clock,
        }
    }

    fn segmented_harness(mock: &MockRecorder) -> Harness {
        let sink = Arc::new(CollectorSink::new());
        let clock = ManualClock::new();
        let engine = CaptureEngine::new(
            Backends::new(None, Some(Box::new(mock.clone()))),
            &EngineConfig::default(),
            sink.clone(),
            Arc::new(clock.clone()),
        );
        Harness {
            engine,
            sink,
            clock,
        }
    }

    fn finalized(text: &str) -> RecognizerEvent {
        RecognizerEvent::Result(vec![RecognizedSegment::finalized(text)])
    }

    #[test]
    fn test_mode_selection_prefers_recognition() {
        let recognizer = MockRecognizer::new();
        let recorder = MockRecorder::new();
        let engine = CaptureEngine::new(
            Backends::new(Some(Box::new(recognizer)), Some(Box::new(recorder))),
            &EngineConfig::default(),
            Arc::new(CollectorSink::new()),
            Arc::new(ManualClock::new()),
        );
        assert_eq!(engine.mode(), CaptureMode::ContinuousRecognition);
        assert!(engine.supported());
    }

    #[tokio::test]
    async fn test_unsupported_start_reports_error() {
        let sink = Arc::new(CollectorSink::new());
        let mut engine = CaptureEngine::new(
            Backends::new(None, None),
            &EngineConfig::default(),
            sink.clone(),
            Arc::new(ManualClock::new()),
        );

        assert_eq!(engine.mode(), CaptureMode::Unsupported);
        assert!(!engine.start().await);
        assert!(!engine.is_listening());
        assert!(matches!(
            sink.snapshot().as_slice(),
            [CaptureEvent::Error { .. }]
        ));
    }

    #[tokio::test]
    async fn test_continuous_start_and_status_event() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);

        assert!(h.engine.start().await);
        assert!(h.engine.is_listening());
        assert!(h.engine.session().is_some());
        assert_eq!(
            h.sink.snapshot(),
            vec![CaptureEvent::Status { listening: true }]
        );
    }

    #[tokio::test]
    async fn test_start_while_listening_is_noop() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);

        assert!(h.engine.start().await);
        assert!(h.engine.start().await);
        assert_eq!(mock.start_calls(), 1);
        assert_eq!(h.sink.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_transcript_event_carries_full_buffer() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;
        h.sink.take();

        h.engine.handle_recognizer_event(finalized("Hello"));
        h.engine.handle_recognizer_event(finalized("world"));

        let events = h.sink.snapshot();
        assert_eq!(
            events,
            vec![
                CaptureEvent::Transcript {
                    full_text: "Hello".to_string()
                },
                CaptureEvent::Transcript {
                    full_text: "Hello world".to_string()
                },
            ]
        );
        assert_eq!(h.engine.transcript(), "Hello world");
        assert_eq!(h.engine.pending_chunk(), "Hello world");
    }

    #[tokio::test]
    async fn test_silence_flush_through_poll() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;

        h.engine.handle_recognizer_event(finalized("Hello world"));
        h.clock.advance(Duration::from_secs(8));
        h.engine.poll();

        assert_eq!(h.sink.chunks(), vec!["Hello world".to_string()]);
        assert_eq!(h.engine.pending_chunk(), "");
        // Transcript is untouched by the flush
        assert_eq!(h.engine.transcript(), "Hello world");
    }

    #[tokio::test]
    async fn test_stop_emits_final_chunk_then_status() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;
        h.sink.take();

        h.engine.handle_recognizer_event(finalized("amen"));
        h.sink.take();
        h.engine.stop();

        assert_eq!(
            h.sink.snapshot(),
            vec![
                CaptureEvent::ChunkReady {
                    text: "amen".to_string()
                },
                CaptureEvent::Status { listening: false },
            ]
        );
        assert!(h.engine.session().is_none());
    }

    #[tokio::test]
    async fn test_double_stop_is_silent() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;
        h.engine.stop();
        h.sink.take();

        h.engine.stop();
        assert!(h.sink.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_stop_before_start_is_safe() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.stop();
        assert!(!h.engine.is_listening());
        assert!(h.sink.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;
        h.engine.handle_recognizer_event(finalized("to be discarded"));

        h.engine.reset();
        assert_eq!(h.engine.transcript(), "");
        assert_eq!(h.engine.pending_chunk(), "");
        assert!(!h.engine.is_listening());
    }

    #[tokio::test]
    async fn test_restart_exhaustion_observable_via_status() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;
        h.sink.take();

        for _ in 0..11 {
            h.engine.handle_recognizer_event(RecognizerEvent::Ended);
        }

        // No explicit stop() was called, yet listening went false
        assert!(!h.engine.is_listening());
        assert_eq!(
            h.sink.snapshot(),
            vec![CaptureEvent::Status { listening: false }]
        );
    }

    #[tokio::test]
    async fn test_append_transcript_external_injection() {
        let recorder = MockRecorder::new();
        let mut h = segmented_harness(&recorder);

        h.engine.append_transcript("transcribed elsewhere");
        assert_eq!(h.engine.transcript(), "transcribed elsewhere");
        assert_eq!(
            h.sink.snapshot(),
            vec![CaptureEvent::Transcript {
                full_text: "transcribed elsewhere".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_segmented_flow_end_to_end() {
        let recorder = MockRecorder::new();
        let mut h = segmented_harness(&recorder);

        assert!(h.engine.start().await);
        assert_eq!(h.engine.mode(), CaptureMode::SegmentedRecording);

        h.engine.handle_recorder_data(vec![1u8; 100]);
        h.clock.advance(Duration::from_secs(15));
        h.engine.poll();

        let audio_chunks: Vec<_> = h
            .sink
            .snapshot()
            .into_iter()
            .filter(|e| matches!(e, CaptureEvent::AudioChunkReady { .. }))
            .collect();
        assert_eq!(audio_chunks.len(), 1);

        h.engine.stop();
        assert!(!recorder.is_acquired());
    }

    #[tokio::test]
    async fn test_permission_denied_start_returns_false() {
        let recorder = MockRecorder::new().with_permission_denied();
        let mut h = segmented_harness(&recorder);

        assert!(!h.engine.start().await);
        assert!(!h.engine.is_listening());
        assert!(h.engine.session().is_none());
        assert!(matches!(
            h.sink.snapshot().as_slice(),
            [CaptureEvent::Error { .. }]
        ));
    }

    #[tokio::test]
    async fn test_recognizer_events_ignored_in_segmented_mode() {
        let recorder = MockRecorder::new();
        let mut h = segmented_harness(&recorder);
        h.engine.start().await;

        h.engine.handle_recognizer_event(finalized("phantom"));
        assert_eq!(h.engine.transcript(), "");
    }

    #[tokio::test]
    async fn test_force_flush_in_continuous_mode() {
        let mock = MockRecognizer::new();
        let mut h = continuous_harness(&mock);
        h.engine.start().await;

        h.engine.handle_recognizer_event(finalized("now"));
        h.engine.force_flush();
        assert_eq!(h.sink.chunks(), vec!["now".to_string()]);
    }
}
