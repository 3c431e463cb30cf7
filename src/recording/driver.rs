//! Segmented recording driver.
//!
//! Fallback strategy for platforms without a usable continuous
//! recognizer: raw microphone capture is cut into fixed-duration
//! segments and each completed segment is emitted as a base64-encoded
//! audio chunk for external transcription.

use crate::config::EngineConfig;
use crate::defaults;
use crate::event::DriverEffect;
use crate::recording::recorder::{AudioRecorder, negotiate_format};
use crate::recording::segment::RecordingSegment;
use std::time::{Duration, Instant};

/// Tunables for the segmented recording driver.
#[derive(Debug, Clone)]
pub struct SegmentedSettings {
    /// Segment duration; same cadence as the continuous flush interval.
    pub flush_interval: Duration,
    /// Ordered container-format preference list.
    pub format_preferences: Vec<String>,
}

impl Default for SegmentedSettings {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_millis(defaults::FLUSH_INTERVAL_MS),
            format_preferences: defaults::FORMAT_PREFERENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl From<&EngineConfig> for SegmentedSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            flush_interval: config.capture.flush_interval(),
            format_preferences: config.recording.format_preferences.clone(),
        }
    }
}

/// Captures raw microphone audio in timed segments.
pub struct SegmentedRecordingDriver {
    recorder: Box<dyn AudioRecorder>,
    settings: SegmentedSettings,
    segment: RecordingSegment,
    listening: bool,
    deadline: Option<Instant>,
}

impl SegmentedRecordingDriver {
    pub fn new(recorder: Box<dyn AudioRecorder>, settings: SegmentedSettings) -> Self {
        Self {
            recorder,
            settings,
            segment: RecordingSegment::default(),
            listening: false,
            deadline: None,
        }
    }

    /// Acquires the microphone, negotiates a container format and begins
    /// the first segment.
    ///
    /// Suspends while the permission prompt is open. On any failure the
    /// microphone is released before returning, so no resources are held.
    pub async fn start(&mut self, now: Instant) -> (bool, Vec<DriverEffect>) {
        if self.listening {
            return (true, Vec::new());
        }

        if let Err(e) = self.recorder.acquire().await {
            self.recorder.release();
            return (false, vec![DriverEffect::Error(e.to_string())]);
        }

        let mime_type = negotiate_format(&*self.recorder, &self.settings.format_preferences);
        self.segment = RecordingSegment::new(mime_type);

        if let Err(e) = self.recorder.begin_segment(self.segment.mime_type()) {
            self.recorder.release();
            return (false, vec![DriverEffect::Error(e.to_string())]);
        }

        self.listening = true;
        self.deadline = Some(now + self.settings.flush_interval);
        (true, vec![DriverEffect::Listening(true)])
    }

    /// Appends one raw sub-buffer delivered by the recorder. Data arriving
    /// after `stop` is dropped.
    pub fn handle_data(&mut self, data: Vec<u8>) {
        if self.listening {
            self.segment.push(data);
        }
    }

    /// Forces a segment boundary when the periodic deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Vec<DriverEffect> {
        if !self.listening || !self.deadline.is_some_and(|d| now >= d) {
            return Vec::new();
        }
        self.deadline = Some(now + self.settings.flush_interval);
        self.boundary()
    }

    /// Forces an immediate segment boundary without waiting for the timer.
    pub fn force_flush(&mut self, now: Instant) -> Vec<DriverEffect> {
        if !self.listening {
            return Vec::new();
        }
        self.deadline = Some(now + self.settings.flush_interval);
        self.boundary()
    }

    /// Clears the timer, finalizes any in-progress segment and releases
    /// the microphone. Safe to call twice and safe to call when never
    /// started; the microphone is released on every exit path.
    pub fn stop(&mut self) -> Vec<DriverEffect> {
        if !self.listening {
            self.recorder.release();
            return Vec::new();
        }

        self.listening = false;
        self.deadline = None;
        self.recorder.end_segment();

        let mut effects = Vec::new();
        if let Some(encoded) = self.segment.close() {
            effects.push(DriverEffect::AudioChunkReady {
                base64: encoded.base64,
                mime_type: encoded.mime_type,
            });
        }
        self.recorder.release();
        effects.push(DriverEffect::Listening(false));
        effects
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Bytes accumulated in the open segment.
    pub fn segment_byte_len(&self) -> usize {
        self.segment.byte_len()
    }

    /// Closes the current segment and, while still listening, immediately
    /// begins the next recording so only the restart latency is lost.
    fn boundary(&mut self) -> Vec<DriverEffect> {
        self.recorder.end_segment();

        let mut effects = Vec::new();
        if let Some(encoded) = self.segment.close() {
            effects.push(DriverEffect::AudioChunkReady {
                base64: encoded.base64,
                mime_type: encoded.mime_type,
            });
        }

        if self.listening
            && let Err(e) = self.recorder.begin_segment(self.segment.mime_type())
        {
            // Cannot keep capturing without a recording; hard stop.
            effects.push(DriverEffect::Error(e.to_string()));
            self.listening = false;
            self.deadline = None;
            self.recorder.release();
            effects.push(DriverEffect::Listening(false));
        }
        effects
    }
}
