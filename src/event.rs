//! Engine events and delivery sinks.
//!
//! Drivers return [`DriverEffect`]s from each handler; the engine applies
//! them on the caller's thread and publishes the resulting
//! [`CaptureEvent`]s through an [`EventSink`]. Applying effects on one
//! thread is what makes flush-then-clear atomic: no other handler can
//! interleave between reading and clearing an accumulator.

use std::sync::Mutex;

/// Event published by the capture engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Listening state changed.
    Status { listening: bool },
    /// Transcript buffer grew; carries the full buffer.
    Transcript { full_text: String },
    /// A text chunk is ready for downstream processing (continuous mode).
    ChunkReady { text: String },
    /// An encoded audio chunk is ready (segmented-recording mode).
    AudioChunkReady {
        base64: String,
        mime_type: Option<String>,
    },
    /// A non-fatal error the caller should surface.
    Error { message: String },
}

/// Internal effect produced by a driver handler.
///
/// The engine owns the transcript buffer, so drivers request appends
/// instead of mutating it; all other effects map one-to-one onto events.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEffect {
    /// Append finalized text to the transcript buffer.
    AppendTranscript(String),
    /// Emit a text chunk.
    ChunkReady(String),
    /// Emit an encoded audio chunk.
    AudioChunkReady {
        base64: String,
        mime_type: Option<String>,
    },
    /// The driver's listening state changed.
    Listening(bool),
    /// Report an error without stopping the session.
    Error(String),
}

/// Destination for engine events.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Called on the engine's thread, in production
    /// order; implementations must not block.
    fn emit(&self, event: CaptureEvent);
}

/// Sink that forwards events into a crossbeam channel.
///
/// A closed or full channel drops the event rather than blocking the
/// engine.
pub struct ChannelSink {
    tx: crossbeam_channel::Sender<CaptureEvent>,
}

impl ChannelSink {
    pub fn new(tx: crossbeam_channel::Sender<CaptureEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: CaptureEvent) {
        let _ = self.tx.try_send(event);
    }
}

/// Sink that stores events for inspection in tests.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<CaptureEvent>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything emitted so far.
    pub fn snapshot(&self) -> Vec<CaptureEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drains and returns everything emitted so far.
    pub fn take(&self) -> Vec<CaptureEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Returns the text of every `ChunkReady` emitted so far.
    pub fn chunks(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter_map(|e| match e {
                CaptureEvent::ChunkReady { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: CaptureEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

/// Sink that reports errors and status changes to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl EventSink for StderrSink {
    fn emit(&self, event: CaptureEvent) {
        match event {
            CaptureEvent::Error { message } => eprintln!("[capture] error: {}", message),
            CaptureEvent::Status { listening } => {
                eprintln!("[capture] listening: {}", listening)
            }
            _ => {}
        }
    }
}
