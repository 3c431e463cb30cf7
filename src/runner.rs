//! Async run loop for the capture engine.
//!
//! Owns the engine on a single task: caller commands and marshaled
//! backend callbacks arrive on channels, and a tick interval drives the
//! flush deadlines. Everything the engine does still happens on this one
//! task, which preserves the event ordering guarantees.

use crate::defaults;
use crate::engine::CaptureEngine;
use crate::recognition::RecognizerEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Command from the caller (UI layer).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Start,
    Stop,
    Reset,
    ForceFlush,
    /// Text an external transcription step recognized from an audio chunk.
    AppendTranscript(String),
}

/// Callback marshaled from a platform backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Recognizer(RecognizerEvent),
    RecorderData(Vec<u8>),
}

/// Runs the engine until the command channel closes, polling deadlines at
/// the default interval. The engine is stopped before returning so
/// hardware is always released.
pub async fn run(
    engine: CaptureEngine,
    commands: mpsc::Receiver<EngineCommand>,
    backend: mpsc::Receiver<BackendEvent>,
) {
    run_with_poll_interval(
        engine,
        commands,
        backend,
        Duration::from_millis(defaults::POLL_INTERVAL_MS),
    )
    .await
}

/// Like [`run`] with an explicit deadline poll interval.
pub async fn run_with_poll_interval(
    mut engine: CaptureEngine,
    mut commands: mpsc::Receiver<EngineCommand>,
    mut backend: mpsc::Receiver<BackendEvent>,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut backend_open = true;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(EngineCommand::Start) => {
                    engine.start().await;
                }
                Some(EngineCommand::Stop) => engine.stop(),
                Some(EngineCommand::Reset) => engine.reset(),
                Some(EngineCommand::ForceFlush) => engine.force_flush(),
                Some(EngineCommand::AppendTranscript(text)) => {
                    engine.append_transcript(&text)
                }
                None => {
                    engine.stop();
                    return;
                }
            },
            event = backend.recv(), if backend_open => match event {
                Some(BackendEvent::Recognizer(e)) => engine.handle_recognizer_event(e),
                Some(BackendEvent::RecorderData(data)) => engine.handle_recorder_data(data),
                // Backend gone; keep serving commands and timers.
                None => backend_open = false,
            },
            _ = ticker.tick() => engine.poll(),
        }
    }
}
