//! Default configuration constants for lectern.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default periodic flush interval in milliseconds.
///
/// Every 15 seconds the accumulated chunk is handed off for downstream
/// suggestion processing, whether or not the speaker paused.
pub const FLUSH_INTERVAL_MS: u64 = 15_000;

/// Default silence timeout in milliseconds.
///
/// 8 seconds without recognition activity triggers an early flush so a
/// natural pause in delivery produces a chunk without waiting for the
/// full periodic interval.
pub const SILENCE_TIMEOUT_MS: u64 = 8_000;

/// Default bound on automatic recognizer restarts.
///
/// Platform recognizers terminate spontaneously after a while; the driver
/// restarts them transparently up to this many times per session before
/// giving up and reporting not-listening.
pub const MAX_RESTARTS: u32 = 10;

/// Default recognition language tag (BCP 47).
pub const LANGUAGE: &str = "en-US";

/// Ordered container-format preference list for segmented recording.
///
/// The first format the recorder reports as supported is used for every
/// segment of the session. If none is supported, segments are recorded
/// with no explicit format and tagged accordingly.
pub const FORMAT_PREFERENCES: [&str; 4] = [
    "audio/webm;codecs=opus",
    "audio/webm",
    "audio/mp4",
    "audio/ogg",
];

/// Default timer poll interval for the async runner in milliseconds.
///
/// Deadline resolution, not chunk cadence: a flush lands at most this far
/// after its deadline. 250ms is negligible against 8s/15s timers.
pub const POLL_INTERVAL_MS: u64 = 250;
