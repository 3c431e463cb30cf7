//! Segmented recording capture strategy.
//!
//! The fallback for platforms without a usable continuous recognizer:
//! raw microphone capture segmented into fixed-duration clips, each
//! delivered as a base64-encoded chunk for external transcription.

pub mod driver;
pub mod recorder;
pub mod segment;

pub use driver::{SegmentedRecordingDriver, SegmentedSettings};
pub use recorder::{AudioRecorder, MockRecorder, negotiate_format};
pub use segment::{EncodedSegment, RecordingSegment};
