//! Continuous recognition capture strategy.
//!
//! A native streaming recognizer runs continuously with interim results;
//! the driver normalizes its events into the shared chunk and transcript
//! model and restarts it transparently when it terminates on its own.

pub mod driver;
pub mod recognizer;

pub use driver::{ContinuousRecognitionDriver, ContinuousSettings};
pub use recognizer::{
    MockRecognizer, RecognizedSegment, RecognizerConfig, RecognizerErrorKind, RecognizerEvent,
    SpeechRecognizer,
};
