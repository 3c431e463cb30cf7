//! Segment accumulation and encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// An in-progress accumulation of raw audio sub-buffers.
///
/// Owned by the segmented recording driver; converted to an encoded chunk
/// and cleared when the segment closes. The negotiated container format is
/// fixed for the session and carried across segments.
#[derive(Debug, Default)]
pub struct RecordingSegment {
    parts: Vec<Vec<u8>>,
    mime_type: Option<String>,
}

/// A closed segment, base64-encoded and tagged with its format.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSegment {
    pub base64: String,
    pub mime_type: Option<String>,
}

impl RecordingSegment {
    pub fn new(mime_type: Option<String>) -> Self {
        Self {
            parts: Vec::new(),
            mime_type,
        }
    }

    /// Appends one raw sub-buffer. Empty sub-buffers are ignored.
    pub fn push(&mut self, part: Vec<u8>) {
        if !part.is_empty() {
            self.parts.push(part);
        }
    }

    /// Total accumulated bytes across all sub-buffers.
    pub fn byte_len(&self) -> usize {
        self.parts.iter().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Closes the segment: concatenates all sub-buffers, base64-encodes
    /// the result (standard alphabet, no data-URI prefix) and clears the
    /// accumulator. A segment with no data returns `None`.
    pub fn close(&mut self) -> Option<EncodedSegment> {
        if self.parts.is_empty() {
            return None;
        }

        let total = self.byte_len();
        let mut combined = Vec::with_capacity(total);
        for part in self.parts.drain(..) {
            combined.extend_from_slice(&part);
        }

        Some(EncodedSegment {
            base64: BASE64.encode(&combined),
            mime_type: self.mime_type.clone(),
        })
    }
}
