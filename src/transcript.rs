//! Transcript and pending-chunk accumulators.
//!
//! Two disjoint concerns: [`TranscriptBuffer`] is the cumulative session
//! text, append-only except on reset; [`PendingChunk`] is the text since
//! the last flush, cleared atomically when a chunk is emitted.

/// Cumulative recognized text for the current session.
///
/// Appends join with exactly one space. Owned by the engine; mutated only
/// through driver effects or explicit external append.
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends finalized text, separated from any existing text by a
    /// single space. Whitespace-only input is ignored.
    ///
    /// Returns true if the buffer changed.
    pub fn append(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(trimmed);
        true
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clears the buffer. Only called on explicit reset.
    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Text accumulated since the last flush.
#[derive(Debug, Clone, Default)]
pub struct PendingChunk {
    text: String,
}

impl PendingChunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends finalized text with single-space joining, same policy as
    /// the transcript buffer.
    pub fn push(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(trimmed);
    }

    /// Takes the accumulated text and clears the accumulator.
    ///
    /// Returns `None` when nothing (or only whitespace) accumulated, so
    /// flushing an empty chunk is a no-op and never emits.
    pub fn take(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_joins_with_single_space() {
        let mut buffer = TranscriptBuffer::new();
        assert!(buffer.append("In the beginning"));
        assert!(buffer.append("was the Word"));
        assert!(buffer.append("and the Word"));
        assert_eq!(
            buffer.as_str(),
            "In the beginning was the Word and the Word"
        );
    }

    #[test]
    fn test_buffer_trims_each_append() {
        let mut buffer = TranscriptBuffer::new();
        buffer.append("  hello ");
        buffer.append(" world  ");
        assert_eq!(buffer.as_str(), "hello world");
    }

    #[test]
    fn test_buffer_ignores_whitespace_only() {
        let mut buffer = TranscriptBuffer::new();
        buffer.append("hello");
        assert!(!buffer.append("   "));
        assert!(!buffer.append(""));
        assert_eq!(buffer.as_str(), "hello");
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = TranscriptBuffer::new();
        buffer.append("some text");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_str(), "");
    }

    #[test]
    fn test_pending_chunk_take_clears() {
        let mut pending = PendingChunk::new();
        pending.push("Hello");
        pending.push("world");

        assert_eq!(pending.take(), Some("Hello world".to_string()));
        assert!(pending.is_empty());
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_pending_chunk_empty_take_is_none() {
        let mut pending = PendingChunk::new();
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_pending_chunk_whitespace_take_is_none() {
        let mut pending = PendingChunk::new();
        pending.push("   ");
        assert_eq!(pending.take(), None);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pending_chunk_disjoint_from_buffer() {
        let mut buffer = TranscriptBuffer::new();
        let mut pending = PendingChunk::new();

        buffer.append("first");
        pending.push("first");
        pending.take();

        buffer.append("second");
        pending.push("second");

        // Buffer never shrinks on flush
        assert_eq!(buffer.as_str(), "first second");
        assert_eq!(pending.as_str(), "second");
    }
}
