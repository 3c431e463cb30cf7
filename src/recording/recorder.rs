use crate::error::{CaptureError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Handle to a raw microphone recorder.
///
/// Acquisition and release bracket the session: `acquire` suspends until
/// the user grants or denies permission, and every acquired track must be
/// freed by `release` on every exit path. Recorded data flows back to the
/// driver through the host, not through this trait.
#[async_trait]
pub trait AudioRecorder: Send {
    /// Requests microphone access. Suspends until the user answers the
    /// permission prompt.
    async fn acquire(&mut self) -> Result<()>;

    /// Begins recording a new segment with the given container format,
    /// or the platform default when `None`.
    fn begin_segment(&mut self, mime_type: Option<&str>) -> Result<()>;

    /// Stops the active recording, finalizing the current segment. Safe
    /// to call when not recording.
    fn end_segment(&mut self);

    /// Releases all acquired audio-input resources. Safe to call when
    /// never acquired and safe to call twice.
    fn release(&mut self);

    /// Whether the platform can record in the given container format.
    fn is_format_supported(&self, mime_type: &str) -> bool;
}

/// Picks the first supported entry of the ordered preference list, or
/// `None` when nothing on the list is supported.
pub fn negotiate_format(recorder: &dyn AudioRecorder, preferences: &[String]) -> Option<String> {
    preferences
        .iter()
        .find(|m| recorder.is_format_supported(m))
        .cloned()
}

#[derive(Debug, Default)]
struct MockRecorderState {
    acquired: bool,
    recording: bool,
    deny_permission: bool,
    fail_begin: bool,
    supported_formats: Vec<String>,
    acquire_calls: u32,
    begin_calls: u32,
    end_calls: u32,
    release_calls: u32,
    last_mime_type: Option<Option<String>>,
}

/// Mock recorder for driver and engine tests.
///
/// Clones share state so a test can keep a handle for inspection while
/// the driver owns the boxed instance.
#[derive(Debug, Clone, Default)]
pub struct MockRecorder {
    state: Arc<Mutex<MockRecorderState>>,
}

impl MockRecorder {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.lock().supported_formats = vec!["audio/webm".to_string()];
        mock
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockRecorderState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure `acquire` to fail as a permission denial.
    pub fn with_permission_denied(self) -> Self {
        self.lock().deny_permission = true;
        self
    }

    /// Configure `begin_segment` to fail.
    pub fn with_begin_failure(self) -> Self {
        self.lock().fail_begin = true;
        self
    }

    /// Flip `begin_segment` failure mid-test on a shared handle.
    pub fn set_begin_failure(&self, fail: bool) {
        self.lock().fail_begin = fail;
    }

    /// Configure which container formats the mock supports.
    pub fn with_supported_formats(self, formats: &[&str]) -> Self {
        self.lock().supported_formats = formats.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn is_acquired(&self) -> bool {
        self.lock().acquired
    }

    pub fn is_recording(&self) -> bool {
        self.lock().recording
    }

    pub fn begin_calls(&self) -> u32 {
        self.lock().begin_calls
    }

    pub fn end_calls(&self) -> u32 {
        self.lock().end_calls
    }

    pub fn release_calls(&self) -> u32 {
        self.lock().release_calls
    }

    /// Format passed to the most recent `begin_segment`.
    pub fn last_mime_type(&self) -> Option<Option<String>> {
        self.lock().last_mime_type.clone()
    }
}

#[async_trait]
impl AudioRecorder for MockRecorder {
    async fn acquire(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.acquire_calls += 1;
        if state.deny_permission {
            return Err(CaptureError::PermissionDenied {
                message: "user denied microphone access".to_string(),
            });
        }
        state.acquired = true;
        Ok(())
    }

    fn begin_segment(&mut self, mime_type: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.begin_calls += 1;
        state.last_mime_type = Some(mime_type.map(|s| s.to_string()));
        if state.fail_begin {
            return Err(CaptureError::Recorder {
                message: "mock recorder failed to begin".to_string(),
            });
        }
        if !state.acquired {
            return Err(CaptureError::Recorder {
                message: "begin_segment called before acquire".to_string(),
            });
        }
        state.recording = true;
        Ok(())
    }

    fn end_segment(&mut self) {
        let mut state = self.lock();
        state.end_calls += 1;
        state.recording = false;
    }

    fn release(&mut self) {
        let mut state = self.lock();
        state.release_calls += 1;
        state.acquired = false;
        state.recording = false;
    }

    fn is_format_supported(&self, mime_type: &str) -> bool {
        self.lock()
            .supported_formats
            .iter()
            .any(|m| m == mime_type)
    }
}
