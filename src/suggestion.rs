//! Typed boundary for the remote suggestion service.
//!
//! The engine never calls the service itself; it only hands off chunks
//! through its events. These types define what the relaying caller sends
//! and what it must accept back, with malformed payloads rejected at
//! parse time instead of surfacing as absent fields downstream.

use crate::error::{CaptureError, Result};
use crate::event::CaptureEvent;
use serde::{Deserialize, Serialize};

/// The chunk content of a suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkPayload {
    /// A transcript chunk from continuous-recognition mode.
    Text { text: String },
    /// An encoded audio chunk from segmented-recording mode, transcribed
    /// by the service itself.
    Audio {
        base64: String,
        mime_type: Option<String>,
    },
}

/// Whether the speaker is preparing material or delivering it live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Preparation,
    Live,
}

/// One request to the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Current lesson or talk topic, opaque to the engine.
    pub topic: String,
    pub mode: DeliveryMode,
    pub payload: ChunkPayload,
}

impl SuggestionRequest {
    /// Builds a request from a chunk event. Returns `None` for events
    /// that carry no chunk.
    pub fn from_event(topic: &str, mode: DeliveryMode, event: &CaptureEvent) -> Option<Self> {
        let payload = match event {
            CaptureEvent::ChunkReady { text } => ChunkPayload::Text { text: text.clone() },
            CaptureEvent::AudioChunkReady { base64, mime_type } => ChunkPayload::Audio {
                base64: base64.clone(),
                mime_type: mime_type.clone(),
            },
            _ => return None,
        };
        Some(Self {
            topic: topic.to_string(),
            mode,
            payload,
        })
    }
}

/// Category of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Insight,
    Scripture,
    Illustration,
    Question,
    Application,
}

/// A structured suggestion returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Suggestion {
    /// Parses a service response, rejecting unknown kinds, missing fields
    /// and empty suggestion text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let suggestion: Suggestion =
            serde_json::from_str(raw).map_err(|e| CaptureError::MalformedSuggestion {
                message: e.to_string(),
            })?;
        if suggestion.suggestion.trim().is_empty() {
            return Err(CaptureError::MalformedSuggestion {
                message: "empty suggestion text".to_string(),
            });
        }
        Ok(suggestion)
    }
}
