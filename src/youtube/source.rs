//! The transcript source seam.
//!
//! [`TranscriptSource`] is the single capability the tool handler needs from
//! the outside world: given a video ID, hand back its caption segments. The
//! live implementation is [`crate::youtube::YouTubeClient`]; tests supply
//! in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::youtube::error::FetchError;
use crate::youtube::video_id::VideoId;

/// One timed unit of caption text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Caption text, already unescaped.
    pub text: String,
    /// Start offset in seconds.
    #[serde(default)]
    pub start: f64,
    /// Display duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl CaptionSegment {
    /// Creates a segment.
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// A backend that can fetch caption segments for a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetches the caption segments for `video_id`, in playback order.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the video has no usable transcript or the
    /// backend cannot be reached.
    async fn fetch_captions(&self, video_id: &VideoId) -> Result<Vec<CaptionSegment>, FetchError>;
}

/// Joins segment texts into a single transcript, dropping timing.
///
/// Every segment is followed by one space, so a non-empty transcript always
/// ends with a trailing space.
#[must_use]
pub fn flatten_segments(segments: &[CaptionSegment]) -> String {
    let capacity = segments.iter().map(|s| s.text.len() + 1).sum();
    let mut transcript = String::with_capacity(capacity);
    for segment in segments {
        transcript.push_str(&segment.text);
        transcript.push(' ');
    }
    transcript
}
