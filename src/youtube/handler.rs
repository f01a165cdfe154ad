//! The `get_transcript` tool handler.
//!
//! Validate the URL, extract the video ID, fetch captions, flatten them.
//! Nothing is cached and nothing is retried; every call goes to the source.

use serde::{Deserialize, Serialize};

use crate::youtube::error::{TranscriptError, TranscriptResult};
use crate::youtube::source::{flatten_segments, TranscriptSource};
use crate::youtube::video_id::extract_video_id;

/// Arguments of the `get_transcript` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptRequest {
    /// A YouTube watch, share, embed or legacy URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl TranscriptRequest {
    /// Creates a request for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Result of the `get_transcript` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    /// The 11-character video ID.
    pub video_id: String,
    /// Caption text with timing removed.
    pub transcript: String,
}

/// Fetches the plain-text transcript for the video `request.url` points at.
///
/// # Errors
///
/// - [`TranscriptError::InvalidInput`] if the URL is missing, empty or not a
///   recognisable YouTube link
/// - [`TranscriptError::TranscriptUnavailable`] if the video has no transcript
/// - [`TranscriptError::ServiceError`] if the backend could not be reached
pub async fn get_transcript(
    source: &dyn TranscriptSource,
    request: &TranscriptRequest,
) -> TranscriptResult<TranscriptResponse> {
    let url = match request.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return Err(TranscriptError::invalid_input("URL is required")),
    };

    let Some(video_id) = extract_video_id(url) else {
        tracing::debug!(url, "No video ID in URL");
        return Err(TranscriptError::invalid_input("Invalid YouTube URL"));
    };

    tracing::debug!(video_id = %video_id, "Fetching captions");

    let segments = source.fetch_captions(&video_id).await.map_err(|e| {
        let err = TranscriptError::from_fetch(video_id.as_str(), e);
        tracing::warn!(video_id = %video_id, kind = err.kind(), error = %err, "Transcript fetch failed");
        err
    })?;

    tracing::info!(
        video_id = %video_id,
        segments = segments.len(),
        "Transcript fetched"
    );

    Ok(TranscriptResponse {
        transcript: flatten_segments(&segments),
        video_id: video_id.into_string(),
    })
}
