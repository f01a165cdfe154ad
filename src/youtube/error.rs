//! Error types for transcript fetching and the `get_transcript` tool.

use thiserror::Error;

/// Result type for transcript tool operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Failures reported by a transcript source.
///
/// Variants split into two classes: the video simply has no transcript to
/// give ([`FetchError::is_unavailable`]), or talking to the backend failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The video does not exist or was removed.
    #[error("The video is no longer available")]
    VideoUnavailable,

    /// The video exists but cannot be played.
    #[error("The video is unplayable: {reason}")]
    VideoUnplayable {
        /// Reason reported by the backend.
        reason: String,
    },

    /// The video is age restricted and needs a signed-in session.
    #[error("The video is age restricted")]
    AgeRestricted,

    /// Subtitles are disabled for this video.
    #[error("Subtitles are disabled for this video")]
    TranscriptsDisabled,

    /// No track exists for any of the requested languages.
    #[error(
        "No transcript found for languages [{}] (available: [{}])",
        .requested.join(", "),
        .available.join(", ")
    )]
    NoTranscriptFound {
        /// Language codes that were tried.
        requested: Vec<String>,
        /// Language codes the video offers.
        available: Vec<String>,
    },

    /// The backend refused the request (bot check).
    #[error("YouTube is blocking requests from this IP")]
    RequestBlocked,

    /// The backend rate limited the request.
    #[error("YouTube rate limited the request (too many requests)")]
    TooManyRequests,

    /// The caption track requires a proof-of-origin token.
    #[error("The caption track requires a PO token")]
    PoTokenRequired,

    /// The backend answered with an unexpected HTTP status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The backend response could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns `true` if the video has no transcript to return, as opposed
    /// to a failure talking to the backend.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::VideoUnavailable
                | Self::VideoUnplayable { .. }
                | Self::AgeRestricted
                | Self::TranscriptsDisabled
                | Self::NoTranscriptFound { .. }
        )
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Errors surfaced by the `get_transcript` tool.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// The caller supplied a missing or unusable URL.
    #[error("{0}")]
    InvalidInput(String),

    /// The video has no transcript to return.
    #[error("No transcript available for video {video_id}: {source}")]
    TranscriptUnavailable {
        /// Extracted video identifier.
        video_id: String,
        /// Underlying source error.
        #[source]
        source: FetchError,
    },

    /// Communication with the transcript backend failed.
    #[error("Transcript service error for video {video_id}: {source}")]
    ServiceError {
        /// Extracted video identifier.
        video_id: String,
        /// Underlying source error.
        #[source]
        source: FetchError,
    },
}

impl TranscriptError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Classifies a source failure for the given video.
    pub fn from_fetch(video_id: impl Into<String>, source: FetchError) -> Self {
        let video_id = video_id.into();
        if source.is_unavailable() {
            Self::TranscriptUnavailable { video_id, source }
        } else {
            Self::ServiceError { video_id, source }
        }
    }

    /// Stable machine-readable name of the error class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::TranscriptUnavailable { .. } => "transcript_unavailable",
            Self::ServiceError { .. } => "service_error",
        }
    }
}
