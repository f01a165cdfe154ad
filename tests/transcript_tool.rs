//! Tests for the `get_transcript` tool handler.
//!
//! The transcript backend is replaced by in-memory fakes so that the
//! extraction, error classification and flattening logic can be checked
//! without network access.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use youtube_transcript_mcp::youtube::{
    get_transcript, CaptionSegment, FetchError, TranscriptError, TranscriptRequest,
    TranscriptSource, VideoId,
};

/// Returns fixed segments and counts calls.
struct FixedSource {
    segments: Vec<CaptionSegment>,
    calls: AtomicUsize,
}

impl FixedSource {
    fn new(texts: &[&str]) -> Self {
        Self {
            segments: texts
                .iter()
                .enumerate()
                .map(|(i, text)| CaptionSegment::new(*text, f64::from(u32::try_from(i).unwrap()), 1.0))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptSource for FixedSource {
    async fn fetch_captions(&self, _video_id: &VideoId) -> Result<Vec<CaptionSegment>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.segments.clone())
    }
}

/// Fails every fetch with the error produced by `make`.
struct FailingSource {
    make: fn() -> FetchError,
}

#[async_trait]
impl TranscriptSource for FailingSource {
    async fn fetch_captions(&self, _video_id: &VideoId) -> Result<Vec<CaptionSegment>, FetchError> {
        Err((self.make)())
    }
}

/// Panics if called; proves validation happens before any fetch.
struct UnreachableSource;

#[async_trait]
impl TranscriptSource for UnreachableSource {
    async fn fetch_captions(&self, video_id: &VideoId) -> Result<Vec<CaptionSegment>, FetchError> {
        panic!("source must not be called (video {video_id})");
    }
}

// =============================================================================
// Input validation
// =============================================================================

#[tokio::test]
async fn empty_url_is_required() {
    let err = get_transcript(&UnreachableSource, &TranscriptRequest::new(""))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::InvalidInput(_)));
    assert_eq!(err.to_string(), "URL is required");
}

#[tokio::test]
async fn missing_url_is_required() {
    let err = get_transcript(&UnreachableSource, &TranscriptRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::InvalidInput(_)));
    assert_eq!(err.to_string(), "URL is required");
}

#[tokio::test]
async fn unrelated_string_is_invalid_url() {
    let err = get_transcript(&UnreachableSource, &TranscriptRequest::new("not a url"))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::InvalidInput(_)));
    assert_eq!(err.to_string(), "Invalid YouTube URL");
    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn wrong_length_identifier_is_invalid_url() {
    for url in [
        "https://www.youtube.com/watch?v=dQw4w9WgXc",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQQ",
    ] {
        let err = get_transcript(&UnreachableSource, &TranscriptRequest::new(url))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid YouTube URL", "{url}");
    }
}

// =============================================================================
// Successful fetches
// =============================================================================

#[tokio::test]
async fn segments_are_space_joined_in_order() {
    let source = FixedSource::new(&["never", "gonna", "give"]);

    let response = get_transcript(
        &source,
        &TranscriptRequest::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
    )
    .await
    .unwrap();

    assert_eq!(response.video_id, "dQw4w9WgXcQ");
    assert_eq!(response.transcript, "never gonna give ");
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn every_accepted_shape_reaches_the_source() {
    let source = FixedSource::new(&["hello"]);

    for url in [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
    ] {
        let response = get_transcript(&source, &TranscriptRequest::new(url))
            .await
            .unwrap();
        assert_eq!(response.video_id, "dQw4w9WgXcQ", "{url}");
    }

    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn video_without_segments_yields_empty_transcript() {
    let source = FixedSource::new(&[]);

    let response = get_transcript(&source, &TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"))
        .await
        .unwrap();

    assert_eq!(response.transcript, "");
}

#[tokio::test]
async fn repeated_calls_are_identical_and_uncached() {
    let source = FixedSource::new(&["never", "gonna", "give"]);
    let request = TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ");

    let first = get_transcript(&source, &request).await.unwrap();
    let second = get_transcript(&source, &request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.calls(), 2, "each call must hit the source");
}

#[tokio::test]
async fn response_serialises_to_two_fields() {
    let source = FixedSource::new(&["never", "gonna", "give"]);
    let response = get_transcript(&source, &TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"))
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"video_id": "dQw4w9WgXcQ", "transcript": "never gonna give "})
    );
}

// =============================================================================
// Source failures
// =============================================================================

#[tokio::test]
async fn no_transcript_is_unavailable_not_invalid_input() {
    let source = FailingSource {
        make: || FetchError::NoTranscriptFound {
            requested: vec!["en".to_string()],
            available: vec!["de".to_string()],
        },
    };

    let err = get_transcript(&source, &TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"))
        .await
        .unwrap_err();

    match err {
        TranscriptError::TranscriptUnavailable { ref video_id, .. } => {
            assert_eq!(video_id, "dQw4w9WgXcQ");
        }
        other => panic!("Expected TranscriptUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn disabled_and_missing_videos_are_unavailable() {
    for make in [
        (|| FetchError::TranscriptsDisabled) as fn() -> FetchError,
        || FetchError::VideoUnavailable,
        || FetchError::AgeRestricted,
    ] {
        let err = get_transcript(
            &FailingSource { make },
            &TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "transcript_unavailable", "{err}");
    }
}

#[tokio::test]
async fn transport_failures_are_service_errors() {
    for make in [
        (|| FetchError::TooManyRequests) as fn() -> FetchError,
        || FetchError::RequestBlocked,
        || FetchError::UnexpectedStatus {
            status: 503,
            url: "https://www.youtube.com/watch".to_string(),
        },
    ] {
        let err = get_transcript(
            &FailingSource { make },
            &TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"),
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, TranscriptError::ServiceError { .. }),
            "{err:?}"
        );
    }
}
