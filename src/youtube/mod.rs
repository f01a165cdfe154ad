//! YouTube transcript retrieval.
//!
//! - [`video_id`] — pulls the 11-character ID out of watch/share/embed URLs
//! - [`source`] — the [`TranscriptSource`] seam and caption segment type
//! - [`client`] — the live youtube.com backend
//! - [`handler`] — the `get_transcript` tool logic
//! - [`error`] — fetch and tool error types

pub mod client;
pub mod error;
pub mod handler;
pub mod source;
pub mod video_id;

pub use client::YouTubeClient;
pub use error::{FetchError, TranscriptError, TranscriptResult};
pub use handler::{get_transcript, TranscriptRequest, TranscriptResponse};
pub use source::{flatten_segments, CaptionSegment, TranscriptSource};
pub use video_id::{extract_video_id, VideoId};
