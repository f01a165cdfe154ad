//! Video identifier extraction from YouTube URLs.
//!
//! The pattern is deliberately loose about scheme, host and path so that
//! watch, share, embed and legacy `/v/` links all resolve. It is strict about
//! the identifier itself: exactly 11 characters, none of `& = % ?`, ending at
//! the end of input or at a URL delimiter.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Length of a YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

const YOUTUBE_URL_PATTERN: &str = concat!(
    r"^(https?://)?(www\.)?",
    r"(youtube|youtu|youtube-nocookie)\.(com|be)/",
    r"(watch\?v=|embed/|v/|.+\?v=)?(?P<id>[^&=%?]{11})",
    r"(?:$|[&=%?#/])",
);

fn youtube_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(YOUTUBE_URL_PATTERN).expect("YouTube URL pattern is valid"))
}

/// An 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the video identifier from a YouTube URL.
///
/// Returns `None` if the input does not look like a YouTube link or the
/// identifier is not exactly 11 characters long.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    youtube_url_regex()
        .captures(url)
        .and_then(|caps| caps.name("id"))
        .map(|m| VideoId(m.as_str().to_string()))
}
