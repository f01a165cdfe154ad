//! YouTube caption backend over HTTP.
//!
//! Fetching a transcript takes three round trips:
//!
//! 1. `GET /watch?v=<id>` to scrape the Innertube API key (accepting the EU
//!    consent interstitial once if it shows up)
//! 2. `POST /youtubei/v1/player` to read playability and the caption track list
//! 3. `GET <track baseUrl>` to download the timed-text XML
//!
//! Track selection walks the configured languages in order, preferring a
//! manually created track over an auto-generated one for each language.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::YouTubeConfig;
use crate::youtube::error::FetchError;
use crate::youtube::source::{CaptionSegment, TranscriptSource};
use crate::youtube::video_id::VideoId;

/// Default `User-Agent` sent to YouTube.
pub const DEFAULT_USER_AGENT: &str = concat!("youtube-transcript-mcp/", env!("CARGO_PKG_VERSION"));

const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

fn api_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("API key pattern is valid")
    })
}

fn consent_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"name="v" value="(.*?)""#).expect("consent pattern is valid"))
}

fn text_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("timedtext pattern is valid")
    })
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\b(start|dur)="([^"]*)""#).expect("attribute pattern is valid"))
}

fn markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"))
}

/// A caption track advertised by the player response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript source backed by youtube.com.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YouTubeClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &YouTubeConfig) -> Result<Self, FetchError> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            languages: config.languages.clone(),
        })
    }

    /// Language codes tried when picking a caption track.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Sends a request and maps error statuses.
    async fn send(request: RequestBuilder, url: &str) -> Result<Response, FetchError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::TooManyRequests);
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_watch_page(
        &self,
        video_id: &VideoId,
        consent: Option<&str>,
    ) -> Result<String, FetchError> {
        let url = format!("{}/watch", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .query(&[("v", video_id.as_str())])
            .header(ACCEPT_LANGUAGE, "en-US");
        if let Some(value) = consent {
            request = request.header(COOKIE, format!("CONSENT=YES+{value}"));
        }

        Ok(Self::send(request, &url).await?.text().await?)
    }

    /// Fetches the watch page, accepting the consent form once if needed.
    async fn fetch_watch_html(&self, video_id: &VideoId) -> Result<String, FetchError> {
        let html = self.get_watch_page(video_id, None).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::debug!(video_id = %video_id, "Consent form encountered, retrying with cookie");

        let value = consent_value_regex()
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| FetchError::malformed("consent form without a consent value"))?;

        let html = self.get_watch_page(video_id, Some(&value)).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(FetchError::malformed("failed to accept the consent form"));
        }
        Ok(html)
    }

    async fn fetch_player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<Value, FetchError> {
        let url = format!("{}/youtubei/v1/player", self.base_url);
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id.as_str(),
        });

        let request = self.http.post(&url).query(&[("key", api_key)]).json(&body);
        let text = Self::send(request, &url).await?.text().await?;

        serde_json::from_str(&text)
            .map_err(|e| FetchError::malformed(format!("invalid player response: {e}")))
    }

    async fn fetch_timedtext(&self, track: &CaptionTrack) -> Result<String, FetchError> {
        if track.base_url.contains("&exp=xpe") {
            return Err(FetchError::PoTokenRequired);
        }

        let url = track.base_url.replace("&fmt=srv3", "");
        Ok(Self::send(self.http.get(&url), &url).await?.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeClient {
    async fn fetch_captions(&self, video_id: &VideoId) -> Result<Vec<CaptionSegment>, FetchError> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html)?;

        let player = self.fetch_player_response(video_id, &api_key).await?;
        check_playability(&player)?;

        let tracks = caption_tracks(&player)?;
        let track = select_track(&tracks, &self.languages)?;

        tracing::debug!(
            video_id = %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let xml = self.fetch_timedtext(track).await?;
        Ok(parse_timedtext(&xml))
    }
}

fn extract_api_key(html: &str) -> Result<String, FetchError> {
    if let Some(key) = api_key_regex().captures(html).and_then(|caps| caps.get(1)) {
        return Ok(key.as_str().to_string());
    }
    if html.contains(RECAPTCHA_MARKER) {
        return Err(FetchError::TooManyRequests);
    }
    Err(FetchError::malformed("watch page did not contain an Innertube API key"))
}

fn check_playability(player: &Value) -> Result<(), FetchError> {
    let Some(status) = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
    else {
        return Ok(());
    };
    if status == "OK" {
        return Ok(());
    }

    let reason = player
        .pointer("/playabilityStatus/reason")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match status {
        "LOGIN_REQUIRED" if reason.starts_with("Sign in to confirm you") => {
            Err(FetchError::RequestBlocked)
        }
        "LOGIN_REQUIRED" if reason.contains("inappropriate for some users") => {
            Err(FetchError::AgeRestricted)
        }
        "ERROR" if reason == "This video is unavailable" => Err(FetchError::VideoUnavailable),
        _ => Err(FetchError::VideoUnplayable {
            reason: if reason.is_empty() {
                status.to_string()
            } else {
                reason.to_string()
            },
        }),
    }
}

fn caption_tracks(player: &Value) -> Result<Vec<CaptionTrack>, FetchError> {
    let tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .filter(|v| v.as_array().is_some_and(|a| !a.is_empty()))
        .ok_or(FetchError::TranscriptsDisabled)?;

    serde_json::from_value(tracks.clone())
        .map_err(|e| FetchError::malformed(format!("invalid caption track list: {e}")))
}

fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Result<&'a CaptionTrack, FetchError> {
    for language in languages {
        let matching = |generated: bool| {
            tracks
                .iter()
                .find(|t| t.language_code == *language && t.is_generated() == generated)
        };
        if let Some(track) = matching(false).or_else(|| matching(true)) {
            return Ok(track);
        }
    }

    Err(FetchError::NoTranscriptFound {
        requested: languages.to_vec(),
        available: tracks.iter().map(|t| t.language_code.clone()).collect(),
    })
}

/// Parses a timed-text XML document into caption segments.
///
/// Elements with no text are skipped. Entities are decoded twice because
/// YouTube escapes caption text once more on top of the XML layer; inline
/// markup such as `<i>` is stripped afterwards.
#[must_use]
pub fn parse_timedtext(xml: &str) -> Vec<CaptionSegment> {
    text_element_regex()
        .captures_iter(xml)
        .filter_map(|caps| {
            let raw = caps.get(2)?.as_str();
            if raw.is_empty() {
                return None;
            }

            let mut start = 0.0;
            let mut duration = 0.0;
            let attributes = caps.get(1).map_or("", |m| m.as_str());
            for attr in attribute_regex().captures_iter(attributes) {
                let value = attr[2].parse::<f64>().unwrap_or(0.0);
                match &attr[1] {
                    "start" => start = value,
                    _ => duration = value,
                }
            }

            let decoded = unescape_entities(&unescape_entities(raw));
            let text = markup_regex().replace_all(&decoded, "").into_owned();
            Some(CaptionSegment::new(text, start, duration))
        })
        .collect()
}

/// Decodes the XML/HTML character references YouTube emits.
///
/// Unknown or malformed references are left untouched.
fn unescape_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some((ch, consumed)) = decode_entity(tail) {
            out.push(ch);
            rest = &tail[consumed..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    out
}

/// Decodes a single reference at the start of `tail` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed.
fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let end = tail
        .char_indices()
        .take(12)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let name = &tail[1..end];

    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };

    Some((ch, end + 1))
}
