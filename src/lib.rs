//! youtube-transcript-mcp: MCP server returning plain-text YouTube transcripts
//!
//! This library exposes a single MCP tool, `get_transcript`, which takes a
//! YouTube URL and returns the video's captions flattened into one string.
//!
//! # Architecture
//!
//! - **Identifier extraction**: pull the 11-character video ID out of a URL
//! - **Transcript source**: fetch caption segments for an ID (YouTube over HTTP)
//! - **Tool handler**: validate, extract, fetch, flatten
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — MCP protocol implementation
//! - [`youtube`] — Identifier extraction, caption fetching and the tool handler

pub mod config;
pub mod error;
pub mod mcp;
pub mod youtube;
