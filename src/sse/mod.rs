//! Upstream SSE decoding
//!
//! The agent backend streams newline-delimited records:
//! - `data: <json>` - one event, `{"type": ..., "data": {...}}`
//! - Empty line - record separator
//! - Lines starting with `:` - comments (ignored)
//!
//! Records can be split across network chunks at any byte, so decoding keeps
//! a carry-over buffer and only parses complete lines.
//!
//! # Module structure
//! - `events` - Event type definitions (UpstreamEvent, SseLine, SseParseError)
//! - `payloads` - Internal payload deserialization structs
//! - `parser` - Line classification and record parsing
//! - `lines` - Chunk-to-line reassembly
//! - `decoder` - Stateful per-stream decoder and the lazy event stream

mod decoder;
mod events;
mod lines;
mod parser;
mod payloads;

// Re-export public types
pub use decoder::{decode_stream, SseDecoder};
pub use events::{
    RunItemEvent, RunItemKind, SseLine, SseParseError, StatusEvent, StatusKind, UpstreamEvent,
};
pub use lines::LineBuffer;
pub use parser::{parse_sse_line, parse_upstream_event, DATA_PREFIX};
