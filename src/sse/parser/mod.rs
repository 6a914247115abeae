//! SSE record parsing logic
//!
//! Classifies raw lines and turns a `data:` payload into a typed
//! [`UpstreamEvent`]. Each event family has its own submodule.

mod content;
mod tools;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::sse::events::{SseLine, SseParseError, UpstreamEvent};
use crate::sse::payloads::Envelope;

use content::{
    parse_agent_updated_event, parse_conversation_id_event, parse_raw_response_event,
};
use tools::{parse_run_item_event, parse_status_event};

/// Prefix that marks a record line. Lines without it are ignored.
pub const DATA_PREFIX: &str = "data: ";

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(payload.to_string());
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    SseLine::Field(line.to_string())
}

/// Parse the JSON payload of one `data:` line.
///
/// Returns:
/// - `Ok(Some(event))` - a recognized event
/// - `Ok(None)` - valid JSON with no or an unknown `type`
/// - `Err(error)` - malformed JSON or a payload that does not fit its type
pub fn parse_upstream_event(data: &str) -> Result<Option<UpstreamEvent>, SseParseError> {
    let envelope: Envelope = serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
        source: e.to_string(),
    })?;

    let Some(event_type) = envelope.event_type else {
        return Ok(None);
    };

    let event = match event_type.as_str() {
        "conversation_id" => parse_conversation_id_event(&event_type, envelope.data)?,
        "raw_response_event" => parse_raw_response_event(&event_type, envelope.data)?,
        "status_event" => parse_status_event(&event_type, envelope.data)?,
        "run_item_stream_event" => parse_run_item_event(&event_type, envelope.data)?,
        "agent_updated_stream_event" => parse_agent_updated_event(&event_type, envelope.data)?,
        // Unknown events are ignored rather than treated as errors
        _ => return Ok(None),
    };

    Ok(Some(event))
}

/// Deserialize the `data` object of a record into its payload struct.
fn decode_payload<T: DeserializeOwned>(event_type: &str, data: Value) -> Result<T, SseParseError> {
    serde_json::from_value(data).map_err(|e| SseParseError::InvalidPayload {
        event_type: event_type.to_string(),
        source: e.to_string(),
    })
}
