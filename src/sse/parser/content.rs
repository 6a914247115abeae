//! Conversation, text and agent event parsers

use serde_json::Value;

use super::decode_payload;
use crate::sse::events::{SseParseError, UpstreamEvent};
use crate::sse::payloads::{AgentUpdatedPayload, ConversationIdPayload, RawResponsePayload};

/// Parse conversation_id event
pub(super) fn parse_conversation_id_event(
    event_type: &str,
    data: Value,
) -> Result<UpstreamEvent, SseParseError> {
    let payload: ConversationIdPayload = decode_payload(event_type, data)?;
    Ok(UpstreamEvent::ConversationId {
        conversation_id: payload.conversation_id,
    })
}

/// Parse raw_response_event; the delta is kept verbatim
pub(super) fn parse_raw_response_event(
    event_type: &str,
    data: Value,
) -> Result<UpstreamEvent, SseParseError> {
    let payload: RawResponsePayload = decode_payload(event_type, data)?;
    Ok(UpstreamEvent::RawResponse {
        delta: payload.delta,
    })
}

/// Parse agent_updated_stream_event
pub(super) fn parse_agent_updated_event(
    event_type: &str,
    data: Value,
) -> Result<UpstreamEvent, SseParseError> {
    let payload: AgentUpdatedPayload = decode_payload(event_type, data)?;
    Ok(UpstreamEvent::AgentUpdated {
        agent_name: payload.agent_name,
    })
}
