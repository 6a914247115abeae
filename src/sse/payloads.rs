//! SSE payload deserialization structs
//!
//! Internal structs for the `data` object of each upstream record. Enum-like
//! fields stay strings here and are classified by the parser, so an unknown
//! status never fails deserialization.

use serde::Deserialize;
use serde_json::Value;

/// Outer record: `{"type": ..., "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConversationIdPayload {
    pub conversation_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawResponsePayload {
    pub delta: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusPayload {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunItemPayload {
    pub item_type: String,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentUpdatedPayload {
    pub agent_name: String,
}
