//! Request and response payloads.
//!
//! - `request` - what the browser posts to the chat endpoint, and what the
//!   relay posts upstream
//! - `conversation` - conversation listings and per-conversation history

mod conversation;
mod request;

pub use conversation::{
    ChatMessage, ConversationHistory, ConversationSummary, ConversationsResponse, HistoryItem,
    DEFAULT_TITLE, DEFAULT_VISIBILITY,
};
pub use request::{ChatRequest, ClientMessage, UpstreamChatRequest};

use serde::{Deserialize, Deserializer};

/// Helper to deserialize an optional id given as either string or integer
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// Helper to deserialize nullable strings as empty string
/// Handles both missing fields and explicit null values
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}
