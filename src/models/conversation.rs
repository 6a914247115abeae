use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_nullable_string, deserialize_optional_id};

pub const DEFAULT_VISIBILITY: &str = "private";
pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 50;

/// One entry of `GET {upstream}/conversations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

/// The listing endpoint returns either a bare array or a page object.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConversationsResponse {
    List(Vec<ConversationSummary>),
    Page {
        conversations: Vec<ConversationSummary>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
        #[serde(default)]
        offset: Option<u64>,
    },
}

impl ConversationsResponse {
    pub fn into_conversations(self) -> Vec<ConversationSummary> {
        match self {
            ConversationsResponse::List(list) => list,
            ConversationsResponse::Page { conversations, .. } => conversations,
        }
    }
}

/// Sidebar entry returned by `GET /api/history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryItem {
    pub id: String,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub visibility: String,
}

impl From<ConversationSummary> for HistoryItem {
    fn from(summary: ConversationSummary) -> Self {
        let title = summary.title.unwrap_or_default();
        Self {
            // Older upstreams only send a title, which doubles as the key
            id: summary
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| title.clone()),
            title,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            visibility: summary
                .visibility
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_VISIBILITY.to_string()),
        }
    }
}

/// A stored message from `GET {upstream}/chat/{id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub conversation_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    pub role: String,
    #[serde(default)]
    pub message_order: i64,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `GET /api/history/{id}`.
///
/// The upstream only returns messages, so the conversation header is derived
/// from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationHistory {
    pub conversation: HistoryItem,
    pub messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn from_messages(id: &str, messages: Vec<ChatMessage>, now: DateTime<Utc>) -> Self {
        let now = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let title = messages
            .first()
            .map(|m| m.content.chars().take(TITLE_MAX_CHARS).collect::<String>())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let created_at = messages
            .first()
            .and_then(|m| m.created_at.clone())
            .unwrap_or_else(|| now.clone());
        let updated_at = messages
            .last()
            .and_then(|m| m.created_at.clone())
            .unwrap_or(now);

        Self {
            conversation: HistoryItem {
                id: id.to_string(),
                title,
                created_at: Some(created_at),
                updated_at: Some(updated_at),
                visibility: DEFAULT_VISIBILITY.to_string(),
            },
            messages,
        }
    }
}
