use serde::{Deserialize, Serialize};

use super::deserialize_nullable_string;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Conversation id; absent or empty for a new conversation
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ClientMessage>,
}

impl ChatRequest {
    /// The turn to send upstream: the last message, if it was written by
    /// the user.
    pub fn last_user_message(&self) -> Option<&ClientMessage> {
        self.messages.last().filter(|m| m.is_user())
    }

    /// Conversation id, with an empty string treated as absent.
    pub fn conversation_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// One message of the browser-side history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    pub role: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
}

impl ClientMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Body of `POST {upstream}/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamChatRequest {
    pub message: String,
    /// Omitted for a new conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl UpstreamChatRequest {
    pub fn new(message: impl Into<String>, conversation_id: Option<&str>) -> Self {
        Self {
            message: message.into(),
            conversation_id: conversation_id
                .filter(|id| !id.is_empty())
                .map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_user_message() {
        let request: ChatRequest = serde_json::from_value(json!({
            "id": "c-1",
            "messages": [
                {"role": "assistant", "content": "Hi"},
                {"role": "user", "content": "Find widgets"}
            ]
        }))
        .unwrap();
        assert_eq!(request.last_user_message().unwrap().content, "Find widgets");
        assert_eq!(request.conversation_id(), Some("c-1"));
    }

    #[test]
    fn test_last_message_from_assistant_is_rejected() {
        let request = ChatRequest {
            id: None,
            messages: vec![
                ClientMessage::user("a"),
                ClientMessage {
                    role: "assistant".to_string(),
                    content: "b".to_string(),
                },
            ],
        };
        assert!(request.last_user_message().is_none());
    }

    #[test]
    fn test_empty_request() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.last_user_message().is_none());
        assert!(request.conversation_id().is_none());
    }

    #[test]
    fn test_upstream_request_omits_empty_conversation_id() {
        let body = serde_json::to_value(UpstreamChatRequest::new("hi", Some(""))).unwrap();
        assert_eq!(body, json!({"message": "hi"}));

        let body = serde_json::to_value(UpstreamChatRequest::new("hi", Some("c-9"))).unwrap();
        assert_eq!(body, json!({"message": "hi", "conversation_id": "c-9"}));
    }
}
