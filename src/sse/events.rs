//! Upstream event types and definitions
//!
//! Contains the UpstreamEvent enum with every event variant the agent backend
//! streams, plus the line and error types used while decoding them.

use serde_json::Value;

/// Typed events from the upstream agent API.
///
/// On the wire each record is `{"type": "<tag>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEvent {
    /// Assigns or confirms the conversation identifier
    ConversationId { conversation_id: String },
    /// Incremental fragment of the assistant reply
    RawResponse { delta: String },
    /// Lifecycle and tool telemetry
    Status(StatusEvent),
    /// Tool invocation and result telemetry
    RunItem(RunItemEvent),
    /// The responding agent changed
    AgentUpdated { agent_name: String },
}

impl UpstreamEvent {
    /// Returns the wire tag of the event, for logging.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            UpstreamEvent::ConversationId { .. } => "conversation_id",
            UpstreamEvent::RawResponse { .. } => "raw_response_event",
            UpstreamEvent::Status(_) => "status_event",
            UpstreamEvent::RunItem(_) => "run_item_stream_event",
            UpstreamEvent::AgentUpdated { .. } => "agent_updated_stream_event",
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UpstreamEvent::Status(StatusEvent {
                status: StatusKind::Completed,
                ..
            })
        )
    }
}

/// Payload of a `status_event`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub status: StatusKind,
    pub message: Option<String>,
    pub tool_name: Option<String>,
    /// Structured tool arguments, when the backend sends them alongside
    /// `tool_started` instead of embedding them in `message`.
    pub arguments: Option<Value>,
}

/// Lifecycle status carried by a `status_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    ProcessingStarted,
    Completed,
    ToolStarted,
    ToolCompleted,
    AgentChanged,
    /// A status this relay does not know; ignored downstream
    Other(String),
}

impl StatusKind {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "processing_started" => StatusKind::ProcessingStarted,
            "completed" => StatusKind::Completed,
            "tool_started" => StatusKind::ToolStarted,
            "tool_completed" => StatusKind::ToolCompleted,
            "agent_changed" => StatusKind::AgentChanged,
            other => StatusKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusKind::ProcessingStarted => "processing_started",
            StatusKind::Completed => "completed",
            StatusKind::ToolStarted => "tool_started",
            StatusKind::ToolCompleted => "tool_completed",
            StatusKind::AgentChanged => "agent_changed",
            StatusKind::Other(s) => s,
        }
    }
}

/// Payload of a `run_item_stream_event`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunItemEvent {
    pub item_type: RunItemKind,
    pub tool_name: Option<String>,
    pub arguments: Option<Value>,
    pub output: Option<Value>,
    pub text: Option<String>,
}

/// Kind of run item reported by a `run_item_stream_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunItemKind {
    ToolCallItem,
    ToolCallOutputItem,
    MessageOutputItem,
    Other(String),
}

impl RunItemKind {
    pub fn from_wire(item_type: &str) -> Self {
        match item_type {
            "tool_call_item" => RunItemKind::ToolCallItem,
            "tool_call_output_item" => RunItemKind::ToolCallOutputItem,
            "message_output_item" => RunItemKind::MessageOutputItem,
            other => RunItemKind::Other(other.to_string()),
        }
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Data payload (e.g., "data: {\"type\": ...}")
    Data(String),
    /// Empty line - separates records
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Any other field line (`event:`, `id:`, `retry:`), not used by this protocol
    Field(String),
}

/// Errors that can occur while decoding one SSE record
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// The data payload is not valid JSON
    InvalidJson { source: String },
    /// Valid JSON, but the payload does not match the event type
    InvalidPayload { event_type: String, source: String },
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson { source } => {
                write!(f, "Invalid JSON in SSE record: {}", source)
            }
            SseParseError::InvalidPayload { event_type, source } => {
                write!(f, "Invalid payload for event '{}': {}", event_type, source)
            }
        }
    }
}

impl std::error::Error for SseParseError {}
