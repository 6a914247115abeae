//! Downstream frame types.
//!
//! Every frame is one line `<tag>:<json>\n`. The browser's renderer only
//! knows three tags:
//! - `0` - text delta, payload is a JSON string
//! - `2` - data array, payload is a JSON array of data items
//! - `d` - finish marker

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feedback::ToolFeedback;

pub const TEXT_TAG: char = '0';
pub const DATA_TAG: char = '2';
pub const FINISH_TAG: char = 'd';

/// One downstream frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DownstreamFrame {
    TextDelta(String),
    Data(Vec<DataItem>),
    Finish(FinishPayload),
}

impl DownstreamFrame {
    /// Data frame holding a single item, which is all the encoder ever writes.
    pub fn data(item: DataItem) -> Self {
        DownstreamFrame::Data(vec![item])
    }

    pub fn finish() -> Self {
        DownstreamFrame::Finish(FinishPayload::stop())
    }

    pub fn tag(&self) -> char {
        match self {
            DownstreamFrame::TextDelta(_) => TEXT_TAG,
            DownstreamFrame::Data(_) => DATA_TAG,
            DownstreamFrame::Finish(_) => FINISH_TAG,
        }
    }

    /// Serialize to a complete line, newline included.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let payload = match self {
            DownstreamFrame::TextDelta(text) => serde_json::to_string(text)?,
            DownstreamFrame::Data(items) => serde_json::to_string(items)?,
            DownstreamFrame::Finish(finish) => serde_json::to_string(finish)?,
        };
        Ok(format!("{}:{}\n", self.tag(), payload))
    }

    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        self.to_line().map(Bytes::from)
    }

    /// Parse one line (without its terminator) back into a frame.
    pub fn parse_line(line: &str) -> Result<Self, FrameParseError> {
        let (tag, payload) = line
            .split_once(':')
            .ok_or(FrameParseError::MissingSeparator)?;

        let invalid = |e: serde_json::Error| FrameParseError::InvalidPayload {
            tag: tag.to_string(),
            source: e.to_string(),
        };

        match tag {
            "0" => serde_json::from_str(payload)
                .map(DownstreamFrame::TextDelta)
                .map_err(invalid),
            "2" => serde_json::from_str(payload)
                .map(DownstreamFrame::Data)
                .map_err(invalid),
            "d" => serde_json::from_str(payload)
                .map(DownstreamFrame::Finish)
                .map_err(invalid),
            other => Err(FrameParseError::UnknownTag(other.to_string())),
        }
    }
}

/// One element of a `2:` data array.
///
/// Variants are tried in order when parsing; anything unrecognized is kept
/// as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataItem {
    ConversationId { conversation_id: String },
    Agent { agent: AgentInfo },
    Feedback { feedback: ToolFeedback },
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
}

/// Payload of the `d:` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishPayload {
    pub finish_reason: String,
    pub usage: Usage,
}

impl FinishPayload {
    /// The relay never learns token counts, so usage is always zero.
    pub fn stop() -> Self {
        Self {
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Errors from parsing a downstream line
#[derive(Debug, Clone, PartialEq)]
pub enum FrameParseError {
    /// No `:` between tag and payload
    MissingSeparator,
    /// Tag is not one of `0`, `2`, `d`
    UnknownTag(String),
    /// Payload is not valid JSON for its tag
    InvalidPayload { tag: String, source: String },
}

impl std::fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameParseError::MissingSeparator => write!(f, "Frame has no tag separator"),
            FrameParseError::UnknownTag(tag) => write!(f, "Unknown frame tag '{}'", tag),
            FrameParseError::InvalidPayload { tag, source } => {
                write!(f, "Invalid payload for frame '{}': {}", tag, source)
            }
        }
    }
}

impl std::error::Error for FrameParseError {}
