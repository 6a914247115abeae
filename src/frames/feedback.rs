//! Tool feedback items carried in `2:` data frames.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Captures the argument text embedded in a `tool_started` message.
static TOOL_ARGS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Tool arguments: "(.*?)""#).expect("Invalid regex"));

pub const UNKNOWN_TOOL: &str = "unknown";
pub const START_LABEL: &str = "🔧 ";
pub const END_MESSAGE: &str = "✨ Tool operation complete";
pub const CALL_MESSAGE: &str = "📋 Tool call arguments";
pub const RESULT_MESSAGE: &str = "📤 Tool output";

/// Lifecycle step of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolAction {
    Start,
    Call,
    End,
    Result,
}

impl ToolAction {
    /// `start` and `call` open an invocation.
    pub fn is_opening(&self) -> bool {
        matches!(self, ToolAction::Start | ToolAction::Call)
    }

    /// `end` and `result` close one.
    pub fn is_closing(&self) -> bool {
        !self.is_opening()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    #[serde(rename = "tool_status")]
    ToolStatus,
}

/// `{"type":"tool_status","action":...,"message":...,"tool":...}`
///
/// `args` is only present on `start` and `call`, `output` only on `result`.
/// `Some(Value::Null)` serializes as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFeedback {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub action: ToolAction,
    pub message: String,
    pub tool: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub args: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub output: Option<Value>,
}

/// A field that is present deserializes to `Some`, even when it is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl ToolFeedback {
    fn new(action: ToolAction, message: String, tool: Option<&str>) -> Self {
        Self {
            kind: FeedbackKind::ToolStatus,
            action,
            message,
            tool: tool_or_unknown(tool),
            args: None,
            output: None,
        }
    }

    /// Feedback for `status_event` / `tool_started`.
    ///
    /// Structured `arguments` win over anything embedded in the message.
    pub fn started(message: Option<&str>, tool: Option<&str>, arguments: Option<&Value>) -> Self {
        let message = message.unwrap_or_default();
        let label = message.split('"').next().unwrap_or_default();
        let args = match arguments {
            Some(value) => value.clone(),
            None => extract_tool_args(message),
        };

        Self {
            args: Some(args),
            ..Self::new(ToolAction::Start, format!("{}{}", START_LABEL, label), tool)
        }
    }

    /// Feedback for `status_event` / `tool_completed`.
    pub fn completed(tool: Option<&str>) -> Self {
        Self::new(ToolAction::End, END_MESSAGE.to_string(), tool)
    }

    /// Feedback for `run_item_stream_event` / `tool_call_item`.
    pub fn called(tool: Option<&str>, arguments: Option<&Value>) -> Self {
        Self {
            args: Some(call_arguments(arguments)),
            ..Self::new(ToolAction::Call, CALL_MESSAGE.to_string(), tool)
        }
    }

    /// Feedback for `run_item_stream_event` / `tool_call_output_item`.
    pub fn output(tool: Option<&str>, output: Option<&Value>) -> Self {
        let output = output.filter(|v| is_truthy(v)).cloned().unwrap_or(Value::Null);
        Self {
            output: Some(output),
            ..Self::new(ToolAction::Result, RESULT_MESSAGE.to_string(), tool)
        }
    }
}

fn tool_or_unknown(tool: Option<&str>) -> String {
    match tool {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_TOOL.to_string(),
    }
}

/// Pull `Tool arguments: "<text>"` out of a status message.
///
/// The captured text is parsed as JSON; text that is not valid JSON is kept
/// as a string. No match, or an empty capture, gives `null`.
pub fn extract_tool_args(message: &str) -> Value {
    let Some(captured) = TOOL_ARGS_REGEX
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
    else {
        return Value::Null;
    };

    serde_json::from_str(captured).unwrap_or_else(|_| Value::String(captured.to_string()))
}

/// Arguments of a tool call item arrive as a JSON-encoded string.
fn call_arguments(arguments: Option<&Value>) -> Value {
    match arguments {
        Some(Value::String(raw)) if raw.is_empty() => Value::Null,
        Some(Value::String(raw)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
