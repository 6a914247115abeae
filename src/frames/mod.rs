//! Downstream data-stream frames
//!
//! The browser consumes a line-oriented stream where each line is
//! `<tag>:<json>`. This module defines the frame types, the tool feedback
//! payload, and the mapping from upstream events to frames.
//!
//! # Module structure
//! - `frame` - Frame and data item types, line serialization and parsing
//! - `feedback` - Tool feedback items and their message conventions
//! - `encoder` - Upstream event mapping and the sink-backed encoder

mod encoder;
mod feedback;
mod frame;

pub use encoder::{encode_event, Encoded, Flow, FrameEncoder};
pub use feedback::{extract_tool_args, FeedbackKind, ToolAction, ToolFeedback, UNKNOWN_TOOL};
pub use frame::{
    AgentInfo, DataItem, DownstreamFrame, FinishPayload, FrameParseError, Usage, DATA_TAG,
    FINISH_TAG, TEXT_TAG,
};
