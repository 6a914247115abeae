use std::collections::HashMap;

use uuid::Uuid;

use crate::frames::{DataItem, DownstreamFrame, ToolFeedback};
use crate::sse::LineBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A visible chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
        }
    }
}

/// Rebuilds chat state from downstream frames.
#[derive(Debug, Default)]
pub struct ChatReassembler {
    lines: LineBuffer,
    messages: Vec<Message>,
    /// Every data item received, in order
    data: Vec<DataItem>,
    /// Items of `data` already scanned
    processed: usize,
    current_agent: Option<String>,
    conversation_id: Option<String>,
    feedback: HashMap<String, Vec<ToolFeedback>>,
    finished: bool,
    skipped: usize,
}

impl ChatReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user message and return its id.
    pub fn push_user_message(&mut self, content: impl Into<String>) -> String {
        self.finished = false;
        self.push(Message::new(Role::User, content))
    }

    /// Start an empty assistant message and return its id.
    pub fn begin_assistant_message(&mut self) -> String {
        self.finished = false;
        let id = self.push(Message::new(Role::Assistant, ""));
        self.feedback.insert(id.clone(), Vec::new());
        id
    }

    fn push(&mut self, message: Message) -> String {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Feed one chunk of the response body and return how many frames it
    /// completed.
    ///
    /// Lines that are not valid frames are counted in [`skipped`] and
    /// otherwise ignored.
    ///
    /// [`skipped`]: ChatReassembler::skipped
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let mut applied = 0;
        for line in self.lines.push(chunk) {
            if line.is_empty() {
                continue;
            }
            match DownstreamFrame::parse_line(&line) {
                Ok(frame) => {
                    self.apply(frame);
                    applied += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed frame");
                    self.skipped += 1;
                }
            }
        }
        applied
    }

    /// Apply one decoded frame.
    pub fn apply(&mut self, frame: DownstreamFrame) {
        match frame {
            DownstreamFrame::TextDelta(delta) => self.append_text(&delta),
            DownstreamFrame::Data(items) => {
                self.data.extend(items);
                self.scan_new_data();
            }
            DownstreamFrame::Finish(_) => self.finished = true,
        }
    }

    fn append_text(&mut self, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.content.push_str(delta),
            _ => {
                let id = self.push(Message::new(Role::Assistant, delta));
                self.feedback.entry(id).or_default();
            }
        }
    }

    fn scan_new_data(&mut self) {
        let target = self.messages.last().map(|m| m.id.clone());

        for item in &self.data[self.processed..] {
            match item {
                DataItem::Agent { agent } => {
                    if self.current_agent.as_deref() != Some(agent.name.as_str()) {
                        tracing::debug!(agent = %agent.name, "Agent changed");
                        self.current_agent = Some(agent.name.clone());
                    }
                }
                DataItem::ConversationId { conversation_id } => {
                    self.conversation_id = Some(conversation_id.clone());
                }
                DataItem::Feedback { feedback } => match &target {
                    Some(id) => self
                        .feedback
                        .entry(id.clone())
                        .or_default()
                        .push(feedback.clone()),
                    None => tracing::debug!("Feedback before any message, dropped"),
                },
                DataItem::Other(_) => {}
            }
        }
        self.processed = self.data.len();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn data(&self) -> &[DataItem] {
        &self.data
    }

    pub fn current_agent(&self) -> Option<&str> {
        self.current_agent.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Tool feedback attributed to a message, oldest first.
    pub fn feedback_for(&self, message_id: &str) -> &[ToolFeedback] {
        self.feedback
            .get(message_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether a message still has tools running: more opening actions
    /// (start, call) than closing ones (end, result).
    pub fn tools_active(&self, message_id: &str) -> bool {
        let feedback = self.feedback_for(message_id);
        let opened = feedback.iter().filter(|f| f.action.is_opening()).count();
        let closed = feedback.iter().filter(|f| f.action.is_closing()).count();
        opened > closed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
