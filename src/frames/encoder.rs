//! Upstream event to downstream frame mapping.

use crate::error::StreamError;
use crate::sse::{RunItemKind, StatusKind, UpstreamEvent};
use crate::traits::FrameSink;

use super::feedback::ToolFeedback;
use super::frame::{AgentInfo, DataItem, DownstreamFrame};

/// Frames produced for one upstream event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Encoded {
    pub frames: Vec<DownstreamFrame>,
    /// The event ends the stream; nothing may be written after these frames.
    pub terminal: bool,
}

impl Encoded {
    fn none() -> Self {
        Self::default()
    }

    fn one(frame: DownstreamFrame) -> Self {
        Self {
            frames: vec![frame],
            terminal: false,
        }
    }

    fn feedback(feedback: ToolFeedback) -> Self {
        Self::one(DownstreamFrame::data(DataItem::Feedback { feedback }))
    }
}

/// Map one upstream event to its downstream frames.
pub fn encode_event(event: &UpstreamEvent) -> Encoded {
    match event {
        UpstreamEvent::ConversationId { conversation_id } => {
            Encoded::one(DownstreamFrame::data(DataItem::ConversationId {
                conversation_id: conversation_id.clone(),
            }))
        }
        UpstreamEvent::RawResponse { delta } => {
            Encoded::one(DownstreamFrame::TextDelta(delta.clone()))
        }
        UpstreamEvent::Status(status) => match status.status {
            StatusKind::ToolStarted => Encoded::feedback(ToolFeedback::started(
                status.message.as_deref(),
                status.tool_name.as_deref(),
                status.arguments.as_ref(),
            )),
            StatusKind::ToolCompleted => {
                Encoded::feedback(ToolFeedback::completed(status.tool_name.as_deref()))
            }
            StatusKind::Completed => Encoded {
                frames: vec![DownstreamFrame::finish()],
                terminal: true,
            },
            StatusKind::ProcessingStarted | StatusKind::AgentChanged | StatusKind::Other(_) => {
                Encoded::none()
            }
        },
        UpstreamEvent::RunItem(item) => match item.item_type {
            RunItemKind::ToolCallItem => Encoded::feedback(ToolFeedback::called(
                item.tool_name.as_deref(),
                item.arguments.as_ref(),
            )),
            RunItemKind::ToolCallOutputItem => Encoded::feedback(ToolFeedback::output(
                item.tool_name.as_deref(),
                item.output.as_ref(),
            )),
            RunItemKind::MessageOutputItem | RunItemKind::Other(_) => Encoded::none(),
        },
        UpstreamEvent::AgentUpdated { agent_name } => {
            Encoded::one(DownstreamFrame::data(DataItem::Agent {
                agent: AgentInfo {
                    name: agent_name.clone(),
                },
            }))
        }
    }
}

/// Whether the pipeline should keep reading upstream events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The finish frame was written
    Finished,
}

/// Writes encoded frames to a sink, one write per frame.
pub struct FrameEncoder<'a, K: FrameSink + ?Sized> {
    sink: &'a K,
    frames_written: usize,
    finished: bool,
}

impl<'a, K: FrameSink + ?Sized> FrameEncoder<'a, K> {
    pub fn new(sink: &'a K) -> Self {
        Self {
            sink,
            frames_written: 0,
            finished: false,
        }
    }

    /// Encode and write one event.
    ///
    /// Events after the finish frame are dropped. A rejected write means the
    /// consumer is gone and yields [`StreamError::Cancelled`].
    pub async fn write_event(&mut self, event: &UpstreamEvent) -> Result<Flow, StreamError> {
        if self.finished {
            tracing::debug!(event_type = event.event_type_name(), "Dropping event after finish");
            return Ok(Flow::Finished);
        }

        let encoded = encode_event(event);
        for frame in &encoded.frames {
            let bytes = frame.to_bytes()?;
            self.sink
                .send(bytes)
                .await
                .map_err(|_| StreamError::Cancelled)?;
            self.frames_written += 1;
        }

        if encoded.terminal {
            self.finished = true;
            return Ok(Flow::Finished);
        }
        Ok(Flow::Continue)
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::RecordingSink;
    use crate::frames::feedback::ToolAction;
    use crate::sse::{RunItemEvent, StatusEvent};
    use serde_json::{json, Value};

    fn status(kind: StatusKind) -> UpstreamEvent {
        UpstreamEvent::Status(StatusEvent {
            status: kind,
            message: None,
            tool_name: None,
            arguments: None,
        })
    }

    fn run_item(kind: RunItemKind, arguments: Option<Value>, output: Option<Value>) -> UpstreamEvent {
        UpstreamEvent::RunItem(RunItemEvent {
            item_type: kind,
            tool_name: Some("get_weather".to_string()),
            arguments,
            output,
            text: None,
        })
    }

    fn single_line(event: &UpstreamEvent) -> String {
        let encoded = encode_event(event);
        assert_eq!(encoded.frames.len(), 1, "expected one frame for {:?}", event);
        encoded.frames[0].to_line().unwrap()
    }

    #[test]
    fn test_conversation_id_frame() {
        let line = single_line(&UpstreamEvent::ConversationId {
            conversation_id: "c-1".to_string(),
        });
        assert_eq!(line, "2:[{\"conversation_id\":\"c-1\"}]\n");
    }

    #[test]
    fn test_text_frame() {
        let line = single_line(&UpstreamEvent::RawResponse {
            delta: "Hel".to_string(),
        });
        assert_eq!(line, "0:\"Hel\"\n");
    }

    #[test]
    fn test_completed_is_terminal() {
        let encoded = encode_event(&status(StatusKind::Completed));
        assert!(encoded.terminal);
        assert_eq!(encoded.frames, vec![DownstreamFrame::finish()]);
    }

    #[test]
    fn test_silent_statuses() {
        for kind in [
            StatusKind::ProcessingStarted,
            StatusKind::AgentChanged,
            StatusKind::Other("thinking".to_string()),
        ] {
            let encoded = encode_event(&status(kind));
            assert!(encoded.frames.is_empty());
            assert!(!encoded.terminal);
        }
    }

    #[test]
    fn test_tool_started_frame() {
        let event = UpstreamEvent::Status(StatusEvent {
            status: StatusKind::ToolStarted,
            message: Some("Searching catalog \"for widgets\"".to_string()),
            tool_name: Some("catalog_search".to_string()),
            arguments: None,
        });
        let line = single_line(&event);
        let payload: Value = serde_json::from_str(&line[2..]).unwrap();
        assert_eq!(
            payload,
            json!([{"feedback": {
                "type": "tool_status",
                "action": "start",
                "message": "🔧 Searching catalog ",
                "tool": "catalog_search",
                "args": null
            }}])
        );
    }

    #[test]
    fn test_tool_completed_frame() {
        let line = single_line(&status(StatusKind::ToolCompleted));
        let payload: Value = serde_json::from_str(&line[2..]).unwrap();
        assert_eq!(payload[0]["feedback"]["action"], "end");
        assert_eq!(payload[0]["feedback"]["tool"], "unknown");
        assert!(payload[0]["feedback"].get("args").is_none());
    }

    #[test]
    fn test_tool_call_and_output_frames() {
        let line = single_line(&run_item(
            RunItemKind::ToolCallItem,
            Some(json!("{\"city\":\"Oslo\"}")),
            None,
        ));
        let payload: Value = serde_json::from_str(&line[2..]).unwrap();
        assert_eq!(payload[0]["feedback"]["action"], "call");
        assert_eq!(payload[0]["feedback"]["args"], json!({"city": "Oslo"}));

        let line = single_line(&run_item(RunItemKind::ToolCallOutputItem, None, Some(json!(""))));
        let payload: Value = serde_json::from_str(&line[2..]).unwrap();
        assert_eq!(payload[0]["feedback"]["action"], "result");
        assert_eq!(payload[0]["feedback"]["output"], Value::Null);
        assert!(payload[0]["feedback"].as_object().unwrap().contains_key("output"));
    }

    #[test]
    fn test_message_output_item_is_silent() {
        let encoded = encode_event(&run_item(RunItemKind::MessageOutputItem, None, None));
        assert!(encoded.frames.is_empty());
    }

    #[test]
    fn test_agent_frames_are_not_deduplicated() {
        let event = UpstreamEvent::AgentUpdated {
            agent_name: "SalesAgent".to_string(),
        };
        assert_eq!(single_line(&event), single_line(&event));
        assert_eq!(single_line(&event), "2:[{\"agent\":{\"name\":\"SalesAgent\"}}]\n");
    }

    #[tokio::test]
    async fn test_encoder_writes_one_frame_per_write() {
        let sink = RecordingSink::new();
        let mut encoder = FrameEncoder::new(&sink);

        for delta in ["Hel", "lo"] {
            let flow = encoder
                .write_event(&UpstreamEvent::RawResponse {
                    delta: delta.to_string(),
                })
                .await
                .unwrap();
            assert_eq!(flow, Flow::Continue);
        }
        let flow = encoder.write_event(&status(StatusKind::Completed)).await.unwrap();
        assert_eq!(flow, Flow::Finished);

        assert_eq!(encoder.frames_written(), 3);
        assert_eq!(sink.writes().len(), 3);
        assert_eq!(
            sink.text(),
            "0:\"Hel\"\n0:\"lo\"\nd:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":0,\"completionTokens\":0}}\n"
        );
    }

    #[tokio::test]
    async fn test_encoder_drops_events_after_finish() {
        let sink = RecordingSink::new();
        let mut encoder = FrameEncoder::new(&sink);
        encoder.write_event(&status(StatusKind::Completed)).await.unwrap();

        let flow = encoder
            .write_event(&UpstreamEvent::RawResponse {
                delta: "late".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(flow, Flow::Finished);
        assert!(encoder.is_finished());
        assert_eq!(sink.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_encoder_reports_cancelled_sink() {
        let sink = RecordingSink::new();
        sink.close();
        let mut encoder = FrameEncoder::new(&sink);

        let result = encoder
            .write_event(&UpstreamEvent::RawResponse {
                delta: "x".to_string(),
            })
            .await;
        assert_eq!(result, Err(StreamError::Cancelled));
        assert_eq!(encoder.frames_written(), 0);
    }

    #[tokio::test]
    async fn test_feedback_action_survives_round_trip_through_sink() {
        let sink = RecordingSink::new();
        let mut encoder = FrameEncoder::new(&sink);
        encoder
            .write_event(&run_item(RunItemKind::ToolCallItem, None, None))
            .await
            .unwrap();
        match &sink.frames()[0] {
            DownstreamFrame::Data(items) => match &items[0] {
                DataItem::Feedback { feedback } => assert_eq!(feedback.action, ToolAction::Call),
                other => panic!("Expected feedback, got {:?}", other),
            },
            other => panic!("Expected data frame, got {:?}", other),
        }
    }
}
