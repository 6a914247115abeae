//! Status and tool telemetry event parsers

use serde_json::Value;

use super::decode_payload;
use crate::sse::events::{
    RunItemEvent, RunItemKind, SseParseError, StatusEvent, StatusKind, UpstreamEvent,
};
use crate::sse::payloads::{RunItemPayload, StatusPayload};

/// Parse status_event
pub(super) fn parse_status_event(
    event_type: &str,
    data: Value,
) -> Result<UpstreamEvent, SseParseError> {
    let payload: StatusPayload = decode_payload(event_type, data)?;
    Ok(UpstreamEvent::Status(StatusEvent {
        status: StatusKind::from_wire(&payload.status),
        message: payload.message,
        tool_name: payload.tool_name,
        arguments: payload.arguments,
    }))
}

/// Parse run_item_stream_event
pub(super) fn parse_run_item_event(
    event_type: &str,
    data: Value,
) -> Result<UpstreamEvent, SseParseError> {
    let payload: RunItemPayload = decode_payload(event_type, data)?;
    Ok(UpstreamEvent::RunItem(RunItemEvent {
        item_type: RunItemKind::from_wire(&payload.item_type),
        tool_name: payload.tool_name,
        arguments: payload.arguments,
        output: payload.output,
        text: payload.text,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::sse::events::{RunItemEvent, RunItemKind, StatusEvent, StatusKind, UpstreamEvent};
    use crate::sse::parser::parse_upstream_event;

    #[test]
    fn test_parse_status_completed() {
        let result =
            parse_upstream_event(r#"{"type":"status_event","data":{"status":"completed"}}"#);
        assert_eq!(
            result.unwrap(),
            Some(UpstreamEvent::Status(StatusEvent {
                status: StatusKind::Completed,
                message: None,
                tool_name: None,
                arguments: None,
            }))
        );
    }

    #[test]
    fn test_parse_status_tool_started() {
        let result = parse_upstream_event(
            r#"{"type":"status_event","data":{"status":"tool_started","message":"Searching catalog \"for widgets\"","tool_name":"catalog_search"}}"#,
        );
        assert_eq!(
            result.unwrap(),
            Some(UpstreamEvent::Status(StatusEvent {
                status: StatusKind::ToolStarted,
                message: Some("Searching catalog \"for widgets\"".to_string()),
                tool_name: Some("catalog_search".to_string()),
                arguments: None,
            }))
        );
    }

    #[test]
    fn test_parse_status_unknown_value() {
        let result =
            parse_upstream_event(r#"{"type":"status_event","data":{"status":"thinking"}}"#)
                .unwrap()
                .unwrap();
        match result {
            UpstreamEvent::Status(status) => {
                assert_eq!(status.status, StatusKind::Other("thinking".to_string()))
            }
            other => panic!("Expected Status event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_status_without_status_field() {
        let result = parse_upstream_event(r#"{"type":"status_event","data":{"message":"hi"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_tool_call_item() {
        let result = parse_upstream_event(
            r#"{"type":"run_item_stream_event","data":{"item_type":"tool_call_item","tool_name":"get_weather","arguments":"{\"city\":\"Oslo\"}"}}"#,
        );
        assert_eq!(
            result.unwrap(),
            Some(UpstreamEvent::RunItem(RunItemEvent {
                item_type: RunItemKind::ToolCallItem,
                tool_name: Some("get_weather".to_string()),
                arguments: Some(json!("{\"city\":\"Oslo\"}")),
                output: None,
                text: None,
            }))
        );
    }

    #[test]
    fn test_parse_tool_call_output_object() {
        let result = parse_upstream_event(
            r#"{"type":"run_item_stream_event","data":{"item_type":"tool_call_output_item","output":{"temp":4}}}"#,
        )
        .unwrap()
        .unwrap();
        match result {
            UpstreamEvent::RunItem(item) => {
                assert_eq!(item.item_type, RunItemKind::ToolCallOutputItem);
                assert_eq!(item.output, Some(json!({"temp": 4})));
                assert!(item.tool_name.is_none());
            }
            other => panic!("Expected RunItem event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_message_output_item() {
        let result = parse_upstream_event(
            r#"{"type":"run_item_stream_event","data":{"item_type":"message_output_item","text":"done"}}"#,
        )
        .unwrap()
        .unwrap();
        match result {
            UpstreamEvent::RunItem(item) => {
                assert_eq!(item.item_type, RunItemKind::MessageOutputItem);
                assert_eq!(item.text.as_deref(), Some("done"));
            }
            other => panic!("Expected RunItem event, got {:?}", other),
        }
    }
}
