//! Upstream event decoder.
//!
//! Turns the raw response body of the agent backend into an ordered, lazily
//! produced sequence of [`UpstreamEvent`]s. A decoder is built per stream and
//! owns its carry-over buffer; it is not restartable.

use std::collections::VecDeque;

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};

use crate::sse::events::{SseLine, UpstreamEvent};
use crate::sse::lines::LineBuffer;
use crate::sse::parser::{parse_sse_line, parse_upstream_event};

/// Stateful decoder for one upstream SSE body.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: LineBuffer,
    /// Records dropped because they failed to parse
    skipped: usize,
}

impl SseDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of the body, returning the events it completed.
    ///
    /// Malformed records are logged and skipped; they never abort decoding.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<UpstreamEvent> {
        self.lines
            .push(chunk)
            .iter()
            .filter_map(|line| self.decode_line(line))
            .collect()
    }

    /// Decode one complete line.
    pub fn decode_line(&mut self, line: &str) -> Option<UpstreamEvent> {
        let SseLine::Data(payload) = parse_sse_line(line) else {
            return None;
        };

        match parse_upstream_event(&payload) {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                tracing::debug!(payload = %payload, "Ignoring unrecognized upstream event");
                None
            }
            Err(e) => {
                self.skipped += 1;
                tracing::warn!(error = %e, "Skipping malformed upstream record");
                None
            }
        }
    }

    /// Called at end of input. A trailing partial line is discarded.
    pub fn finish(&mut self) {
        let dropped = self.lines.discard();
        if dropped > 0 {
            tracing::debug!(bytes = dropped, "Discarding incomplete trailing line");
        }
    }

    /// Number of records skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Decode a byte stream into a stream of events.
///
/// The returned stream pulls the next chunk only when it has no decoded event
/// left to hand out, so at most one chunk worth of events is buffered. A
/// transport error is yielded once and ends the stream.
pub fn decode_stream<S, E>(bytes: S) -> impl Stream<Item = Result<UpstreamEvent, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let state = DecodeState {
        bytes,
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                return Some((Ok(event), state));
            }

            if state.done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed(&chunk);
                    state.ready.extend(events);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.decoder.finish();
                    state.done = true;
                }
            }
        }
    })
}

struct DecodeState<S> {
    bytes: S,
    decoder: SseDecoder,
    ready: VecDeque<UpstreamEvent>,
    done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::events::{StatusKind, UpstreamEvent};

    const STREAM: &str = concat!(
        "data: {\"type\":\"conversation_id\",\"data\":{\"conversation_id\":\"c-1\"}}\n",
        "\n",
        "data: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"Hel\"}}\n",
        "data: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"lo\"}}\n",
        "data: {\"type\":\"status_event\",\"data\":{\"status\":\"completed\"}}\n",
    );

    #[test]
    fn test_feed_whole_payload() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(STREAM.as_bytes());
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            UpstreamEvent::RawResponse {
                delta: "Hel".to_string()
            }
        );
        assert!(events[3].is_terminal());
    }

    #[test]
    fn test_feed_one_byte_at_a_time() {
        let mut whole = SseDecoder::new();
        let expected = whole.feed(STREAM.as_bytes());

        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for byte in STREAM.as_bytes() {
            events.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(events, expected);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(
            b"data: {bad json\ndata: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"ok\"}}\n",
        );
        assert_eq!(
            events,
            vec![UpstreamEvent::RawResponse {
                delta: "ok".to_string()
            }]
        );
        assert_eq!(decoder.skipped(), 1);
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(
            b": keep-alive\nevent: message\nid: 7\ndata: {\"type\":\"status_event\",\"data\":{\"status\":\"processing_started\"}}\n",
        );
        assert_eq!(events.len(), 1);
        match &events[0] {
            UpstreamEvent::Status(status) => assert_eq!(status.status, StatusKind::ProcessingStarted),
            other => panic!("Expected Status event, got {:?}", other),
        }
        assert_eq!(decoder.skipped(), 0);
    }

    #[test]
    fn test_trailing_partial_line_is_discarded() {
        let mut decoder = SseDecoder::new();
        // No newline after the record, so it never completes
        let events =
            decoder.feed(b"data: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"x\"}}");
        assert!(events.is_empty());
        decoder.finish();
        assert!(decoder.feed(b"").is_empty());
    }

    #[tokio::test]
    async fn test_decode_stream_across_chunks() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = STREAM
            .as_bytes()
            .chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();

        let events: Vec<_> = decode_stream(futures_util::stream::iter(chunks))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            UpstreamEvent::ConversationId {
                conversation_id: "c-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_decode_stream_error_ends_stream() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from_static(
                b"data: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"a\"}}\n",
            )),
            Err("connection reset".to_string()),
            Ok(Bytes::from_static(
                b"data: {\"type\":\"raw_response_event\",\"data\":{\"delta\":\"b\"}}\n",
            )),
        ];

        let items: Vec<_> = decode_stream(futures_util::stream::iter(chunks))
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err("connection reset".to_string()));
    }
}
