//! Relay pipeline.
//!
//! One task per chat request pulls bytes from the upstream response, decodes
//! them into events and writes the encoded frames into a bounded channel
//! whose receiver is the HTTP response body. Backpressure comes from the
//! channel; cancellation comes from the receiver being dropped.

use std::fmt::Display;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::error::StreamError;
use crate::frames::{Flow, FrameEncoder};
use crate::sse::decode_stream;
use crate::traits::{BodyChunk, FrameSink};

/// How a relay run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The finish frame was written
    Completed,
    /// Upstream ended without a `completed` status
    UpstreamClosed,
    /// The consumer went away first
    Cancelled,
}

/// Run the pipeline until upstream finishes, fails, or the sink closes.
///
/// No frame is written once the sink reports closed. Returning drops the
/// upstream stream, which closes the upstream connection.
pub async fn run_relay<S, E, K>(upstream: S, sink: &K) -> Result<RelayOutcome, StreamError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
    K: FrameSink + ?Sized,
{
    let events = decode_stream(upstream);
    tokio::pin!(events);
    let mut encoder = FrameEncoder::new(sink);

    loop {
        let next = tokio::select! {
            biased;
            _ = sink.closed() => return Ok(RelayOutcome::Cancelled),
            next = events.next() => next,
        };

        match next {
            Some(Ok(event)) => match encoder.write_event(&event).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Finished) => return Ok(RelayOutcome::Completed),
                Err(StreamError::Cancelled) => return Ok(RelayOutcome::Cancelled),
                Err(e) => return Err(e),
            },
            Some(Err(e)) => {
                return Err(StreamError::ConnectionLost {
                    message: e.to_string(),
                })
            }
            None => return Ok(RelayOutcome::UpstreamClosed),
        }
    }
}

/// Spawn a relay task and return the response body stream it feeds.
///
/// `capacity` bounds the number of frames buffered ahead of the consumer.
pub fn spawn_relay<S, E>(
    upstream: S,
    capacity: usize,
    conversation_id: Option<String>,
) -> (ReceiverStream<BodyChunk>, JoinHandle<()>)
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<BodyChunk>(capacity.max(1));
    let span = tracing::info_span!(
        "relay",
        conversation_id = conversation_id.as_deref().unwrap_or("new")
    );

    let handle = tokio::spawn(
        async move {
            match run_relay(upstream, &tx).await {
                Ok(RelayOutcome::Completed) => tracing::debug!("Relay completed"),
                Ok(RelayOutcome::UpstreamClosed) => {
                    tracing::info!("Upstream closed before completion")
                }
                Ok(RelayOutcome::Cancelled) => tracing::info!("Stream cancelled by consumer"),
                Err(e) => {
                    tracing::error!(error = %e, code = e.error_code(), "Relay failed");
                    tx.fail(e).await;
                }
            }
        }
        .instrument(span),
    );

    (ReceiverStream::new(rx), handle)
}
