//! Outbound frame sink.
//!
//! The relay writes encoded frames into a [`FrameSink`]. In production this
//! is the sending half of the bounded channel whose receiver is the HTTP
//! response body; tests use a recording sink.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::StreamError;

/// The consumer of a sink has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

impl std::fmt::Display for SinkClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame sink closed")
    }
}

impl std::error::Error for SinkClosed {}

/// Destination for downstream frames.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Write one frame. Waits for capacity, so a slow consumer slows the
    /// producer down.
    async fn send(&self, frame: Bytes) -> Result<(), SinkClosed>;

    /// Abort the outbound stream with an error.
    async fn fail(&self, error: StreamError);

    /// Resolves once the consumer has gone away.
    async fn closed(&self);
}

/// Body item type of the streamed HTTP response.
pub type BodyChunk = Result<Bytes, io::Error>;

#[async_trait]
impl FrameSink for mpsc::Sender<BodyChunk> {
    async fn send(&self, frame: Bytes) -> Result<(), SinkClosed> {
        mpsc::Sender::send(self, Ok(frame))
            .await
            .map_err(|_| SinkClosed)
    }

    async fn fail(&self, error: StreamError) {
        let err = io::Error::new(io::ErrorKind::Other, error.to_string());
        // Nothing to report to if the consumer is already gone
        let _ = mpsc::Sender::send(self, Err(err)).await;
    }

    async fn closed(&self) {
        mpsc::Sender::closed(self).await
    }
}
