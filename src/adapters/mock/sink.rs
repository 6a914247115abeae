//! Recording frame sink for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::error::StreamError;
use crate::frames::DownstreamFrame;
use crate::traits::{FrameSink, SinkClosed};

#[derive(Debug, Default)]
struct Recorded {
    writes: Vec<Bytes>,
    failure: Option<StreamError>,
    closed: bool,
    /// Close after this many successful writes
    close_after: Option<usize>,
}

/// Sink that keeps every write in memory.
///
/// It can be closed by hand or after a fixed number of writes to simulate
/// a browser that goes away.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recorded>>,
    closed_notify: Arc<Notify>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `writes` frames, then behave as if the consumer left.
    pub fn closing_after(writes: usize) -> Self {
        let sink = Self::default();
        sink.inner.lock().unwrap().close_after = Some(writes);
        sink
    }

    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
        self.closed_notify.notify_waiters();
    }

    /// Raw writes, one per frame.
    pub fn writes(&self) -> Vec<Bytes> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// All writes concatenated into one string.
    pub fn text(&self) -> String {
        self.writes()
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    /// Writes parsed back into frames.
    pub fn frames(&self) -> Vec<DownstreamFrame> {
        self.text()
            .lines()
            .filter_map(|line| DownstreamFrame::parse_line(line).ok())
            .collect()
    }

    pub fn failure(&self) -> Option<StreamError> {
        self.inner.lock().unwrap().failure.clone()
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn send(&self, frame: Bytes) -> Result<(), SinkClosed> {
        let now_closed = {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return Err(SinkClosed);
            }
            inner.writes.push(frame);
            if inner.close_after == Some(inner.writes.len()) {
                inner.closed = true;
            }
            inner.closed
        };
        if now_closed {
            self.closed_notify.notify_waiters();
        }
        Ok(())
    }

    async fn fail(&self, error: StreamError) {
        self.inner.lock().unwrap().failure = Some(error);
    }

    async fn closed(&self) {
        loop {
            let notified = self.closed_notify.notified();
            if self.inner.lock().unwrap().closed {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_writes() {
        let sink = RecordingSink::new();
        sink.send(Bytes::from_static(b"0:\"a\"\n")).await.unwrap();
        sink.send(Bytes::from_static(b"0:\"b\"\n")).await.unwrap();
        assert_eq!(sink.writes().len(), 2);
        assert_eq!(
            sink.frames(),
            vec![
                DownstreamFrame::TextDelta("a".to_string()),
                DownstreamFrame::TextDelta("b".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_closing_after() {
        let sink = RecordingSink::closing_after(1);
        sink.send(Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(sink.send(Bytes::from_static(b"y")).await, Err(SinkClosed));
        sink.closed().await;
        assert_eq!(sink.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_wakes_waiter() {
        let sink = RecordingSink::new();
        let waiter = {
            let sink = sink.clone();
            tokio::spawn(async move { sink.closed().await })
        };
        tokio::task::yield_now().await;
        sink.close();
        waiter.await.unwrap();
    }
}
