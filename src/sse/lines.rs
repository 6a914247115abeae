//! Line reassembly across network chunks.
//!
//! Both the upstream SSE stream and the downstream frame stream are
//! newline-delimited, and a chunk boundary can fall anywhere: mid-line,
//! mid-JSON-token or inside a multi-byte UTF-8 character. [`LineBuffer`]
//! keeps the trailing partial line as raw bytes and hands out only complete
//! lines.

/// Carry-over buffer that turns arbitrary byte chunks into complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Bytes after the last newline seen so far
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, in order.
    ///
    /// Lines are returned without the `\n` terminator and without a trailing
    /// `\r`. Invalid UTF-8 is replaced rather than rejected.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        // `\n` never occurs inside a multi-byte UTF-8 sequence, so everything
        // up to the last newline is made of whole characters.
        let remainder = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);

        complete[..last_newline]
            .split(|b| *b == b'\n')
            .map(|line| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                String::from_utf8_lossy(line).into_owned()
            })
            .collect()
    }

    /// Bytes of the current partial line.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Drop the partial line, returning how many bytes were discarded.
    pub fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
