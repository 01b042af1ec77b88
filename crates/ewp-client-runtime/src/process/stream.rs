//! Output demuxing for the core process (non-UTF8-safe).
//!
//! The core client is external tooling and can emit non-UTF8 bytes on
//! stdout/stderr, so chunks are split on byte line boundaries and decoded
//! lossily. Besides plain log lines, exactly one line format is
//! special-cased: the `CONTROL_ADDR=` announcement carrying the process's
//! control endpoint.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Marker line announcing the control endpoint on the primary stream.
pub const CONTROL_ADDR_MARKER: &str = "CONTROL_ADDR=";

const READ_CHUNK: usize = 4096;

/// Which of the two independent output channels a line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    /// stdout: log lines plus the control-address announcement.
    Primary,
    /// stderr: diagnostic lines, tagged before forwarding.
    Diagnostic,
}

/// One trimmed, non-empty line read from the core process.
#[derive(Debug)]
pub(crate) struct OutputLine {
    pub run_id: u64,
    pub source: StreamSource,
    pub text: String,
}

/// Splits raw byte chunks into trimmed text lines.
///
/// Chunks may end mid-line; the partial tail is buffered until the next
/// chunk (or [`LineBuffer::flush`] at EOF) completes it. Empty lines are
/// discarded, trailing `\r` handled by the trim.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completes, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                if let Some(line) = Self::take_line(&mut self.pending) {
                    lines.push(line);
                }
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    /// Drain the unterminated tail, if any.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Self::take_line(&mut self.pending)
        }
    }

    fn take_line(pending: &mut Vec<u8>) -> Option<String> {
        let line = String::from_utf8_lossy(pending).trim().to_string();
        pending.clear();
        if line.is_empty() { None } else { Some(line) }
    }
}

/// A demuxed line: what to forward as a log event, and the control address
/// if the line was the announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demuxed {
    pub log_line: String,
    pub control_addr: Option<String>,
}

/// Classify one line from the given channel.
///
/// Diagnostic lines are tagged with their origin. A primary line starting
/// with [`CONTROL_ADDR_MARKER`] yields the address *and* is still forwarded
/// as a log line equal to the full original line.
#[must_use]
pub fn demux(source: StreamSource, line: &str) -> Demuxed {
    match source {
        StreamSource::Diagnostic => Demuxed {
            log_line: format!("[ERR] {line}"),
            control_addr: None,
        },
        StreamSource::Primary => Demuxed {
            log_line: line.to_string(),
            control_addr: line
                .strip_prefix(CONTROL_ADDR_MARKER)
                .map(|addr| addr.to_string()),
        },
    }
}

/// Spawn a reader task that feeds demuxable lines to the supervisor actor.
///
/// The task exits on EOF, read error, or when the receiving side is gone.
pub(crate) fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    source: StreamSource,
    run_id: u64,
    tx: mpsc::Sender<OutputLine>,
) {
    tokio::spawn(async move {
        let mut stream = stream;
        let mut buffer = LineBuffer::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    for text in buffer.push(&chunk[..n]) {
                        if tx
                            .send(OutputLine {
                                run_id,
                                source,
                                text,
                            })
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                }
                Err(e) => {
                    debug!(?source, run_id, error = %e, "output reader exiting due to read error");
                    break;
                }
            }
        }

        if let Some(text) = buffer.flush() {
            let _ = tx
                .send(OutputLine {
                    run_id,
                    source,
                    text,
                })
                .await;
        }
        debug!(?source, run_id, "output reader task exiting");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_single_chunk_into_lines() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push(b"first\nsecond\n");
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn reassembles_line_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"hel").is_empty());
        assert_eq!(buffer.push(b"lo\nwor"), vec!["hello"]);
        assert_eq!(buffer.push(b"ld\n"), vec!["world"]);
    }

    #[test]
    fn strips_carriage_returns_and_whitespace() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"  padded  \r\n"), vec!["padded"]);
    }

    #[test]
    fn discards_empty_lines() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"\n\r\n  \na\n"), vec!["a"]);
    }

    #[test]
    fn decodes_invalid_utf8_lossily() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push(b"bad \xff byte\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("bad"));
        assert!(lines[0].contains("byte"));
    }

    #[test]
    fn flush_returns_unterminated_tail() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"tail without newline").is_empty());
        assert_eq!(buffer.flush(), Some("tail without newline".to_string()));
        assert_eq!(buffer.flush(), None);
    }

    #[test]
    fn primary_line_passes_through_unchanged() {
        let out = demux(StreamSource::Primary, "listening on socks5://127.0.0.1:1080");
        assert_eq!(out.log_line, "listening on socks5://127.0.0.1:1080");
        assert_eq!(out.control_addr, None);
    }

    #[test]
    fn control_announcement_is_extracted_and_still_logged() {
        let out = demux(StreamSource::Primary, "CONTROL_ADDR=127.0.0.1:9090");
        assert_eq!(out.control_addr.as_deref(), Some("127.0.0.1:9090"));
        assert_eq!(out.log_line, "CONTROL_ADDR=127.0.0.1:9090");
    }

    #[test]
    fn marker_must_be_a_prefix() {
        let out = demux(StreamSource::Primary, "note: CONTROL_ADDR=1.2.3.4:1");
        assert_eq!(out.control_addr, None);
    }

    #[test]
    fn diagnostic_lines_are_tagged() {
        let out = demux(StreamSource::Diagnostic, "dial tcp: connection refused");
        assert_eq!(out.log_line, "[ERR] dial tcp: connection refused");
        assert_eq!(out.control_addr, None);
    }

    #[test]
    fn diagnostic_channel_never_yields_a_control_addr() {
        let out = demux(StreamSource::Diagnostic, "CONTROL_ADDR=127.0.0.1:9090");
        assert_eq!(out.control_addr, None);
        assert_eq!(out.log_line, "[ERR] CONTROL_ADDR=127.0.0.1:9090");
    }
}
