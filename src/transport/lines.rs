//! Newline-delimited JSON transport.
//!
//! One envelope per line over any async byte stream: pipes, unix sockets,
//! TCP, or an in-memory [`tokio::io::duplex`] pair. Compact JSON never
//! contains a raw newline, so the line break is an unambiguous boundary.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tracing::trace;

use crate::error::{Error, Result};

use super::{FrameSink, FrameSource, Transport};

// ============================================================================
// LineTransport
// ============================================================================

/// Newline-delimited transport over a reader and a writer.
///
/// # Example
///
/// ```ignore
/// let (local, remote) = tokio::io::duplex(64 * 1024);
/// let session = Session::open(LineTransport::from_stream(local), SessionOptions::new());
/// ```
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Creates a transport from separate read and write halves.
    #[inline]
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<S> LineTransport<ReadHalf<S>, WriteHalf<S>>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Creates a transport from one bidirectional stream.
    #[inline]
    #[must_use]
    pub fn from_stream(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self { reader, writer }
    }
}

impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    type Source = LineSource<R>;
    type Sink = LineSink<W>;

    fn split(self) -> (Self::Source, Self::Sink) {
        (
            LineSource {
                reader: BufReader::new(self.reader),
                buf: Vec::new(),
            },
            LineSink {
                writer: self.writer,
            },
        )
    }
}

// ============================================================================
// LineSource
// ============================================================================

/// Read half of a [`LineTransport`].
///
/// A line that is not valid UTF-8 is reported as
/// [`Error::MalformedFrame`] and reading continues with the next line.
pub struct LineSource<R> {
    reader: BufReader<R>,
    /// Bytes of the current line. Outlives a cancelled read.
    buf: Vec<u8>,
}

#[async_trait]
impl<R> FrameSource for LineSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn next_frame(&mut self) -> Option<Result<String>> {
        loop {
            // read_until is cancel safe: partial bytes stay in `buf`
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) if self.buf.is_empty() => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(Error::Io(e))),
            }

            let mut line = std::mem::take(&mut self.buf);
            if line.last() == Some(&b'\n') {
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
            }

            match String::from_utf8(line) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => {
                    trace!(len = text.len(), "Line frame received");
                    return Some(Ok(text));
                }
                Err(e) => {
                    return Some(Err(Error::malformed_frame(format!(
                        "line is not valid UTF-8: {}",
                        e.utf8_error()
                    ))));
                }
            }
        }
    }
}

// ============================================================================
// LineSink
// ============================================================================

/// Write half of a [`LineTransport`].
pub struct LineSink<W> {
    writer: W,
}

#[async_trait]
impl<W> FrameSink for LineSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send_frame(&mut self, frame: String) -> Result<()> {
        if frame.contains('\n') {
            return Err(Error::protocol("frame contains a raw newline"));
        }

        let mut bytes = frame.into_bytes();
        bytes.push(b'\n');

        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn test_frames_are_newline_delimited() {
        let (local, remote) = tokio::io::duplex(1024);
        let (_source, mut sink) = LineTransport::from_stream(local).split();

        sink.send_frame(r#"{"id":1}"#.to_string()).await.expect("send");
        sink.send_frame(r#"{"id":2}"#.to_string()).await.expect("send");

        let mut lines = BufReader::new(remote).lines();
        assert_eq!(lines.next_line().await.expect("read").as_deref(), Some(r#"{"id":1}"#));
        assert_eq!(lines.next_line().await.expect("read").as_deref(), Some(r#"{"id":2}"#));
    }

    #[tokio::test]
    async fn test_source_skips_blank_lines() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let (mut source, _sink) = LineTransport::from_stream(local).split();

        remote
            .write_all(b"\n{\"method\":\"A.b\"}\r\n\n{\"method\":\"A.c\"}\n")
            .await
            .expect("write");

        let first = source.next_frame().await.expect("frame").expect("ok");
        let second = source.next_frame().await.expect("frame").expect("ok");
        assert_eq!(first, r#"{"method":"A.b"}"#);
        assert_eq!(second, r#"{"method":"A.c"}"#);
    }

    #[tokio::test]
    async fn test_source_ends_on_eof() {
        let (local, remote) = tokio::io::duplex(1024);
        let (mut source, _sink) = LineTransport::from_stream(local).split();
        drop(remote);

        assert!(source.next_frame().await.is_none());
    }

    #[tokio::test]
    async fn test_sink_rejects_embedded_newline() {
        let (local, _remote) = tokio::io::duplex(1024);
        let (_source, mut sink) = LineTransport::from_stream(local).split();

        let err = sink.send_frame("{\n}".to_string()).await.expect_err("newline");
        assert!(matches!(err, Error::Protocol { .. }));
    }
    #[tokio::test]
    async fn test_invalid_utf8_line_is_malformed_not_fatal() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let (mut source, _sink) = LineTransport::from_stream(local).split();

        remote
            .write_all(b"{\"method\":\"A.b\",\"params\":\"\xff\xfe\"}\n{\"method\":\"A.c\"}\n")
            .await
            .expect("write");

        let err = source.next_frame().await.expect("frame").expect_err("invalid utf-8");
        assert!(matches!(err, Error::MalformedFrame { .. }));

        let next = source.next_frame().await.expect("frame").expect("ok");
        assert_eq!(next, r#"{"method":"A.c"}"#);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let (mut source, _sink) = LineTransport::from_stream(local).split();

        remote.write_all(br#"{"method":"A.b"}"#).await.expect("write");
        drop(remote);

        let frame = source.next_frame().await.expect("frame").expect("ok");
        assert_eq!(frame, r#"{"method":"A.b"}"#);
        assert!(source.next_frame().await.is_none());
    }
}
