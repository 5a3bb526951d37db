//! WebSocket transport.
//!
//! One envelope per text message. Used both to connect out to a browser's
//! debugging endpoint and to serve a connection accepted from a listener.
//!
//! # Connection Flow
//!
//! 1. [`WebSocketTransport::connect`] - dial `ws://host:port/devtools/...`
//! 2. [`Transport::split`] - halves handed to the session event loop
//! 3. Text frames in both directions until either side closes

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::error::{Error, Result};

use super::{FrameSink, FrameSource, Transport};

// ============================================================================
// WebSocketTransport
// ============================================================================

/// WebSocket transport over any async byte stream.
pub struct WebSocketTransport<S> {
    stream: WebSocketStream<S>,
}

impl WebSocketTransport<MaybeTlsStream<TcpStream>> {
    /// Connects to a WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| Error::connection(format!("WebSocket connect to {url} failed: {e}")))?;

        debug!(url, status = %response.status(), "WebSocket connected");

        Ok(Self { stream })
    }
}

impl WebSocketTransport<TcpStream> {
    /// Accepts a WebSocket handshake on an already accepted TCP stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the upgrade fails.
    pub async fn accept(stream: TcpStream) -> Result<Self> {
        let stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        Ok(Self { stream })
    }
}

impl<S> WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps an established WebSocket stream.
    #[inline]
    #[must_use]
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

impl<S> Transport for WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Source = WebSocketSource<S>;
    type Sink = WebSocketSink<S>;

    fn split(self) -> (Self::Source, Self::Sink) {
        let (write, read) = self.stream.split();
        (WebSocketSource { read }, WebSocketSink { write })
    }
}

// ============================================================================
// WebSocketSource
// ============================================================================

/// Read half of a [`WebSocketTransport`].
pub struct WebSocketSource<S> {
    read: SplitStream<WebSocketStream<S>>,
}

#[async_trait]
impl<S> FrameSource for WebSocketSource<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn next_frame(&mut self) -> Option<Result<String>> {
        loop {
            match self.read.next().await {
                Some(Ok(Message::Text(text))) => {
                    trace!(len = text.len(), "WebSocket frame received");
                    return Some(Ok(text.as_str().to_owned()));
                }

                Some(Ok(Message::Binary(bytes))) => {
                    return Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                        Error::malformed_frame(format!(
                            "binary frame is not valid UTF-8: {}",
                            e.utf8_error()
                        ))
                    }));
                }

                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "WebSocket closed by remote");
                    return None;
                }

                Some(Err(e)) => return Some(Err(Error::WebSocket(e))),

                None => return None,

                // Ping, Pong, raw frames
                Some(Ok(_)) => {}
            }
        }
    }
}

// ============================================================================
// WebSocketSink
// ============================================================================

/// Write half of a [`WebSocketTransport`].
pub struct WebSocketSink<S> {
    write: SplitSink<WebSocketStream<S>, Message>,
}

#[async_trait]
impl<S> FrameSink for WebSocketSink<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn send_frame(&mut self, frame: String) -> Result<()> {
        self.write.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.write.close().await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
