//! Transport layer.
//!
//! A transport is a full-duplex stream of text frames, one envelope per
//! frame. The session splits it once: the read half is owned by the event
//! loop, the write half is written only by the event loop.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session (Rust) │                              │  Remote end     │
//! │                 │      WebSocket text frames   │  (browser)      │
//! │  event loop     │◄────────────────────────────►│                 │
//! │  FrameSource    │   or newline-delimited JSON  │                 │
//! │  FrameSink      │                              │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `lines` | Newline-delimited JSON over any async byte stream |
//! | `websocket` | WebSocket text frames |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// Newline-delimited transport.
pub mod lines;

/// WebSocket transport.
pub mod websocket;

// ============================================================================
// Re-exports
// ============================================================================

pub use lines::{LineSink, LineSource, LineTransport};
pub use websocket::{WebSocketSink, WebSocketSource, WebSocketTransport};

// ============================================================================
// Traits
// ============================================================================

/// Read half of a transport.
#[async_trait]
pub trait FrameSource: Send + 'static {
    /// Returns the next inbound frame in arrival order.
    ///
    /// `None` means the remote end closed the stream. A frame that cannot be
    /// decoded to text is returned as
    /// [`Error::MalformedFrame`](crate::Error::MalformedFrame); the session
    /// drops it and keeps reading. Any other error ends the session. Must be
    /// cancel safe: dropping the future before it completes loses no frame.
    async fn next_frame(&mut self) -> Option<Result<String>>;
}

/// Write half of a transport.
#[async_trait]
pub trait FrameSink: Send + 'static {
    /// Writes one complete frame.
    async fn send_frame(&mut self, frame: String) -> Result<()>;

    /// Closes the write half.
    async fn close(&mut self) -> Result<()>;
}

/// A full-duplex frame transport.
pub trait Transport: Send + 'static {
    /// Read half.
    type Source: FrameSource;
    /// Write half.
    type Sink: FrameSink;

    /// Splits the transport into its halves.
    fn split(self) -> (Self::Source, Self::Sink);
}
