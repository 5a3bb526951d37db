//! Typed client for a DevTools-style command/event protocol.
//!
//! This library speaks a JSON protocol over a bidirectional frame stream
//! (WebSocket or newline-delimited byte stream). Callers issue typed commands
//! and await their results while asynchronous events are delivered to
//! subscribers.
//!
//! # Architecture
//!
//! The client follows a local/remote model:
//!
//! - **Local End (Rust)**: Sends commands, receives results and events
//! - **Remote End (browser or tool)**: Executes commands, emits events
//!
//! Key design principles:
//!
//! - Each [`Session`] owns one transport and one event loop task
//! - Methods use the `Domain.method` format, events use `Domain.event`
//! - Every command gets a fresh id; results are matched by id, in any order
//! - Events fan out to every live subscriber of that name, in arrival order
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use cdtp::domain::input::{DispatchKeyEventParams, KeyEventType};
//! use cdtp::{Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::builder()
//!         .default_timeout(Duration::from_secs(10))
//!         .connect("ws://127.0.0.1:9222/devtools/page/ABC")
//!         .await?;
//!
//!     // Typed command
//!     let key = DispatchKeyEventParams::new(KeyEventType::KeyDown).with_code("KeyA");
//!     session.call(&key).await?;
//!
//!     // Untyped command
//!     let version = session.invoke("Browser.getVersion", &serde_json::json!({})).await?;
//!     println!("Remote: {}", version["product"]);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Typed domain records, e.g. `Input` |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Envelopes and frame codec |
//! | [`session`] | [`Session`], correlator, event dispatcher |
//! | [`transport`] | Frame transports (WebSocket, line-delimited) |

// ============================================================================
// Modules
// ============================================================================

/// Typed domain records.
///
/// Params and result types for protocol domains, each implementing
/// [`Command`] or [`Event`].
pub mod domain;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for commands and subscriptions.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Protocol envelopes and frame codec.
///
/// Defines command/result/error/event structures and their JSON encoding.
pub mod protocol;

/// Session layer.
///
/// Correlates results with pending commands and dispatches events.
pub mod session;

/// Frame transports.
///
/// Moves whole text frames between the session and the remote end.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{CommandId, SubscriptionId};

// Protocol types
pub use protocol::{Command, Empty, Event, RemoteError};

// Session types
pub use session::{EventStream, Session, SessionBuilder, SessionOptions, SessionStats};

// Transport types
pub use transport::{LineTransport, Transport, WebSocketTransport};
