//! Error types for the protocol client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```no_run
//! use cdtp::domain::input::{DispatchKeyEventParams, KeyEventType};
//! use cdtp::{Error, Result, Session};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let params = DispatchKeyEventParams::new(KeyEventType::KeyDown);
//!     match session.call(&params).await {
//!         Ok(_) => Ok(()),
//!         Err(Error::Remote { code, .. }) if code == -32601 => Ok(()),
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::MalformedFrame`], [`Error::Protocol`] |
//! | Remote | [`Error::Remote`] |
//! | Execution | [`Error::Timeout`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::CommandId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Connection failed.
    ///
    /// Returned when the transport cannot be established or a write fails.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout while connecting to the remote endpoint.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Connection closed.
    ///
    /// Returned to every pending invocation and every active event
    /// subscription when the transport fails or the session is closed.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Inbound frame matched none of the envelope shapes.
    ///
    /// Non-fatal: the frame is dropped and the connection stays alive.
    #[error("Malformed frame: {reason}")]
    MalformedFrame {
        /// Why the frame was rejected.
        reason: String,
    },

    /// Protocol violation or local protocol limit.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// Error envelope returned by the remote endpoint.
    ///
    /// Surfaced verbatim; the client never retries.
    #[error("Remote error {code}: {message}")]
    Remote {
        /// Remote-supplied error code (e.g. `-32601`).
        code: i64,
        /// Remote-supplied error message.
        message: String,
        /// Optional remote-supplied details.
        data: Option<Value>,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// No result or error arrived within the caller's budget.
    ///
    /// The remote-side operation is not cancelled.
    #[error("Command {id} ({method}) timed out after {timeout_ms}ms")]
    Timeout {
        /// Method of the command that timed out.
        method: String,
        /// Id of the command that timed out.
        id: CommandId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a malformed frame error.
    #[inline]
    pub fn malformed_frame(reason: impl Into<String>) -> Self {
        Self::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a remote error.
    #[inline]
    pub fn remote(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
            data,
        }
    }

    /// Creates a command timeout error.
    #[inline]
    pub fn timeout(method: impl Into<String>, id: CommandId, timeout_ms: u64) -> Self {
        Self::Timeout {
            method: method.into(),
            id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectionTimeout { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the remote endpoint answered with an error envelope.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` if an inbound frame could not be decoded.
    #[inline]
    #[must_use]
    pub fn is_malformed_frame(&self) -> bool {
        matches!(self, Self::MalformedFrame { .. })
    }

    /// Returns the remote error code, if any.
    #[inline]
    #[must_use]
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry. The client itself never
    /// retries; whether a command is safe to repeat is the caller's call.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConnectionTimeout { .. } | Self::Timeout { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
