//! Envelope types.
//!
//! Every wire message is one self-describing envelope. The presence of an
//! `"id"` separates correlated traffic from events.
//!
//! | Envelope | Direction | Shape |
//! |----------|-----------|-------|
//! | [`CommandEnvelope`] | Local → Remote | `{id, method, params}` |
//! | [`ResultEnvelope`] | Remote → Local | `{id, result}` |
//! | [`ErrorEnvelope`] | Remote → Local | `{id, error: {code, message, data?}}` |
//! | [`EventEnvelope`] | Remote → Local | `{method, params}` |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::identifiers::CommandId;

// ============================================================================
// CommandEnvelope
// ============================================================================

/// A command request.
///
/// # Format
///
/// ```json
/// {
///   "id": 1,
///   "method": "Input.dispatchKeyEvent",
///   "params": { "type": "keyDown" }
/// }
/// ```
///
/// `P` is the caller's params type when encoding; decoded commands carry a
/// raw [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope<P = Value> {
    /// Correlation id.
    pub id: CommandId,

    /// Command name in `Domain.command` format.
    pub method: String,

    /// Command parameters.
    pub params: P,
}

// ============================================================================
// ResultEnvelope
// ============================================================================

/// A successful command response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Matches the command `id`.
    pub id: CommandId,

    /// Result payload.
    pub result: Value,
}

// ============================================================================
// ErrorEnvelope
// ============================================================================

/// A failed command response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Matches the command `id`.
    pub id: CommandId,

    /// Remote error details.
    pub error: RemoteError,
}

/// Error body of an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Error code (JSON-RPC style, e.g. `-32601`).
    pub code: i64,

    /// Human readable message.
    pub message: String,

    /// Optional details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<RemoteError> for Error {
    fn from(error: RemoteError) -> Self {
        Error::remote(error.code, error.message, error.data)
    }
}

// ============================================================================
// EventEnvelope
// ============================================================================

/// An unsolicited event notification.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event payload. Absent params decode as an empty object.
    #[serde(default = "empty_object")]
    pub params: Value,
}

impl EventEnvelope {
    /// Creates a new event envelope.
    #[inline]
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Returns the domain name from the method.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let event = EventEnvelope::new("Input.dragIntercepted", json!({}));
    /// assert_eq!(event.domain(), "Input");
    /// ```
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method
            .split_once('.')
            .map_or(self.method.as_str(), |(domain, _)| domain)
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method
            .split_once('.')
            .map_or("", |(_, name)| name)
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// ============================================================================
// Envelope
// ============================================================================

/// Any one wire message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    /// Command request.
    Command(CommandEnvelope),
    /// Successful response.
    Result(ResultEnvelope),
    /// Failed response.
    Error(ErrorEnvelope),
    /// Event notification.
    Event(EventEnvelope),
}

impl Envelope {
    /// Returns the correlation id, if this envelope carries one.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<CommandId> {
        match self {
            Self::Command(c) => Some(c.id),
            Self::Result(r) => Some(r.id),
            Self::Error(e) => Some(e.id),
            Self::Event(_) => None,
        }
    }

    /// Returns a short name of the envelope shape, for logging.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Result(_) => "result",
            Self::Error(_) => "error",
            Self::Event(_) => "event",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
