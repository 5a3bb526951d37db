//! Wire codec.
//!
//! Encodes outgoing commands and classifies inbound frames into one of the
//! four [`Envelope`] shapes.
//!
//! # Classification
//!
//! | Fields present | Envelope |
//! |----------------|----------|
//! | `id` + `result` | [`Envelope::Result`] |
//! | `id` + `error` | [`Envelope::Error`] |
//! | `id` + `method` | [`Envelope::Command`] |
//! | `method` | [`Envelope::Event`] |
//!
//! Anything else is [`Error::MalformedFrame`]. Unknown extra fields are
//! ignored.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::CommandId;

use super::envelope::{
    CommandEnvelope, Envelope, ErrorEnvelope, EventEnvelope, RemoteError, ResultEnvelope,
};

// ============================================================================
// Encoding
// ============================================================================

/// Borrowed command envelope, so params are serialized in place.
#[derive(Serialize)]
struct OutgoingCommand<'a, P: ?Sized> {
    id: CommandId,
    method: &'a str,
    params: &'a P,
}

/// Encodes a command envelope to a single frame.
///
/// Optional params fields follow the params type's own serde rules, so
/// absent optionals stay off the wire.
///
/// # Errors
///
/// Returns [`Error::Json`] if the params fail to serialize.
pub fn encode_command<P>(id: CommandId, method: &str, params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let frame = serde_json::to_string(&OutgoingCommand { id, method, params })?;
    Ok(frame)
}

/// Encodes any envelope to a single frame.
///
/// # Errors
///
/// Returns [`Error::Json`] if the payload fails to serialize.
pub fn encode(envelope: &Envelope) -> Result<String> {
    Ok(serde_json::to_string(envelope)?)
}

// ============================================================================
// Decoding
// ============================================================================

/// Every field an envelope may carry.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    id: Option<CommandId>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RemoteError>,
}

/// Keeps `"result": null` distinct from a missing `result`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Decodes one inbound frame.
///
/// # Errors
///
/// Returns [`Error::MalformedFrame`] if the frame is not JSON or its shape
/// matches no envelope.
pub fn decode(frame: &str) -> Result<Envelope> {
    let raw: RawEnvelope =
        serde_json::from_str(frame).map_err(|e| Error::malformed_frame(e.to_string()))?;

    match raw {
        RawEnvelope {
            id: Some(id),
            result: Some(result),
            error: None,
            ..
        } => Ok(Envelope::Result(ResultEnvelope { id, result })),

        RawEnvelope {
            id: Some(id),
            result: None,
            error: Some(error),
            ..
        } => Ok(Envelope::Error(ErrorEnvelope { id, error })),

        RawEnvelope {
            id: Some(_),
            result: Some(_),
            error: Some(_),
            ..
        } => Err(Error::malformed_frame("both result and error present")),

        RawEnvelope {
            id: Some(id),
            method: Some(method),
            params,
            ..
        } => Ok(Envelope::Command(CommandEnvelope {
            id,
            method,
            params: params.unwrap_or(Value::Null),
        })),

        RawEnvelope {
            id: None,
            method: Some(method),
            params,
            result: None,
            error: None,
        } => Ok(Envelope::Event(match params {
            Some(params) => EventEnvelope::new(method, params),
            None => EventEnvelope::new(method, Value::Object(Default::default())),
        })),

        RawEnvelope { id: Some(_), .. } => {
            Err(Error::malformed_frame("id without result, error or method"))
        }

        RawEnvelope { .. } => Err(Error::malformed_frame("frame has no id and is not an event")),
    }
}

/// Decodes a result payload into the caller's type.
///
/// # Errors
///
/// Returns [`Error::Json`] if the payload does not match `R`.
#[inline]
pub fn decode_payload<R>(payload: Value) -> Result<R>
where
    R: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_value(payload)?)
}

// ============================================================================
// Tests
// ============================================================================
