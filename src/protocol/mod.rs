//! Wire protocol: envelopes, codec and the domain schema boundary.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Command` | Local → Remote | Command request |
//! | `Result` | Remote → Local | Successful response |
//! | `Error` | Remote → Local | Failed response |
//! | `Event` | Remote → Local | Unsolicited notification |
//!
//! # Method Naming
//!
//! Commands and events follow `Domain.name` format:
//!
//! - `Input.dispatchKeyEvent`
//! - `Page.navigate`
//! - `Network.requestWillBeSent`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `codec` | Frame encoding and envelope classification |
//! | `command` | `Command` / `Event` traits |
//! | `envelope` | Envelope types |

// ============================================================================
// Submodules
// ============================================================================

/// Frame encoding and decoding.
pub mod codec;

/// Domain schema boundary traits.
pub mod command;

/// Envelope message types.
pub mod envelope;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{decode, decode_payload, encode, encode_command};
pub use command::{Command, Empty, Event};
pub use envelope::{
    CommandEnvelope, Envelope, ErrorEnvelope, EventEnvelope, RemoteError, ResultEnvelope,
};
