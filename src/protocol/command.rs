//! Domain schema boundary.
//!
//! Domain modules plug into the session through two traits:
//!
//! - [`Command`] - a params record that knows its method name and the type
//!   its result decodes into
//! - [`Event`] - a payload record that knows its event name
//!
//! The session resolves the concrete result type from the caller's type
//! parameter, so nothing here is dispatched dynamically.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Serialize)]
//! struct GetTitle {}
//!
//! impl Command for GetTitle {
//!     const METHOD: &'static str = "Page.getTitle";
//!     type Response = TitleResult;
//! }
//!
//! let title = session.call(&GetTitle {}).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// Command
// ============================================================================

/// Params of one remote command.
pub trait Command: Serialize {
    /// Method name in `Domain.command` format.
    const METHOD: &'static str;

    /// Decoded result type.
    type Response: DeserializeOwned;
}

// ============================================================================
// Event
// ============================================================================

/// Payload of one remote event.
pub trait Event: DeserializeOwned {
    /// Event name in `Domain.eventName` format.
    const NAME: &'static str;
}

// ============================================================================
// Empty
// ============================================================================

/// Empty object, `{}` on the wire.
///
/// Serves both as params of commands without arguments and as the result of
/// commands that return nothing. Unknown result fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_empty_wire_format() {
        assert_eq!(serde_json::to_value(Empty {}).expect("serialize"), json!({}));
    }

    #[test]
    fn test_empty_accepts_any_object() {
        let empty: Empty = serde_json::from_value(json!({})).expect("empty object");
        assert_eq!(empty, Empty {});

        let extra: Empty = serde_json::from_value(json!({"ignored": 1})).expect("extra fields");
        assert_eq!(extra, Empty {});
    }
}
