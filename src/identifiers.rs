//! Type-safe identifiers.
//!
//! Newtype wrappers prevent mixing command ids with subscription ids at
//! compile time.
//!
//! | Type | Scope | Wire |
//! |------|-------|------|
//! | [`CommandId`] | One session | `"id"` field of command/result/error envelopes |
//! | [`SubscriptionId`] | One session | Never sent |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// CommandId
// ============================================================================

/// Correlation id of a command envelope.
///
/// Assigned monotonically by the session that sends the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u64);

impl CommandId {
    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommandId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ============================================================================
// SubscriptionId
// ============================================================================

/// Handle of one event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// IdSequence
// ============================================================================

/// Monotonic id source, starting at 1.
///
/// One instance per session; ids never wrap in practice.
#[derive(Debug)]
pub(crate) struct IdSequence(AtomicU64);

impl IdSequence {
    pub(crate) const fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    #[inline]
    fn next_raw(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn next_command(&self) -> CommandId {
        CommandId(self.next_raw())
    }

    #[inline]
    pub(crate) fn next_subscription(&self) -> SubscriptionId {
        SubscriptionId(self.next_raw())
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
