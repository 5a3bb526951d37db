//! Command correlation.
//!
//! Tracks in-flight commands by id and hands each inbound result or error to
//! exactly the caller that sent the matching command.
//!
//! An entry leaves the table the moment it resolves, whichever way it
//! resolves: matching result, matching error, timeout, caller cancellation,
//! or connection closure. The notification slot moves out with it, so an
//! invocation can never be resolved twice.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{CommandId, IdSequence};

// ============================================================================
// Types
// ============================================================================

/// What a waiting caller eventually receives.
pub(crate) type Outcome = Result<Value>;

/// One in-flight command.
struct PendingInvocation {
    method: String,
    created: Instant,
    tx: oneshot::Sender<Outcome>,
}

/// Pending table plus the closed flag, under one lock so registration can
/// never race closure.
#[derive(Default)]
struct PendingTable {
    entries: FxHashMap<CommandId, PendingInvocation>,
    closed: bool,
}

// ============================================================================
// Correlator
// ============================================================================

/// Pending invocation table for one session.
pub struct Correlator {
    ids: IdSequence,
    table: Mutex<PendingTable>,
    max_pending: Option<usize>,
    stale: AtomicU64,
}

impl Correlator {
    /// Creates an empty correlator.
    #[must_use]
    pub fn new(max_pending: Option<usize>) -> Self {
        Self {
            ids: IdSequence::new(),
            table: Mutex::new(PendingTable::default()),
            max_pending,
            stale: AtomicU64::new(0),
        }
    }

    /// Registers a new pending invocation under a fresh id.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the correlator was closed
    /// - [`Error::Protocol`] if the pending limit is reached
    pub fn register(&self, method: &str) -> Result<(CommandId, oneshot::Receiver<Outcome>)> {
        let mut table = self.table.lock();

        if table.closed {
            return Err(Error::ConnectionClosed);
        }

        if let Some(max) = self.max_pending
            && table.entries.len() >= max
        {
            warn!(pending = table.entries.len(), max, "Too many pending commands");
            return Err(Error::protocol(format!(
                "Too many pending commands: {}/{max}",
                table.entries.len()
            )));
        }

        let id = self.ids.next_command();
        let (tx, rx) = oneshot::channel();
        table.entries.insert(
            id,
            PendingInvocation {
                method: method.to_string(),
                created: Instant::now(),
                tx,
            },
        );

        Ok((id, rx))
    }

    /// Delivers an inbound result or error to its waiting caller.
    ///
    /// Returns `false` if no invocation is pending under `id`; the frame is
    /// then counted as stale and discarded.
    pub fn resolve(&self, id: CommandId, outcome: Outcome) -> bool {
        let Some(pending) = self.take(id) else {
            self.stale.fetch_add(1, Ordering::Relaxed);
            warn!(%id, "Discarding response for unknown command");
            return false;
        };

        trace!(
            %id,
            method = %pending.method,
            elapsed_us = u64::try_from(pending.created.elapsed().as_micros()).unwrap_or(u64::MAX),
            ok = outcome.is_ok(),
            "Command resolved"
        );

        // Receiver gone means the caller was cancelled mid-flight
        let _ = pending.tx.send(outcome);
        true
    }

    /// Removes a pending invocation without delivering anything.
    ///
    /// Used on timeout and caller cancellation. A matching frame arriving
    /// later is discarded as stale.
    pub fn cancel(&self, id: CommandId) -> bool {
        match self.take(id) {
            Some(pending) => {
                trace!(%id, method = %pending.method, "Command abandoned");
                true
            }
            None => false,
        }
    }

    /// Closes the correlator and fails every pending invocation with
    /// [`Error::ConnectionClosed`].
    ///
    /// Returns the number of invocations failed. Later registrations fail
    /// immediately.
    pub fn close(&self) -> usize {
        let drained: Vec<_> = {
            let mut table = self.table.lock();
            table.closed = true;
            table.entries.drain().collect()
        };

        let count = drained.len();
        for (_, pending) in drained {
            let _ = pending.tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending commands on close");
        }

        count
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.table.lock().closed
    }

    /// Returns the number of in-flight commands.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Returns the number of responses discarded for unknown ids.
    #[inline]
    #[must_use]
    pub fn stale_count(&self) -> u64 {
        self.stale.load(Ordering::Relaxed)
    }

    fn take(&self, id: CommandId) -> Option<PendingInvocation> {
        self.table.lock().entries.remove(&id)
    }
}

// ============================================================================
// PendingGuard
// ============================================================================

/// Removes a pending invocation when its caller stops waiting.
///
/// Dropped on every exit path of an invocation: success, error, timeout, or
/// the caller's future being dropped.
pub(crate) struct PendingGuard<'a> {
    correlator: &'a Correlator,
    id: CommandId,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(correlator: &'a Correlator, id: CommandId) -> Self {
        Self { correlator, id }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.correlator.cancel(self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================
