//! Event dispatch.
//!
//! Routes event envelopes by exact method name to every subscription
//! registered for that name. Each subscription owns its own unbounded queue,
//! so a slow subscriber never holds up the event loop or its siblings.
//!
//! Events published while nobody is subscribed are dropped, not buffered.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::{IdSequence, SubscriptionId};
use crate::protocol::decode_payload;

// ============================================================================
// Types
// ============================================================================

/// Queue feeding one subscription. An `Err` item is always the last one.
type Delivery = mpsc::UnboundedSender<Result<Value>>;

struct Subscriber {
    id: SubscriptionId,
    tx: Delivery,
}

#[derive(Default)]
struct Registry {
    by_name: FxHashMap<String, Vec<Subscriber>>,
    closed: bool,
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Subscription registry for one session.
pub struct Dispatcher {
    ids: IdSequence,
    registry: Mutex<Registry>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ids: IdSequence::new(),
            registry: Mutex::new(Registry::default()),
        })
    }

    /// Registers a subscription for one event name.
    ///
    /// On a closed dispatcher the stream yields [`Error::ConnectionClosed`]
    /// once and ends.
    pub fn subscribe<T>(self: &Arc<Self>, name: impl Into<String>) -> EventStream<T> {
        let name = name.into();
        let id = self.ids.next_subscription();
        let (tx, rx) = mpsc::unbounded_channel();

        {
            let mut registry = self.registry.lock();
            if registry.closed {
                let _ = tx.send(Err(Error::ConnectionClosed));
            } else {
                registry
                    .by_name
                    .entry(name.clone())
                    .or_default()
                    .push(Subscriber { id, tx });
            }
        }

        debug!(%id, event = %name, "Subscribed");

        EventStream {
            id,
            name,
            rx,
            dispatcher: Arc::downgrade(self),
            _marker: PhantomData,
        }
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();

        let mut emptied = None;
        let mut removed = false;
        for (name, subscribers) in registry.by_name.iter_mut() {
            if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
                subscribers.swap_remove(pos);
                removed = true;
                if subscribers.is_empty() {
                    emptied = Some(name.clone());
                }
                break;
            }
        }

        if let Some(name) = emptied {
            registry.by_name.remove(&name);
        }

        if removed {
            trace!(%id, "Unsubscribed");
        }
        removed
    }

    /// Delivers an event payload to every subscriber of `name`.
    ///
    /// Returns the number of subscribers reached. Subscribers whose stream
    /// was dropped are pruned along the way.
    pub fn publish(&self, name: &str, payload: Value) -> usize {
        let mut registry = self.registry.lock();

        let Some(subscribers) = registry.by_name.get_mut(name) else {
            trace!(event = name, "No subscribers, event dropped");
            return 0;
        };

        subscribers.retain(|s| s.tx.send(Ok(payload.clone())).is_ok());
        let delivered = subscribers.len();

        if delivered == 0 {
            registry.by_name.remove(name);
        }

        trace!(event = name, delivered, "Event published");
        delivered
    }

    /// Ends every subscription with [`Error::ConnectionClosed`].
    ///
    /// Returns the number of subscriptions ended.
    pub fn close(&self) -> usize {
        let drained: Vec<Subscriber> = {
            let mut registry = self.registry.lock();
            registry.closed = true;
            registry.by_name.drain().flat_map(|(_, subs)| subs).collect()
        };

        let count = drained.len();
        for subscriber in drained {
            let _ = subscriber.tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Ended subscriptions on close");
        }
        count
    }

    /// Returns the number of subscribers for one event name.
    #[must_use]
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.registry.lock().by_name.get(name).map_or(0, Vec::len)
    }

    /// Returns the number of active subscriptions across all names.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.registry.lock().by_name.values().map(Vec::len).sum()
    }
}

// ============================================================================
// EventStream
// ============================================================================

/// Events of one subscription, decoded as `T`.
///
/// A payload that fails to decode yields an [`Error::Json`] item and the
/// stream continues. Closure of the session yields
/// [`Error::ConnectionClosed`] and ends the stream. Dropping the stream
/// unsubscribes.
///
/// # Example
///
/// ```ignore
/// use futures_util::StreamExt;
///
/// let mut events = session.events_raw("Page.loadEventFired");
/// while let Some(event) = events.next().await {
///     let params = event?;
/// }
/// ```
pub struct EventStream<T> {
    id: SubscriptionId,
    name: String,
    rx: mpsc::UnboundedReceiver<Result<Value>>,
    dispatcher: Weak<Dispatcher>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EventStream<T> {
    /// Returns the subscription id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the subscribed event name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unsubscribes. Same as dropping the stream.
    pub fn cancel(self) {}
}

impl<T: DeserializeOwned> EventStream<T> {
    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Option<Result<T>> {
        self.next().await
    }
}

impl<T: DeserializeOwned> Stream for EventStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut()
            .rx
            .poll_recv(cx)
            .map(|item| item.map(|delivery| delivery.and_then(decode_payload)))
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.upgrade() {
            dispatcher.unsubscribe(self.id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
