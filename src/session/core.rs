//! Session façade and event loop.
//!
//! A [`Session`] owns one transport. It spawns a single event loop task that
//! is the only reader and the only writer of that transport:
//!
//! - Inbound frames are decoded in arrival order and routed to the
//!   correlator (frames with an id) or the dispatcher (events)
//! - Outbound frames from concurrent callers are queued through one channel
//!   and written whole, one at a time
//!
//! # Example
//!
//! ```no_run
//! use cdtp::{Session, SessionOptions};
//! use cdtp::domain::input::{DispatchKeyEventParams, KeyEventType};
//!
//! # async fn example() -> cdtp::Result<()> {
//! let session = Session::connect("ws://127.0.0.1:9222/devtools/page/ABC", SessionOptions::new()).await?;
//!
//! let key = DispatchKeyEventParams::new(KeyEventType::KeyDown).with_code("KeyA");
//! session.call(&key).await?;
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::{CommandId, SubscriptionId};
use crate::protocol::{Command, Envelope, Event, codec};
use crate::transport::{FrameSink, FrameSource, Transport, WebSocketTransport};

use super::builder::SessionBuilder;
use super::correlator::{Correlator, PendingGuard};
use super::dispatcher::{Dispatcher, EventStream};
use super::options::SessionOptions;

// ============================================================================
// LoopCommand
// ============================================================================

/// Internal commands for the event loop.
enum LoopCommand {
    /// Write an encoded command frame.
    Send { id: CommandId, frame: String },
    /// Close the transport and stop.
    Shutdown,
}

// ============================================================================
// Counters
// ============================================================================

/// Inbound frames dropped by the event loop.
#[derive(Debug, Default)]
struct LoopCounters {
    malformed: AtomicU64,
    unserved: AtomicU64,
}

/// Snapshot of session activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Commands awaiting a response.
    pub pending: usize,
    /// Active event subscriptions.
    pub subscriptions: usize,
    /// Responses discarded because no command was pending under their id.
    pub stale_responses: u64,
    /// Frames that decoded to no envelope shape.
    pub malformed_frames: u64,
    /// Commands sent by the remote end, which a client does not serve.
    pub unserved_commands: u64,
}

impl SessionStats {
    /// Total inbound frames discarded without reaching anyone.
    #[inline]
    #[must_use]
    pub fn anomalies(&self) -> u64 {
        self.stale_responses + self.malformed_frames + self.unserved_commands
    }
}

// ============================================================================
// Session
// ============================================================================

/// A command/event session over one transport.
///
/// # Thread Safety
///
/// `Session` is `Clone + Send + Sync`. Clones share the same connection and
/// may call and subscribe concurrently. When the last clone is dropped the
/// event loop closes the transport.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("pending", &self.pending_count())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

struct SessionInner {
    command_tx: mpsc::UnboundedSender<LoopCommand>,
    correlator: Arc<Correlator>,
    dispatcher: Arc<Dispatcher>,
    counters: Arc<LoopCounters>,
    options: SessionOptions,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

// ============================================================================
// Session - Lifecycle
// ============================================================================

impl Session {
    /// Returns a builder for configuring a session.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Opens a session over an established transport.
    ///
    /// Spawns the event loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `options` are invalid.
    pub fn open<T: Transport>(transport: T, options: SessionOptions) -> Result<Self> {
        options.validate()?;

        let (source, sink) = transport.split();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlator = Arc::new(Correlator::new(options.max_pending));
        let dispatcher = Dispatcher::new();
        let counters = Arc::new(LoopCounters::default());

        let handle = tokio::spawn(Self::run_event_loop(
            source,
            sink,
            command_rx,
            Arc::clone(&correlator),
            Arc::clone(&dispatcher),
            Arc::clone(&counters),
        ));

        Ok(Self {
            inner: Arc::new(SessionInner {
                command_tx,
                correlator,
                dispatcher,
                counters,
                options,
                event_loop: Mutex::new(Some(handle)),
            }),
        })
    }

    /// Connects to a WebSocket endpoint and opens a session over it.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the URL is not `ws://` or `wss://`, or the
    ///   options are invalid
    /// - [`Error::ConnectionTimeout`] if the handshake exceeds
    ///   `connect_timeout`
    /// - [`Error::Connection`] if the handshake fails
    pub async fn connect(url: &str, options: SessionOptions) -> Result<Self> {
        options.validate()?;
        let url = validate_ws_url(url)?;

        let limit = options.connect_timeout;
        let transport = timeout(limit, WebSocketTransport::connect(url.as_str()))
            .await
            .map_err(|_| Error::connection_timeout(saturating_millis(limit)))??;

        Self::open(transport, options)
    }

    /// Closes the session.
    ///
    /// Fails every pending call with [`Error::ConnectionClosed`], ends every
    /// event stream, stops the event loop and releases the transport.
    /// Calling it again is a no-op.
    pub async fn close(&self) {
        let failed = self.inner.correlator.close();
        let ended = self.inner.dispatcher.close();
        let _ = self.inner.command_tx.send(LoopCommand::Shutdown);

        let handle = self.inner.event_loop.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "Event loop task failed");
            }
            debug!(failed, ended, "Session closed");
        }
    }

    /// Returns `true` once the session is closed or its transport ended.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.correlator.is_closed()
    }

    /// Returns the session options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.inner.options
    }
}

// ============================================================================
// Session - Commands
// ============================================================================

impl Session {
    /// Sends a typed command and waits for its typed result.
    ///
    /// Uses the session's default timeout, if any.
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if the remote end answered with an error
    /// - [`Error::Timeout`] if the default timeout elapsed
    /// - [`Error::ConnectionClosed`] if the session closed first
    /// - [`Error::Json`] if params or result don't (de)serialize
    pub async fn call<C: Command>(&self, params: &C) -> Result<C::Response> {
        self.invoke_as(C::METHOD, params).await
    }

    /// Sends a typed command with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn call_with_timeout<C: Command>(
        &self,
        params: &C,
        limit: Duration,
    ) -> Result<C::Response> {
        let result = self.dispatch(C::METHOD, params, Some(limit)).await?;
        codec::decode_payload(result)
    }

    /// Sends a command by method name and decodes the result as `R`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn invoke_as<P, R>(&self, method: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result = self.dispatch(method, params, self.inner.options.default_timeout).await?;
        codec::decode_payload(result)
    }

    /// Sends a command by method name and returns the raw result.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn invoke<P>(&self, method: &str, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.dispatch(method, params, self.inner.options.default_timeout).await
    }

    /// Sends a command by method name with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn invoke_with_timeout<P>(
        &self,
        method: &str,
        params: &P,
        limit: Duration,
    ) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.dispatch(method, params, Some(limit)).await
    }

    /// Registers, encodes, queues and awaits one command.
    ///
    /// The pending entry is removed on every exit path, including the
    /// caller dropping this future.
    async fn dispatch<P>(&self, method: &str, params: &P, limit: Option<Duration>) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let correlator = &self.inner.correlator;

        let (id, response_rx) = correlator.register(method)?;
        let _guard = PendingGuard::new(correlator, id);

        let frame = codec::encode_command(id, method, params)?;

        self.inner
            .command_tx
            .send(LoopCommand::Send { id, frame })
            .map_err(|_| Error::ConnectionClosed)?;

        trace!(%id, method, "Command queued");

        let received = match limit {
            Some(limit) => match timeout(limit, response_rx).await {
                Ok(received) => received,
                Err(_) => {
                    let timeout_ms = saturating_millis(limit);
                    debug!(%id, method, timeout_ms, "Command timed out");
                    return Err(Error::timeout(method, id, timeout_ms));
                }
            },
            None => response_rx.await,
        };

        match received {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::ConnectionClosed),
        }
    }
}

// ============================================================================
// Session - Events
// ============================================================================

impl Session {
    /// Subscribes to a typed event.
    #[must_use]
    pub fn events<E: Event>(&self) -> EventStream<E> {
        self.inner.dispatcher.subscribe(E::NAME)
    }

    /// Subscribes to an event by name, yielding raw payloads.
    #[must_use]
    pub fn events_raw(&self, name: impl Into<String>) -> EventStream<Value> {
        self.inner.dispatcher.subscribe(name)
    }

    /// Subscribes to an event by name, decoding payloads as `T`.
    #[must_use]
    pub fn events_as<T: DeserializeOwned>(&self, name: impl Into<String>) -> EventStream<T> {
        self.inner.dispatcher.subscribe(name)
    }

    /// Cancels a subscription by id.
    ///
    /// The stream then yields whatever was already queued and ends.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.dispatcher.unsubscribe(id)
    }
}

// ============================================================================
// Session - Introspection
// ============================================================================

impl Session {
    /// Returns the number of commands awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.correlator.pending_count()
    }

    /// Returns the number of inbound frames discarded as anomalies.
    #[inline]
    #[must_use]
    pub fn anomaly_count(&self) -> u64 {
        self.stats().anomalies()
    }

    /// Returns a snapshot of session activity.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            pending: self.inner.correlator.pending_count(),
            subscriptions: self.inner.dispatcher.subscription_count(),
            stale_responses: self.inner.correlator.stale_count(),
            malformed_frames: self.inner.counters.malformed.load(Ordering::Relaxed),
            unserved_commands: self.inner.counters.unserved.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// Session - Event Loop
// ============================================================================

impl Session {
    /// Event loop that owns the transport.
    async fn run_event_loop<Src, Snk>(
        mut source: Src,
        mut sink: Snk,
        mut command_rx: mpsc::UnboundedReceiver<LoopCommand>,
        correlator: Arc<Correlator>,
        dispatcher: Arc<Dispatcher>,
        counters: Arc<LoopCounters>,
    ) where
        Src: FrameSource,
        Snk: FrameSink,
    {
        debug!("Event loop started");

        loop {
            tokio::select! {
                // Incoming frames from the remote end
                frame = source.next_frame() => {
                    match frame {
                        Some(Ok(text)) => {
                            Self::handle_incoming_frame(&text, &correlator, &dispatcher, &counters);
                        }

                        Some(Err(e)) if e.is_malformed_frame() => {
                            counters.malformed.fetch_add(1, Ordering::Relaxed);
                            warn!(error = %e, "Dropping undecodable frame");
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "Transport read failed");
                            break;
                        }

                        None => {
                            debug!("Transport closed by remote");
                            break;
                        }
                    }
                }

                // Commands from callers
                command = command_rx.recv() => {
                    match command {
                        Some(LoopCommand::Send { id, frame }) => {
                            match sink.send_frame(frame).await {
                                Ok(()) => trace!(%id, "Command sent"),
                                Err(e) => {
                                    error!(%id, error = %e, "Transport write failed");
                                    break;
                                }
                            }
                        }

                        Some(LoopCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            if let Err(e) = sink.close().await {
                                debug!(error = %e, "Transport close failed");
                            }
                            break;
                        }

                        None => {
                            debug!("All session handles dropped");
                            let _ = sink.close().await;
                            break;
                        }
                    }
                }
            }
        }

        // Fail everything still waiting
        correlator.close();
        dispatcher.close();

        debug!("Event loop terminated");
    }

    /// Routes one inbound frame.
    fn handle_incoming_frame(
        text: &str,
        correlator: &Correlator,
        dispatcher: &Dispatcher,
        counters: &LoopCounters,
    ) {
        match codec::decode(text) {
            Ok(Envelope::Result(response)) => {
                correlator.resolve(response.id, Ok(response.result));
            }

            Ok(Envelope::Error(response)) => {
                correlator.resolve(response.id, Err(response.error.into()));
            }

            Ok(Envelope::Event(event)) => {
                dispatcher.publish(&event.method, event.params);
            }

            Ok(Envelope::Command(command)) => {
                counters.unserved.fetch_add(1, Ordering::Relaxed);
                warn!(
                    id = %command.id,
                    method = %command.method,
                    "Ignoring command from remote end"
                );
            }

            Err(e) => {
                counters.malformed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, frame = %text, "Dropping malformed frame");
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Parses a WebSocket endpoint URL.
fn validate_ws_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::config(format!("Invalid URL {raw:?}: {e}")))?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(Error::config(format!(
            "Unsupported URL scheme {other:?}, expected ws or wss"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
