//! Builder pattern for session configuration.
//!
//! Provides a fluent API for configuring and opening [`Session`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use cdtp::Session;
//!
//! # async fn example() -> cdtp::Result<()> {
//! let session = Session::builder()
//!     .default_timeout(Duration::from_secs(10))
//!     .max_pending(512)
//!     .connect("ws://127.0.0.1:9222/devtools/page/ABC")
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::Result;
use crate::transport::Transport;

use super::core::Session;
use super::options::SessionOptions;

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a [`Session`].
///
/// Use [`Session::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    options: SessionOptions,
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout for calls that don't pass their own.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum wait per call
    #[inline]
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.options.default_timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of in-flight commands.
    #[inline]
    #[must_use]
    pub fn max_pending(mut self, max: usize) -> Self {
        self.options.max_pending = Some(max);
        self
    }

    /// Sets the WebSocket connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Replaces all options at once.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options configured so far.
    #[inline]
    #[must_use]
    pub fn build_options(&self) -> &SessionOptions {
        &self.options
    }

    /// Opens a session over an established transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the options are
    /// invalid.
    pub fn open<T: Transport>(self, transport: T) -> Result<Session> {
        Session::open(transport, self.options)
    }

    /// Connects to a WebSocket endpoint and opens a session.
    ///
    /// # Errors
    ///
    /// See [`Session::connect`].
    pub async fn connect(self, url: &str) -> Result<Session> {
        Session::connect(url, self.options).await
    }
}

// ============================================================================
// Tests
// ============================================================================
