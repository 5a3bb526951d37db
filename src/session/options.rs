//! Session configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use cdtp::SessionOptions;
//!
//! let options = SessionOptions::new()
//!     .with_default_timeout(Duration::from_secs(10))
//!     .with_max_pending(256);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for establishing a WebSocket connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SessionOptions
// ============================================================================

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Timeout applied to calls that don't pass their own.
    ///
    /// `None` (the default) waits until a result, an error, or closure.
    pub default_timeout: Option<Duration>,

    /// Maximum in-flight commands; further calls fail fast.
    ///
    /// `None` (the default) means unbounded.
    pub max_pending: Option<usize>,

    /// Timeout for [`Session::connect`](crate::Session::connect).
    pub connect_timeout: Duration,
}

// ============================================================================
// Constructors
// ============================================================================

impl SessionOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_timeout: None,
            max_pending: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SessionOptions {
    /// Sets the default per-call timeout.
    #[inline]
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of in-flight commands.
    #[inline]
    #[must_use]
    pub const fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending = Some(max);
        self
    }

    /// Sets the WebSocket connect timeout.
    #[inline]
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionOptions {
    /// Checks the options for values that can never work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for zero timeouts or a zero pending limit.
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("default_timeout must be greater than zero"));
        }

        if self.max_pending == Some(0) {
            return Err(Error::config("max_pending must be greater than zero"));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::config("connect_timeout must be greater than zero"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
