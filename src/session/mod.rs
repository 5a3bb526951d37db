//! Session layer: correlation, event dispatch and the connection façade.
//!
//! # Data Flow
//!
//! ```text
//! caller ── call(params) ──► Correlator.register ──► encode ──► event loop ──► transport
//!                                                                                  │
//! caller ◄── result/error ◄── Correlator.resolve ◄── frame has id ◄── decode ◄─────┤
//!                                                                                  │
//! stream ◄── payload ◄────── Dispatcher.publish ◄── frame has no id ◄──────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent session configuration |
//! | `core` | `Session` façade and event loop |
//! | `correlator` | Pending invocation table |
//! | `dispatcher` | Subscription registry and event streams |
//! | `options` | `SessionOptions` |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent session configuration.
pub mod builder;

/// Session façade and event loop.
pub mod core;

/// Pending invocation table.
pub mod correlator;

/// Subscription registry and event streams.
pub mod dispatcher;

/// Session configuration.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use core::{Session, SessionStats};
pub use correlator::Correlator;
pub use dispatcher::{Dispatcher, EventStream};
pub use options::SessionOptions;
