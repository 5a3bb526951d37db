//! Domain schema records.
//!
//! Each domain module provides params and result types that implement
//! [`Command`](crate::protocol::Command) and [`Event`](crate::protocol::Event).
//! The session never looks inside them.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `input` | Keyboard, mouse, touch and gesture dispatch |

/// `Input` domain commands.
pub mod input;
