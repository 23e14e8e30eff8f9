//! Headless testing helpers: Pilot, snapshot outlines.
//!
//! Use the [`Pilot`] to drive a [`Page`](crate::runtime::Page) with pointer,
//! window, and clock input. Use [`outline`] to capture a document subtree as
//! text for snapshot assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::{Pilot, Recorder};
pub use snapshot::{describe, outline};
