#![forbid(unsafe_code)]

//! Stall detection and recovery decisions for one playback session.
//!
//! This crate is the synchronous core of the watchdog. It interprets the
//! playback element's event stream, tolerates brief rebuffering inside a
//! grace window, distinguishes deliberate pauses from faults, and decides
//! when the live engine binding must be reloaded — exactly once per stall
//! episode.
//!
//! Nothing here performs I/O or holds an engine handle. Every entry point on
//! [`RecoveryController`] takes the current instant where timing matters and
//! returns the [`RecoveryAction`] commands the caller executes, which keeps
//! the whole state machine testable with synthetic clocks.

mod controller;
mod intent;
mod options;
mod stall;

pub use controller::{RecoveryAction, RecoveryController, RecoveryState};
pub use intent::PauseIntent;
pub use options::{RecoveryOptions, DEFAULT_GRACE};
pub use stall::{EpisodeId, StallTimer};
