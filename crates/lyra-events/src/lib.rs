#![forbid(unsafe_code)]

//! Event vocabulary and broadcast bus for the lyra playback watchdog.
//!
//! Three event families share one bus:
//! - [`ElementEvent`] — raw playback-element lifecycle (pause, waiting,
//!   timeupdate, play, error, canplay),
//! - [`EngineEvent`] — notifications from the managed streaming engine,
//! - [`SessionEvent`] — watchdog decisions (stall episodes, reloads,
//!   recovery outcomes).
//!
//! Components hold a cloned [`EventBus`] and publish into it directly;
//! subscribers see the unified [`Event`] stream.

mod bus;
mod element;
mod engine;
mod event;
mod session;

pub use bus::{EventBus, DEFAULT_EVENT_CAPACITY};
pub use element::ElementEvent;
pub use engine::EngineEvent;
pub use event::Event;
pub use session::{ReloadTrigger, SessionEvent};
