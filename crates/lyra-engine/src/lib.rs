#![forbid(unsafe_code)]

//! Playback element and streaming engine seams for the lyra watchdog.
//!
//! The watchdog drives playback through two traits: [`MediaElement`], the
//! platform playback surface, and [`StreamEngine`], a software
//! segment-fetching engine built by a [`StreamEngineFactory`]. A one-shot
//! capability probe ([`select_engine`]) picks between them, and
//! [`EngineBinding`] wraps the winner behind a uniform capability set so
//! recovery logic never branches on engine kind.

mod binding;
mod element;
mod engine;
mod error;
mod probe;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use binding::{EngineBinding, EngineKind, ManagedBinding, NativeBinding};
pub use element::MediaElement;
pub use engine::{StreamEngine, StreamEngineFactory};
pub use error::{ElementError, EngineError, EngineResult};
pub use probe::{select_engine, HLS_MIME_TYPE};
