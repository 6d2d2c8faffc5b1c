#![forbid(unsafe_code)]

//! # Lyra
//!
//! Self-healing playback sessions for adaptive streams.
//!
//! A [`Session`] binds a stream URL to a playback element through the best
//! available engine (a managed streaming engine where supported, the
//! element's native decoder otherwise) and then supervises playback: a
//! stall that outlives the grace window reloads the stream exactly once
//! per episode, and an element fault pauses cleanly and reloads in place
//! when the user presses play again.
//!
//! ## Quick start
//!
//! ```ignore
//! use lyra::prelude::*;
//!
//! let config = SessionConfig::new(url).with_autoplay(true);
//! let mut session = Session::new(element, HlsFactory::new(), config);
//! session.start().await?;
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod engine {
    pub use lyra_engine::*;
}

pub mod events {
    pub use lyra_events::*;
}

pub mod recovery {
    pub use lyra_recovery::*;
}

// ── Session ─────────────────────────────────────────────────────────────

mod config;
mod driver;
mod session;

pub use config::{SessionConfig, SurfaceOptions};
pub use session::Session;

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use lyra_engine::{
        EngineKind, MediaElement, StreamEngine, StreamEngineFactory, HLS_MIME_TYPE,
    };
    pub use lyra_events::{ElementEvent, EngineEvent, Event, SessionEvent};
    pub use lyra_recovery::{RecoveryOptions, RecoveryState};

    pub use crate::{Session, SessionConfig, SurfaceOptions};
}
