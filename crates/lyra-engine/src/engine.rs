#![forbid(unsafe_code)]

use std::{fmt::Debug, sync::Arc};

use lyra_events::EngineEvent;
use tokio::sync::broadcast;
use url::Url;

use crate::{EngineResult, MediaElement};

/// Contract for a software segment-fetching engine.
///
/// Mirrors the control surface of hls.js-style engines: the engine parses
/// the manifest, fetches segments, and feeds them into the element attached
/// to it. Commands are synchronous from the caller's view; the engine does
/// its work on its own tasks.
///
/// `load_source` and `attach_media` must be safe to re-issue on a live
/// engine — the watchdog reloads by repeating them rather than rebuilding
/// the engine.
pub trait StreamEngine: Send + Sync + 'static {
    /// Begin loading the manifest and segments for `url`.
    fn load_source(&self, url: &Url);

    /// Bind the engine's output to the playback element.
    fn attach_media(&self, element: Arc<dyn MediaElement>);

    /// Halt segment fetching, keeping buffers and attachment.
    fn stop_load(&self);

    /// Resume segment fetching.
    fn start_load(&self);

    /// Release every engine resource. Called at most once.
    fn destroy(&self);

    /// Subscribe to engine notifications.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}

/// Builds managed engines after a platform capability probe.
///
/// The config type is opaque pass-through: the session stores it and hands
/// it to [`StreamEngineFactory::create`] untouched.
pub trait StreamEngineFactory: Send + Sync + 'static {
    /// Engine this factory builds.
    type Engine: StreamEngine;

    /// Engine configuration, forwarded without interpretation.
    type Config: Clone + Debug + Default + Send + Sync + 'static;

    /// Whether the managed engine can run on this platform.
    fn is_supported(&self) -> bool;

    /// Build a fresh engine.
    fn create(&self, config: &Self::Config) -> EngineResult<Self::Engine>;
}
