#![forbid(unsafe_code)]

/// Notifications from the managed streaming engine.
///
/// The watchdog consumes a deliberately narrow slice of the engine's event
/// surface; everything else (level switches, fragment loads) stays internal
/// to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// The manifest was parsed and the stream is ready for playback.
    ///
    /// Fires again after every `load_source`, including reloads on a live
    /// engine.
    ManifestReady,
}
