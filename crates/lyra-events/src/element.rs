#![forbid(unsafe_code)]

use std::time::Duration;

/// Lifecycle events emitted by the playback element.
///
/// These mirror the platform media-element events the watchdog consumes.
/// The recovery state machine interprets the first five; `CanPlay` feeds
/// autoplay and post-reload resumption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementEvent {
    /// Playback was paused, by the user, the application, or a command.
    Pause,
    /// Playback halted because the next frame is not buffered yet.
    Waiting,
    /// The playback position advanced.
    TimeUpdate {
        /// Current playback position.
        position: Duration,
    },
    /// Playback started or resumed.
    Play,
    /// The element failed to fetch or decode media data.
    Error {
        /// Platform-reported failure description.
        message: String,
    },
    /// Enough data is buffered to begin playback.
    CanPlay,
}
