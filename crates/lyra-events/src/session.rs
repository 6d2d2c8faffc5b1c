#![forbid(unsafe_code)]

/// Why a reload sequence was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// No playback progress within the stall grace window.
    StallDeadline,
    /// Playback resumed after a fault pause.
    FaultResume,
}

/// Watchdog decisions and session lifecycle, published for hosts and tests.
///
/// Stall episodes are identified by a session-local counter; the same value
/// appears in `StallArmed` and in whichever of `StallCleared`, `Recovered`,
/// or `RecoveryFailed` closes the episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session bound an engine and subscribed to element events.
    Started,
    /// A stall episode opened; the grace window is running.
    StallArmed {
        /// Episode counter value for this stall.
        episode: u64,
    },
    /// Playback progressed before the grace window elapsed.
    StallCleared {
        /// Episode that was pending.
        episode: u64,
    },
    /// A reload sequence was issued against the live binding.
    ReloadIssued {
        /// What drove the reload.
        trigger: ReloadTrigger,
    },
    /// Playback resumed after a stall reload.
    Recovered {
        /// Episode the reload belonged to.
        episode: u64,
    },
    /// The resume attempt after a reload failed; the session stays paused
    /// by fault and waits for the next event.
    RecoveryFailed {
        /// Episode the reload belonged to.
        episode: u64,
        /// Platform-reported failure description.
        error: String,
    },
    /// The session tore its binding down.
    Stopped,
}
