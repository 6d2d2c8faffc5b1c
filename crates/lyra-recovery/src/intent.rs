#![forbid(unsafe_code)]

/// Why playback is currently stopped, from the session's point of view.
///
/// The distinction drives the whole recovery policy: a deliberate pause must
/// never be auto-resumed, while a fault pause is resumed with a reload once
/// the element asks to play again (or a pending stall deadline fires).
/// Cleared back to [`PauseIntent::None`] on successful resumption only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PauseIntent {
    /// No pause recorded.
    #[default]
    None,
    /// The user or host paused on purpose.
    Deliberate,
    /// Playback stopped unexpectedly (element error or expired stall).
    Fault,
}

impl PauseIntent {
    /// True when recovery is expected to auto-resume with a reload.
    #[must_use]
    pub fn is_fault(self) -> bool {
        matches!(self, Self::Fault)
    }
}
