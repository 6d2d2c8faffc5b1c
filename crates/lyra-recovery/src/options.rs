#![forbid(unsafe_code)]

use std::time::Duration;

/// Default stall grace window.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Recovery tuning for one session.
#[derive(Clone, Copy, Debug)]
pub struct RecoveryOptions {
    /// How long a stall is tolerated before a reload is issued.
    pub grace: Duration,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            grace: DEFAULT_GRACE,
        }
    }
}

impl RecoveryOptions {
    /// Create options with the default grace window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stall grace window.
    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}
