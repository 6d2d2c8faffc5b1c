#![forbid(unsafe_code)]

//! Stall episode tracking.
//!
//! A stall episode opens on a `waiting` event and closes on observed
//! progress or on a deadline-driven reload. Re-arming supersedes the open
//! episode; the episode id is the validity token that turns a stale timer
//! firing into a no-op.

use std::time::Duration;

use web_time::Instant;

/// Identifier of one stall episode.
///
/// Incremented on every (re)arm of the [`StallTimer`], wrapping on overflow.
/// A fired deadline is acted on only while its episode still matches the
/// armed one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EpisodeId(u64);

impl EpisodeId {
    /// Raw counter value, as carried in session events.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Single-shot, restartable deadline guarding playback progress.
///
/// At most one episode is armed at a time. [`StallTimer::arm`] opens a fresh
/// episode and supersedes the previous one; [`StallTimer::try_fire`] consumes
/// the armed episode when, and only when, the caller presents the matching
/// id after the deadline passed.
#[derive(Debug)]
pub struct StallTimer {
    grace: Duration,
    armed: Option<Armed>,
    last_issued: EpisodeId,
}

#[derive(Clone, Copy, Debug)]
struct Armed {
    episode: EpisodeId,
    deadline: Instant,
}

impl StallTimer {
    /// Create a timer with the given grace window.
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            armed: None,
            last_issued: EpisodeId::default(),
        }
    }

    /// Grace window this timer was built with.
    #[must_use]
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Open a new stall episode ending `grace` after `now`.
    ///
    /// Any previously armed episode is superseded and can no longer fire.
    pub fn arm(&mut self, now: Instant) -> EpisodeId {
        let episode = self.last_issued.next();
        self.last_issued = episode;
        self.armed = Some(Armed {
            episode,
            deadline: now + self.grace,
        });
        episode
    }

    /// Cancel the armed episode, returning its id if one was pending.
    pub fn disarm(&mut self) -> Option<EpisodeId> {
        self.armed.take().map(|armed| armed.episode)
    }

    /// Whether an episode is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// The armed episode and its deadline, if any.
    #[must_use]
    pub fn pending(&self) -> Option<(EpisodeId, Instant)> {
        self.armed.map(|armed| (armed.episode, armed.deadline))
    }

    /// Consume a deadline firing.
    ///
    /// Returns true and disarms only when `episode` is the armed episode and
    /// its deadline has passed. Superseded, already-consumed, and premature
    /// firings return false and leave the timer untouched.
    pub fn try_fire(&mut self, episode: EpisodeId, now: Instant) -> bool {
        match self.armed {
            Some(armed) if armed.episode == episode && now >= armed.deadline => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: Duration = Duration::from_secs(5);

    fn timer() -> (StallTimer, Instant) {
        (StallTimer::new(GRACE), Instant::now())
    }

    #[test]
    fn arm_sets_deadline_one_grace_window_out() {
        let (mut timer, t0) = timer();
        let episode = timer.arm(t0);
        assert_eq!(timer.pending(), Some((episode, t0 + GRACE)));
    }

    #[test]
    fn episode_ids_increase_per_arm() {
        let (mut timer, t0) = timer();
        let first = timer.arm(t0);
        let second = timer.arm(t0);
        assert_eq!(first.value() + 1, second.value());
    }

    #[test]
    fn premature_fire_keeps_episode_armed() {
        let (mut timer, t0) = timer();
        let episode = timer.arm(t0);
        assert!(!timer.try_fire(episode, t0 + GRACE - Duration::from_millis(100)));
        assert!(timer.is_armed());
    }

    #[test]
    fn fire_at_deadline_consumes_episode() {
        let (mut timer, t0) = timer();
        let episode = timer.arm(t0);
        assert!(timer.try_fire(episode, t0 + GRACE));
        assert!(!timer.is_armed());
        assert!(!timer.try_fire(episode, t0 + GRACE));
    }

    #[test]
    fn superseded_episode_cannot_fire() {
        let (mut timer, t0) = timer();
        let stale = timer.arm(t0);
        let current = timer.arm(t0 + Duration::from_secs(1));
        assert!(!timer.try_fire(stale, t0 + Duration::from_secs(20)));
        assert!(timer.is_armed());
        assert!(timer.try_fire(current, t0 + Duration::from_secs(20)));
    }

    #[test]
    fn disarm_returns_pending_episode() {
        let (mut timer, t0) = timer();
        let episode = timer.arm(t0);
        assert_eq!(timer.disarm(), Some(episode));
        assert_eq!(timer.disarm(), None);
        assert!(!timer.try_fire(episode, t0 + GRACE));
    }

    #[test]
    fn episode_counter_wraps() {
        assert_eq!(EpisodeId(u64::MAX).next(), EpisodeId(0));
    }
}
