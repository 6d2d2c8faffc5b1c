#![forbid(unsafe_code)]

//! The watchdog state machine.
//!
//! `RecoveryController` consumes playback-element events and decides when
//! the live engine binding must be reloaded. It is synchronous and
//! time-explicit: entry points take `now` where timing matters and return
//! the commands the caller executes. The controller never touches the
//! engine or the element itself and never branches on engine kind.
//!
//! Transitions publish [`SessionEvent`]s on the shared bus so hosts and
//! tests can observe stall episodes and recovery outcomes.

use lyra_events::{ElementEvent, EventBus, ReloadTrigger, SessionEvent};
use tracing::{debug, warn};
use web_time::Instant;

use crate::{EpisodeId, PauseIntent, RecoveryOptions, StallTimer};

/// Watchdog state for one playback session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoveryState {
    /// No source bound; all events are ignored.
    #[default]
    Idle,
    /// Source bound and subscribed; playback is expected to progress.
    Loaded,
    /// Paused on purpose; recovery must leave it alone.
    PausedByIntent,
    /// Stopped by a fault; the next play (or a pending deadline) reloads.
    PausedByFault,
    /// A stall episode is open and the grace window is running.
    Stalled,
    /// A stall reload is in flight, waiting for its resume outcome.
    Reloading,
}

/// Commands the session driver executes against the binding and element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Stop segment fetching; the decoder stays paused with the element.
    PauseNetwork,
    /// Pause the playback element.
    PauseElement,
    /// Restart segment fetching without touching the source.
    ResumeNetwork,
    /// Re-issue source and attachment on the live binding, then attempt an
    /// asynchronous resume whose outcome is reported back through
    /// [`RecoveryController::on_resume_settled`] with the same episode.
    ReloadAndPlay {
        /// Stall episode this reload answers.
        episode: EpisodeId,
    },
    /// Re-issue source and attachment behind an element that just asked to
    /// play: resume network fetch and reload the element in place.
    ReloadInPlace,
}

/// The recovery watchdog for one playback session.
///
/// Owned by the session driver; not shared. Exactly-once reload per stall
/// episode is enforced twice over: the stall timer consumes an episode on
/// firing, and the in-flight guard blocks re-entrant reloads until the
/// resume outcome settles.
#[derive(Debug)]
pub struct RecoveryController {
    state: RecoveryState,
    stall: StallTimer,
    intent: PauseIntent,
    in_flight: Option<EpisodeId>,
    bus: EventBus,
}

impl RecoveryController {
    /// Create an idle controller publishing on `bus`.
    #[must_use]
    pub fn new(options: RecoveryOptions, bus: EventBus) -> Self {
        Self {
            state: RecoveryState::Idle,
            stall: StallTimer::new(options.grace),
            intent: PauseIntent::None,
            in_flight: None,
            bus,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RecoveryState {
        self.state
    }

    /// Current pause intent.
    #[must_use]
    pub fn intent(&self) -> PauseIntent {
        self.intent
    }

    /// The armed stall episode and its deadline, if any.
    ///
    /// The driver sleeps until the deadline and reports expiry through
    /// [`RecoveryController::on_stall_deadline`] with the paired episode.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<(EpisodeId, Instant)> {
        self.stall.pending()
    }

    /// Leave `Idle` once the session has bound the source and subscribed.
    pub fn activate(&mut self) {
        if self.state == RecoveryState::Idle {
            self.state = RecoveryState::Loaded;
        }
    }

    /// Back to `Idle`: disarm the timer, clear intent and in-flight guard.
    pub fn reset(&mut self) {
        self.state = RecoveryState::Idle;
        self.stall.disarm();
        self.intent = PauseIntent::None;
        self.in_flight = None;
    }

    /// Apply one playback-element event.
    pub fn on_event(&mut self, event: &ElementEvent, now: Instant) -> Vec<RecoveryAction> {
        if self.state == RecoveryState::Idle {
            return Vec::new();
        }
        match event {
            ElementEvent::Pause => self.on_pause(),
            ElementEvent::Waiting => self.on_waiting(now),
            ElementEvent::TimeUpdate { .. } => self.on_progress(),
            ElementEvent::Play => self.on_play(),
            ElementEvent::Error { message } => self.on_error(message),
            // Readiness feeds autoplay at the driver level, not recovery.
            ElementEvent::CanPlay => Vec::new(),
        }
    }

    /// The stall deadline for `episode` expired.
    ///
    /// A firing is acted on only when the episode is still the armed one,
    /// the deadline really passed, no reload is in flight, and the state is
    /// one a stall reload may start from. Everything else is a stale firing
    /// and a no-op.
    pub fn on_stall_deadline(&mut self, episode: EpisodeId, now: Instant) -> Vec<RecoveryAction> {
        if !self.stall.try_fire(episode, now) {
            return Vec::new();
        }
        if self.in_flight.is_some() {
            debug!(
                episode = episode.value(),
                "stall deadline while reload in flight, discarded"
            );
            return Vec::new();
        }
        if !matches!(
            self.state,
            RecoveryState::Stalled | RecoveryState::PausedByFault
        ) {
            debug!(
                state = ?self.state,
                episode = episode.value(),
                "stall deadline outside stall state, discarded"
            );
            return Vec::new();
        }
        self.intent = PauseIntent::Fault;
        self.in_flight = Some(episode);
        self.state = RecoveryState::Reloading;
        warn!(
            episode = episode.value(),
            grace = ?self.stall.grace(),
            "no playback progress within grace window, reloading"
        );
        self.bus.publish(SessionEvent::ReloadIssued {
            trigger: ReloadTrigger::StallDeadline,
        });
        vec![RecoveryAction::ReloadAndPlay { episode }]
    }

    /// Outcome of the asynchronous resume issued by a stall reload.
    ///
    /// Completions whose episode does not match the in-flight guard are
    /// stale (superseded by an error, a restart, or a newer reload) and are
    /// discarded. Failures are swallowed: the episode is abandoned and the
    /// session stays paused by fault until the next event re-arms recovery.
    pub fn on_resume_settled(&mut self, episode: EpisodeId, outcome: Result<(), String>) {
        if self.in_flight != Some(episode) {
            debug!(episode = episode.value(), "stale resume completion discarded");
            return;
        }
        self.in_flight = None;
        match outcome {
            Ok(()) => {
                self.intent = PauseIntent::None;
                self.state = RecoveryState::Loaded;
                debug!(episode = episode.value(), "playback recovered");
                self.bus.publish(SessionEvent::Recovered {
                    episode: episode.value(),
                });
            }
            Err(error) => {
                self.state = RecoveryState::PausedByFault;
                warn!(
                    episode = episode.value(),
                    error = %error,
                    "resume after reload failed, episode abandoned"
                );
                self.bus.publish(SessionEvent::RecoveryFailed {
                    episode: episode.value(),
                    error,
                });
            }
        }
    }

    fn on_pause(&mut self) -> Vec<RecoveryAction> {
        match self.state {
            RecoveryState::Loaded | RecoveryState::Stalled => {
                // A pending episode must not fire into a deliberate pause.
                if let Some(episode) = self.stall.disarm() {
                    self.bus.publish(SessionEvent::StallCleared {
                        episode: episode.value(),
                    });
                }
                self.intent = PauseIntent::Deliberate;
                self.state = RecoveryState::PausedByIntent;
                debug!("deliberate pause, stopping network fetch");
                vec![RecoveryAction::PauseNetwork]
            }
            // Echo of a pause this watchdog commanded (fault or reload
            // path); absorbing it keeps the fault intent intact.
            _ => Vec::new(),
        }
    }

    fn on_waiting(&mut self, now: Instant) -> Vec<RecoveryAction> {
        if self.state == RecoveryState::PausedByIntent {
            // No progress is expected while deliberately paused.
            return Vec::new();
        }
        let episode = self.stall.arm(now);
        if self.state != RecoveryState::Reloading {
            self.state = RecoveryState::Stalled;
        }
        debug!(
            episode = episode.value(),
            grace = ?self.stall.grace(),
            "stall window armed"
        );
        self.bus.publish(SessionEvent::StallArmed {
            episode: episode.value(),
        });
        Vec::new()
    }

    fn on_progress(&mut self) -> Vec<RecoveryAction> {
        if let Some(episode) = self.stall.disarm() {
            debug!(episode = episode.value(), "progress observed, stall cleared");
            self.bus.publish(SessionEvent::StallCleared {
                episode: episode.value(),
            });
        }
        if self.state == RecoveryState::Stalled {
            self.state = RecoveryState::Loaded;
        }
        Vec::new()
    }

    fn on_play(&mut self) -> Vec<RecoveryAction> {
        if let Some(episode) = self.stall.disarm() {
            self.bus.publish(SessionEvent::StallCleared {
                episode: episode.value(),
            });
        }
        if self.state == RecoveryState::Reloading {
            // The reload's own resume starting; the settled outcome decides.
            return Vec::new();
        }
        let actions = match self.intent {
            PauseIntent::Fault => {
                debug!("play after fault pause, reloading in place");
                self.bus.publish(SessionEvent::ReloadIssued {
                    trigger: ReloadTrigger::FaultResume,
                });
                vec![RecoveryAction::ReloadInPlace]
            }
            PauseIntent::Deliberate => vec![RecoveryAction::ResumeNetwork],
            PauseIntent::None => Vec::new(),
        };
        self.intent = PauseIntent::None;
        self.state = RecoveryState::Loaded;
        actions
    }

    fn on_error(&mut self, message: &str) -> Vec<RecoveryAction> {
        // The stall timer stays armed: a pending deadline may still drive
        // the reload for a fault pause.
        self.intent = PauseIntent::Fault;
        if self.in_flight.take().is_some() {
            debug!("fault while reload in flight, episode abandoned");
        }
        self.state = RecoveryState::PausedByFault;
        warn!(error = message, "element fault, pausing for recovery");
        vec![RecoveryAction::PauseNetwork, RecoveryAction::PauseElement]
    }
}
