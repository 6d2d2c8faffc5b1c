#![forbid(unsafe_code)]

//! The per-session supervision task.
//!
//! One driver owns one engine binding and one [`RecoveryController`]. It
//! pumps element and engine events into the controller, sleeps on the
//! armed stall deadline, and executes the commands the controller returns.
//! The controller stays synchronous; everything that waits lives here.

use std::{future, sync::Arc, time::Instant};

use lyra_engine::{EngineBinding, EngineKind, MediaElement, StreamEngine};
use lyra_events::{ElementEvent, EngineEvent, EventBus};
use lyra_recovery::{EpisodeId, RecoveryAction, RecoveryController};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Result of the asynchronous resume a stall reload kicked off.
struct ResumeOutcome {
    episode: EpisodeId,
    result: Result<(), String>,
}

enum EngineSignal {
    Event(EngineEvent),
    Lagged(u64),
    Closed,
}

pub(crate) struct Driver<E: StreamEngine> {
    element: Arc<dyn MediaElement>,
    binding: EngineBinding<E>,
    controller: RecoveryController,
    bus: EventBus,
    url: Url,
    autoplay: bool,
    cancel: CancellationToken,
    element_events: broadcast::Receiver<ElementEvent>,
    engine_events: Option<broadcast::Receiver<EngineEvent>>,
    resume_tx: mpsc::Sender<ResumeOutcome>,
    resume_rx: mpsc::Receiver<ResumeOutcome>,
    /// Re-issue `play` on the next ready signal (set by an in-place reload).
    resume_on_ready: bool,
}

impl<E: StreamEngine> Driver<E> {
    /// Bind `url` through `binding` and prepare the supervision loop.
    ///
    /// Subscriptions are taken before the source is bound, so events fired
    /// during loading are not missed.
    pub(crate) fn new(
        element: Arc<dyn MediaElement>,
        binding: EngineBinding<E>,
        mut controller: RecoveryController,
        bus: EventBus,
        url: Url,
        autoplay: bool,
        cancel: CancellationToken,
    ) -> Self {
        let element_events = element.subscribe();
        let engine_events = binding.engine_events();
        binding.load(&element, &url);
        binding.attach(&element);
        controller.activate();
        let (resume_tx, resume_rx) = mpsc::channel(4);
        Self {
            element,
            binding,
            controller,
            bus,
            url,
            autoplay,
            cancel,
            element_events,
            engine_events,
            resume_tx,
            resume_rx,
            resume_on_ready: false,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(url = %self.url, kind = ?self.binding.kind(), "session driver started");
        loop {
            let deadline = self.controller.pending_deadline();
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => break,

                event = self.element_events.recv() => match event {
                    Ok(event) => self.on_element_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "element event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                signal = Self::engine_signal(self.engine_events.as_mut()) => match signal {
                    EngineSignal::Event(event) => self.on_engine_event(event),
                    EngineSignal::Lagged(skipped) => {
                        warn!(skipped, "engine event stream lagged");
                    }
                    EngineSignal::Closed => self.engine_events = None,
                },

                episode = Self::stall_deadline(deadline) => {
                    let actions = self.controller.on_stall_deadline(episode, Self::now());
                    self.execute(actions);
                }

                Some(outcome) = self.resume_rx.recv() => {
                    self.controller.on_resume_settled(outcome.episode, outcome.result);
                }
            }
        }
        self.controller.reset();
        self.binding.teardown();
        debug!("session driver stopped");
    }

    fn now() -> Instant {
        tokio::time::Instant::now().into_std()
    }

    /// Pending arm when no engine event stream exists (native binding, or
    /// the engine sender was dropped).
    async fn engine_signal(events: Option<&mut broadcast::Receiver<EngineEvent>>) -> EngineSignal {
        match events {
            Some(events) => match events.recv().await {
                Ok(event) => EngineSignal::Event(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => EngineSignal::Lagged(skipped),
                Err(broadcast::error::RecvError::Closed) => EngineSignal::Closed,
            },
            None => future::pending().await,
        }
    }

    /// Pending arm until a stall window is armed.
    async fn stall_deadline(pending: Option<(EpisodeId, Instant)>) -> EpisodeId {
        match pending {
            Some((episode, deadline)) => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                episode
            }
            None => future::pending().await,
        }
    }

    fn on_element_event(&mut self, event: ElementEvent) {
        self.bus.publish(event.clone());
        // A managed engine signals readiness itself; the element's readiness
        // only counts when the element decodes the stream natively.
        if matches!(event, ElementEvent::CanPlay) && self.binding.kind() == EngineKind::Native {
            self.on_ready_signal();
        }
        let actions = self.controller.on_event(&event, Self::now());
        self.execute(actions);
    }

    fn on_engine_event(&mut self, event: EngineEvent) {
        self.bus.publish(event);
        match event {
            EngineEvent::ManifestReady => self.on_ready_signal(),
        }
    }

    /// The stream became playable: honor autoplay and in-place resumes.
    fn on_ready_signal(&mut self) {
        if self.autoplay || self.resume_on_ready {
            self.resume_on_ready = false;
            let element = Arc::clone(&self.element);
            tokio::spawn(async move {
                if let Err(error) = element.play().await {
                    // Swallowed: the host surface keeps its own play control.
                    warn!(%error, "play on ready rejected");
                }
            });
        }
    }

    fn execute(&mut self, actions: Vec<RecoveryAction>) {
        for action in actions {
            match action {
                RecoveryAction::PauseNetwork => self.binding.pause_network(),
                RecoveryAction::PauseElement => self.element.pause(),
                RecoveryAction::ResumeNetwork => self.binding.resume_network(),
                RecoveryAction::ReloadAndPlay { episode } => self.reload_and_play(episode),
                RecoveryAction::ReloadInPlace => self.reload_in_place(),
            }
        }
    }

    /// Stall recovery: rebind the source on the live binding and attempt an
    /// asynchronous resume whose outcome settles the episode.
    fn reload_and_play(&mut self, episode: EpisodeId) {
        debug!(episode = episode.value(), url = %self.url, "reloading source after stall");
        self.element.pause();
        self.binding.load(&self.element, &self.url);
        self.binding.attach(&self.element);
        let element = Arc::clone(&self.element);
        let outcomes = self.resume_tx.clone();
        tokio::spawn(async move {
            let result = element.play().await.map_err(|error| error.to_string());
            let _ = outcomes.send(ResumeOutcome { episode, result }).await;
        });
    }

    /// Fault recovery behind a user play: rebind the source, restart the
    /// network fetch, and reload the element in place. Play is re-issued on
    /// the next ready signal.
    fn reload_in_place(&mut self) {
        debug!(url = %self.url, "reloading source after fault");
        self.binding.load(&self.element, &self.url);
        self.binding.attach(&self.element);
        self.binding.resume_network();
        self.element.reload();
        self.resume_on_ready = true;
    }
}
