#![forbid(unsafe_code)]

//! Playback session: engine selection, supervision, lifecycle.

use std::sync::Arc;

use lyra_engine::{
    select_engine, EngineBinding, EngineKind, EngineResult, MediaElement, StreamEngineFactory,
};
use lyra_events::{Event, EventBus, SessionEvent};
use lyra_recovery::RecoveryController;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{config::SessionConfig, driver::Driver};

struct Runtime {
    kind: EngineKind,
    cancel: CancellationToken,
    driver: JoinHandle<()>,
}

/// A self-healing playback session.
///
/// Binds a stream URL to a playback element through the best available
/// engine and supervises playback until stopped: stalls past the grace
/// window reload the stream, element faults pause it and arm an in-place
/// reload for the next user play.
///
/// # Example
///
/// ```ignore
/// use lyra::{Session, SessionConfig};
///
/// let config = SessionConfig::new(url).with_autoplay(true);
/// let mut session = Session::new(element, HlsFactory::new(), config);
/// session.start().await?;
///
/// let mut events = session.subscribe();
/// while let Ok(event) = events.recv().await {
///     println!("{event:?}");
/// }
/// ```
pub struct Session<F: StreamEngineFactory> {
    element: Arc<dyn MediaElement>,
    factory: F,
    config: SessionConfig<F>,
    bus: EventBus,
    runtime: Option<Runtime>,
}

impl<F: StreamEngineFactory> Session<F> {
    /// Create a stopped session; [`Session::start`] binds the stream.
    #[must_use]
    pub fn new(element: Arc<dyn MediaElement>, factory: F, config: SessionConfig<F>) -> Self {
        let bus = EventBus::new(config.event_capacity);
        Self {
            element,
            factory,
            config,
            bus,
            runtime: None,
        }
    }

    /// Select an engine, bind the source, and start supervision.
    ///
    /// A session that is already running is stopped first, so `start` on a
    /// live session reinitializes it from the current config.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unsupported`](lyra_engine::EngineError) when neither a
    /// managed engine nor native decoding is available; the session stays
    /// stopped. Engine construction failures are passed through.
    pub async fn start(&mut self) -> EngineResult<()> {
        self.stop().await;

        let kind = select_engine(&self.factory, self.element.as_ref())?;
        let binding = match kind {
            EngineKind::Managed => EngineBinding::managed(self.factory.create(&self.config.engine)?),
            EngineKind::Native => EngineBinding::native(),
        };
        let controller = RecoveryController::new(self.config.recovery, self.bus.clone());
        let cancel = CancellationToken::new();
        let driver = Driver::new(
            Arc::clone(&self.element),
            binding,
            controller,
            self.bus.clone(),
            self.config.url.clone(),
            self.config.autoplay,
            cancel.clone(),
        );
        let driver = tokio::spawn(driver.run());
        self.runtime = Some(Runtime {
            kind,
            cancel,
            driver,
        });
        debug!(url = %self.config.url, ?kind, "session started");
        self.bus.publish(SessionEvent::Started);
        Ok(())
    }

    /// Swap the config and start from it.
    ///
    /// # Errors
    ///
    /// Same as [`Session::start`].
    pub async fn restart(&mut self, config: SessionConfig<F>) -> EngineResult<()> {
        self.config = config;
        self.start().await
    }

    /// Stop supervision and tear the engine down. Idempotent.
    pub async fn stop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        runtime.cancel.cancel();
        if let Err(error) = runtime.driver.await {
            warn!(%error, "session driver terminated abnormally");
        }
        debug!(subscribers = self.bus.subscriber_count(), "session stopped");
        self.bus.publish(SessionEvent::Stopped);
    }

    /// Subscribe to session, element, and engine events.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The bus this session publishes on.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Engine kind in use, while running.
    #[must_use]
    pub fn engine_kind(&self) -> Option<EngineKind> {
        self.runtime.as_ref().map(|runtime| runtime.kind)
    }

    /// Whether supervision is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.runtime.is_some()
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig<F> {
        &self.config
    }
}

impl<F: StreamEngineFactory> Drop for Session<F> {
    fn drop(&mut self) {
        // The driver owns the binding and tears it down when it observes
        // the cancellation; dropping the handle detaches the task.
        if let Some(runtime) = self.runtime.take() {
            runtime.cancel.cancel();
        }
    }
}
