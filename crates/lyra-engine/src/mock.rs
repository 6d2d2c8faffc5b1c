#![forbid(unsafe_code)]

//! Recording fakes for the element and engine seams.
//!
//! Macro mocks do not fit these traits (`Arc<dyn MediaElement>` parameters
//! and broadcast receivers in return position), so the doubles are
//! hand-rolled: they record every call, let tests inject events, and script
//! play outcomes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use lyra_events::{ElementEvent, EngineEvent};
use tokio::sync::broadcast;
use url::Url;

use crate::{
    ElementError, EngineResult, MediaElement, StreamEngine, StreamEngineFactory,
};

const EVENT_CAPACITY: usize = 64;

/// Calls a [`MockElement`] has observed, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementCall {
    /// `set_source(url)`.
    SetSource(String),
    /// `reload()`.
    Reload,
    /// `play()`.
    Play,
    /// `pause()`.
    Pause,
}

/// Scriptable [`MediaElement`] double.
///
/// Events are injected with [`MockElement::emit`]. `play` succeeds unless
/// failures were scripted with [`MockElement::fail_next_play`]; the element
/// emits nothing on its own, so tests control the event order completely.
pub struct MockElement {
    calls: Mutex<Vec<ElementCall>>,
    events_tx: broadcast::Sender<ElementEvent>,
    can_play_natively: bool,
    scripted_play_failures: AtomicUsize,
}

impl Default for MockElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MockElement {
    /// An element that can decode HLS natively.
    #[must_use]
    pub fn new() -> Self {
        Self::with_native_support(true)
    }

    /// An element that relies entirely on a managed engine.
    #[must_use]
    pub fn without_native_support() -> Self {
        Self::with_native_support(false)
    }

    fn with_native_support(can_play_natively: bool) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            calls: Mutex::new(Vec::new()),
            events_tx,
            can_play_natively,
            scripted_play_failures: AtomicUsize::new(0),
        }
    }

    /// Deliver an event to every subscriber.
    pub fn emit(&self, event: ElementEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Reject the next `play()` call (cumulative).
    pub fn fail_next_play(&self) {
        self.scripted_play_failures.fetch_add(1, Ordering::SeqCst);
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ElementCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `play()` calls observed.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.count(|call| matches!(call, ElementCall::Play))
    }

    /// Number of `pause()` calls observed.
    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.count(|call| matches!(call, ElementCall::Pause))
    }

    /// Number of `reload()` calls observed.
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.count(|call| matches!(call, ElementCall::Reload))
    }

    /// Source URLs assigned, in order.
    #[must_use]
    pub fn sources_set(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                ElementCall::SetSource(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, matches: impl Fn(&ElementCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: ElementCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaElement for MockElement {
    fn set_source(&self, url: &Url) {
        self.record(ElementCall::SetSource(url.to_string()));
    }

    fn reload(&self) {
        self.record(ElementCall::Reload);
    }

    async fn play(&self) -> Result<(), ElementError> {
        self.record(ElementCall::Play);
        let fail = self
            .scripted_play_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(ElementError::PlayRejected {
                reason: "scripted rejection".to_owned(),
            });
        }
        Ok(())
    }

    fn pause(&self) {
        self.record(ElementCall::Pause);
    }

    fn can_play_type(&self, _mime: &str) -> bool {
        self.can_play_natively
    }

    fn subscribe(&self) -> broadcast::Receiver<ElementEvent> {
        self.events_tx.subscribe()
    }
}

/// Calls a [`RecordingEngine`] has observed, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCall {
    /// `load_source(url)`.
    LoadSource(String),
    /// `attach_media(element)`.
    AttachMedia,
    /// `stop_load()`.
    StopLoad,
    /// `start_load()`.
    StartLoad,
    /// `destroy()`.
    Destroy,
}

/// Opaque engine configuration stand-in for pass-through tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingConfig {
    /// Free-form marker the factory records on `create`.
    pub label: String,
}

#[derive(Debug)]
struct EngineState {
    calls: Mutex<Vec<EngineCall>>,
    destroys: AtomicUsize,
    events_tx: broadcast::Sender<EngineEvent>,
}

impl EngineState {
    fn new() -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            destroys: AtomicUsize::new(0),
            events_tx,
        })
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Test-side view of one engine built by a [`RecordingFactory`].
///
/// Outlives the engine value itself, so teardown behavior stays observable.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    state: Arc<EngineState>,
}

impl EngineHandle {
    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Number of `load_source` calls observed.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, EngineCall::LoadSource(_)))
            .count()
    }

    /// Number of `destroy` calls observed.
    #[must_use]
    pub fn destroy_count(&self) -> usize {
        self.state.destroys.load(Ordering::SeqCst)
    }

    /// Source URLs loaded, in order.
    #[must_use]
    pub fn sources_loaded(&self) -> Vec<String> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                EngineCall::LoadSource(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Emit a manifest-ready notification to engine subscribers.
    pub fn emit_manifest_ready(&self) {
        let _ = self.state.events_tx.send(EngineEvent::ManifestReady);
    }
}

/// Recording [`StreamEngine`] double built by [`RecordingFactory`].
#[derive(Debug)]
pub struct RecordingEngine {
    state: Arc<EngineState>,
}

impl StreamEngine for RecordingEngine {
    fn load_source(&self, url: &Url) {
        self.state.record(EngineCall::LoadSource(url.to_string()));
    }

    fn attach_media(&self, _element: Arc<dyn MediaElement>) {
        self.state.record(EngineCall::AttachMedia);
    }

    fn stop_load(&self) {
        self.state.record(EngineCall::StopLoad);
    }

    fn start_load(&self) {
        self.state.record(EngineCall::StartLoad);
    }

    fn destroy(&self) {
        self.state.record(EngineCall::Destroy);
        self.state.destroys.fetch_add(1, Ordering::SeqCst);
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.state.events_tx.subscribe()
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    engines: Mutex<Vec<EngineHandle>>,
    last_config: Mutex<Option<RecordingConfig>>,
}

/// Shareable [`StreamEngineFactory`] double.
///
/// Clones share state, so a test can hand one clone to the session and keep
/// another to inspect every engine ever built.
#[derive(Clone, Debug)]
pub struct RecordingFactory {
    supported: bool,
    state: Arc<FactoryState>,
}

impl RecordingFactory {
    /// A factory whose engines run on this platform.
    #[must_use]
    pub fn supported() -> Self {
        Self {
            supported: true,
            state: Arc::default(),
        }
    }

    /// A factory reporting no platform support.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            state: Arc::default(),
        }
    }

    /// Number of engines built so far.
    #[must_use]
    pub fn created(&self) -> usize {
        self.state.engines.lock().unwrap().len()
    }

    /// Number of built engines not yet destroyed.
    #[must_use]
    pub fn live_engines(&self) -> usize {
        self.state
            .engines
            .lock()
            .unwrap()
            .iter()
            .filter(|handle| handle.destroy_count() == 0)
            .count()
    }

    /// Handle to the `index`-th engine built (zero-based).
    ///
    /// # Panics
    /// When fewer than `index + 1` engines were built.
    #[must_use]
    pub fn engine(&self, index: usize) -> EngineHandle {
        self.state.engines.lock().unwrap()[index].clone()
    }

    /// The config passed to the most recent `create`.
    #[must_use]
    pub fn last_config(&self) -> Option<RecordingConfig> {
        self.state.last_config.lock().unwrap().clone()
    }
}

impl StreamEngineFactory for RecordingFactory {
    type Engine = RecordingEngine;
    type Config = RecordingConfig;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(&self, config: &RecordingConfig) -> EngineResult<RecordingEngine> {
        *self.state.last_config.lock().unwrap() = Some(config.clone());
        let state = EngineState::new();
        self.state.engines.lock().unwrap().push(EngineHandle {
            state: Arc::clone(&state),
        });
        Ok(RecordingEngine { state })
    }
}
