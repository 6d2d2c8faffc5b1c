#![forbid(unsafe_code)]

//! Uniform handle over the two playback strategies.
//!
//! Recovery decisions are executed through this capability set, so nothing
//! above the binding branches on engine kind after the initial probe.

use std::sync::Arc;

use lyra_events::EngineEvent;
use tokio::sync::broadcast;
use tracing::debug;
use url::Url;

use crate::{MediaElement, StreamEngine};

/// Playback strategy selected for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    /// A software segment-fetching engine drives the element.
    Managed,
    /// The platform decodes the stream straight from the source URL.
    Native,
}

/// The selected strategy together with its owned resources.
///
/// At most one binding is alive per session; rebinding tears the previous
/// one down first. Teardown is idempotent and also runs when the binding is
/// dropped, so the engine is released exactly once on every exit path.
pub enum EngineBinding<E: StreamEngine> {
    /// Managed engine; the binding is its exclusive owner.
    Managed(ManagedBinding<E>),
    /// Native playback; no owned resources.
    Native(NativeBinding),
}

impl<E: StreamEngine> EngineBinding<E> {
    /// Wrap a freshly created managed engine.
    #[must_use]
    pub fn managed(engine: E) -> Self {
        Self::Managed(ManagedBinding::new(engine))
    }

    /// Native strategy: operations act directly on the element.
    #[must_use]
    pub fn native() -> Self {
        Self::Native(NativeBinding)
    }

    /// Which strategy this binding carries.
    #[must_use]
    pub fn kind(&self) -> EngineKind {
        match self {
            Self::Managed(_) => EngineKind::Managed,
            Self::Native(_) => EngineKind::Native,
        }
    }

    /// Point the strategy at `url`.
    ///
    /// Safe to re-issue on a live binding; reloads rely on that.
    pub fn load(&self, element: &Arc<dyn MediaElement>, url: &Url) {
        match self {
            Self::Managed(managed) => managed.load(url),
            Self::Native(native) => native.load(element, url),
        }
    }

    /// Bind the engine output to the element (managed only).
    pub fn attach(&self, element: &Arc<dyn MediaElement>) {
        if let Self::Managed(managed) = self {
            managed.attach(element);
        }
    }

    /// Halt network activity; the decoder stays paused with the element.
    pub fn pause_network(&self) {
        if let Self::Managed(managed) = self {
            managed.pause_network();
        }
    }

    /// Resume network activity.
    pub fn resume_network(&self) {
        if let Self::Managed(managed) = self {
            managed.resume_network();
        }
    }

    /// Engine notifications, when the strategy has an engine.
    #[must_use]
    pub fn engine_events(&self) -> Option<broadcast::Receiver<EngineEvent>> {
        match self {
            Self::Managed(managed) => managed.subscribe(),
            Self::Native(_) => None,
        }
    }

    /// Release owned resources. Idempotent.
    pub fn teardown(&mut self) {
        if let Self::Managed(managed) = self {
            managed.teardown();
        }
    }
}

/// Exclusive owner of one managed engine.
pub struct ManagedBinding<E: StreamEngine> {
    engine: Option<E>,
}

impl<E: StreamEngine> ManagedBinding<E> {
    fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    fn load(&self, url: &Url) {
        if let Some(engine) = &self.engine {
            engine.load_source(url);
        }
    }

    fn attach(&self, element: &Arc<dyn MediaElement>) {
        if let Some(engine) = &self.engine {
            engine.attach_media(Arc::clone(element));
        }
    }

    fn pause_network(&self) {
        if let Some(engine) = &self.engine {
            engine.stop_load();
        }
    }

    fn resume_network(&self) {
        if let Some(engine) = &self.engine {
            engine.start_load();
        }
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<EngineEvent>> {
        self.engine.as_ref().map(StreamEngine::subscribe)
    }

    fn teardown(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.destroy();
            debug!("managed engine destroyed");
        }
    }
}

impl<E: StreamEngine> Drop for ManagedBinding<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Native strategy: no owned resources, the element does the decoding.
pub struct NativeBinding;

impl NativeBinding {
    fn load(&self, element: &Arc<dyn MediaElement>, url: &Url) {
        element.set_source(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ElementCall, EngineCall, MockElement, RecordingFactory};
    use crate::StreamEngineFactory;

    fn element() -> Arc<dyn MediaElement> {
        Arc::new(MockElement::new())
    }

    fn managed_binding() -> (EngineBinding<crate::mock::RecordingEngine>, RecordingFactory) {
        let factory = RecordingFactory::supported();
        let engine = factory.create(&Default::default()).unwrap();
        (EngineBinding::managed(engine), factory)
    }

    fn stream_url() -> Url {
        Url::parse("https://cdn.example.com/live/master.m3u8").unwrap()
    }

    #[test]
    fn managed_maps_capabilities_onto_engine() {
        let (binding, factory) = managed_binding();
        let element = element();
        binding.load(&element, &stream_url());
        binding.attach(&element);
        binding.pause_network();
        binding.resume_network();
        assert_eq!(
            factory.engine(0).calls(),
            vec![
                EngineCall::LoadSource(stream_url().to_string()),
                EngineCall::AttachMedia,
                EngineCall::StopLoad,
                EngineCall::StartLoad,
            ]
        );
        assert_eq!(binding.kind(), EngineKind::Managed);
    }

    #[test]
    fn managed_load_and_attach_are_reissuable() {
        let (binding, factory) = managed_binding();
        let element = element();
        for _ in 0..3 {
            binding.load(&element, &stream_url());
            binding.attach(&element);
        }
        let handle = factory.engine(0);
        assert_eq!(handle.load_count(), 3);
        assert_eq!(handle.destroy_count(), 0);
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn managed_teardown_destroys_exactly_once() {
        let (mut binding, factory) = managed_binding();
        binding.teardown();
        binding.teardown();
        assert_eq!(factory.engine(0).destroy_count(), 1);
    }

    #[test]
    fn dropping_a_live_binding_destroys_the_engine() {
        let (binding, factory) = managed_binding();
        drop(binding);
        assert_eq!(factory.engine(0).destroy_count(), 1);
    }

    #[test]
    fn teardown_then_drop_does_not_double_destroy() {
        let (mut binding, factory) = managed_binding();
        binding.teardown();
        drop(binding);
        assert_eq!(factory.engine(0).destroy_count(), 1);
    }

    #[test]
    fn torn_down_binding_ignores_commands() {
        let (mut binding, factory) = managed_binding();
        binding.teardown();
        binding.load(&element(), &stream_url());
        binding.pause_network();
        assert_eq!(
            factory.engine(0).calls(),
            vec![EngineCall::Destroy]
        );
    }

    #[test]
    fn native_load_assigns_element_source() {
        let mock = Arc::new(MockElement::new());
        let element: Arc<dyn MediaElement> = mock.clone();
        let binding = EngineBinding::<crate::mock::RecordingEngine>::native();
        binding.load(&element, &stream_url());
        binding.attach(&element);
        binding.pause_network();
        binding.resume_network();
        assert_eq!(
            mock.calls(),
            vec![ElementCall::SetSource(stream_url().to_string())]
        );
        assert_eq!(binding.kind(), EngineKind::Native);
    }

    #[test]
    fn native_has_no_engine_events_and_trivial_teardown() {
        let mut binding = EngineBinding::<crate::mock::RecordingEngine>::native();
        assert!(binding.engine_events().is_none());
        binding.teardown();
        binding.teardown();
    }

    #[test]
    fn managed_exposes_engine_events() {
        let (binding, factory) = managed_binding();
        let mut rx = binding.engine_events().unwrap();
        factory.engine(0).emit_manifest_ready();
        assert_eq!(
            rx.try_recv().unwrap(),
            lyra_events::EngineEvent::ManifestReady
        );
    }
}
