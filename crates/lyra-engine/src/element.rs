#![forbid(unsafe_code)]

use async_trait::async_trait;
use lyra_events::ElementEvent;
use tokio::sync::broadcast;
use url::Url;

use crate::ElementError;

/// Handle to the platform playback surface.
///
/// Implementations wrap whatever the platform exposes: a DOM media element,
/// an AVPlayer-style object, a test double. Commands are fire-and-forget
/// except [`MediaElement::play`], which resolves once playback actually
/// starts or the platform rejects the request.
///
/// Lifecycle is reported through a broadcast stream of [`ElementEvent`]s in
/// emission order; each subscriber gets an independent receiver.
#[async_trait]
pub trait MediaElement: Send + Sync + 'static {
    /// Assign a source URL directly (native playback path).
    fn set_source(&self, url: &Url);

    /// Re-run resource selection for the current source.
    fn reload(&self);

    /// Begin or resume playback.
    async fn play(&self) -> Result<(), ElementError>;

    /// Pause playback.
    fn pause(&self);

    /// Whether the element can decode `mime` without a managed engine.
    fn can_play_type(&self, mime: &str) -> bool;

    /// Subscribe to element lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<ElementEvent>;
}
