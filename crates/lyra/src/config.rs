#![forbid(unsafe_code)]

//! Configuration for [`Session`](crate::Session).

use std::fmt;

use lyra_engine::StreamEngineFactory;
use lyra_events::DEFAULT_EVENT_CAPACITY;
use lyra_recovery::RecoveryOptions;
use url::Url;

/// Presentation attributes the host applies to its playback surface.
///
/// The session never reads these; it carries them so one config describes
/// the whole playback setup and the host can render the surface from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Show built-in transport controls.
    pub controls: bool,
    /// Start with audio muted.
    pub muted: bool,
    /// Play within the page instead of fullscreen on handheld platforms.
    pub inline_playback: bool,
    /// Image shown before the first frame.
    pub poster: Option<Url>,
    /// CSS width of the surface.
    pub width: String,
    /// CSS height of the surface.
    pub height: String,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            controls: true,
            muted: false,
            inline_playback: true,
            poster: None,
            width: "100%".to_owned(),
            height: "100%".to_owned(),
        }
    }
}

impl SurfaceOptions {
    /// Show or hide built-in transport controls.
    #[must_use]
    pub fn with_controls(mut self, controls: bool) -> Self {
        self.controls = controls;
        self
    }

    /// Start with audio muted.
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Play within the page instead of fullscreen on handheld platforms.
    #[must_use]
    pub fn with_inline_playback(mut self, inline_playback: bool) -> Self {
        self.inline_playback = inline_playback;
        self
    }

    /// Set the image shown before the first frame.
    #[must_use]
    pub fn with_poster(mut self, poster: Url) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Set the CSS size of the surface.
    #[must_use]
    pub fn with_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }
}

/// Configuration for one playback session.
///
/// # Example
///
/// ```ignore
/// use lyra::{Session, SessionConfig};
///
/// let url = Url::parse("https://cdn.example.com/live/master.m3u8")?;
/// let config = SessionConfig::<HlsFactory>::new(url)
///     .with_autoplay(true)
///     .with_recovery(RecoveryOptions::new().with_grace(Duration::from_secs(3)));
/// let mut session = Session::new(element, HlsFactory::new(), config);
/// session.start().await?;
/// ```
pub struct SessionConfig<F: StreamEngineFactory> {
    /// Stream manifest URL.
    pub url: Url,
    /// Start playback as soon as the stream reports ready.
    pub autoplay: bool,
    /// Engine-specific configuration, passed through to the factory.
    pub engine: F::Config,
    /// Stall detection tuning.
    pub recovery: RecoveryOptions,
    /// Presentation attributes for the host's playback surface.
    pub surface: SurfaceOptions,
    /// Capacity of the session's event bus.
    pub event_capacity: usize,
}

impl<F: StreamEngineFactory> SessionConfig<F> {
    /// Create a config for `url` with defaults everywhere else.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            autoplay: false,
            engine: F::Config::default(),
            recovery: RecoveryOptions::default(),
            surface: SurfaceOptions::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Start playback as soon as the stream reports ready.
    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Set engine-specific configuration.
    #[must_use]
    pub fn with_engine(mut self, engine: F::Config) -> Self {
        self.engine = engine;
        self
    }

    /// Set stall detection tuning.
    #[must_use]
    pub fn with_recovery(mut self, recovery: RecoveryOptions) -> Self {
        self.recovery = recovery;
        self
    }

    /// Set presentation attributes.
    #[must_use]
    pub fn with_surface(mut self, surface: SurfaceOptions) -> Self {
        self.surface = surface;
        self
    }

    /// Set the capacity of the session's event bus.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

// Derives would put the bounds on `F` itself; only `F::Config` matters.
impl<F: StreamEngineFactory> Clone for SessionConfig<F> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            autoplay: self.autoplay,
            engine: self.engine.clone(),
            recovery: self.recovery,
            surface: self.surface.clone(),
            event_capacity: self.event_capacity,
        }
    }
}

impl<F: StreamEngineFactory> fmt::Debug for SessionConfig<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("url", &self.url.as_str())
            .field("autoplay", &self.autoplay)
            .field("engine", &self.engine)
            .field("recovery", &self.recovery)
            .field("surface", &self.surface)
            .field("event_capacity", &self.event_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lyra_engine::mock::RecordingFactory;

    use super::*;

    fn url() -> Url {
        Url::parse("https://cdn.example.com/live/master.m3u8").unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = SessionConfig::<RecordingFactory>::new(url());
        assert!(!config.autoplay);
        assert_eq!(config.recovery.grace, Duration::from_secs(5));
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
        assert!(config.engine.label.is_empty());
    }

    #[test]
    fn builders_chain() {
        let config = SessionConfig::<RecordingFactory>::new(url())
            .with_autoplay(true)
            .with_recovery(RecoveryOptions::new().with_grace(Duration::from_secs(2)))
            .with_event_capacity(8);
        assert!(config.autoplay);
        assert_eq!(config.recovery.grace, Duration::from_secs(2));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn surface_defaults_fill_the_host_frame() {
        let surface = SurfaceOptions::default();
        assert!(surface.controls);
        assert!(!surface.muted);
        assert!(surface.inline_playback);
        assert!(surface.poster.is_none());
        assert_eq!(surface.width, "100%");
        assert_eq!(surface.height, "100%");
    }

    #[test]
    fn surface_builders_chain() {
        let poster = Url::parse("https://cdn.example.com/poster.jpg").unwrap();
        let surface = SurfaceOptions::default()
            .with_controls(false)
            .with_muted(true)
            .with_inline_playback(false)
            .with_poster(poster.clone())
            .with_size("640px", "360px");
        assert!(!surface.controls);
        assert!(surface.muted);
        assert!(!surface.inline_playback);
        assert_eq!(surface.poster, Some(poster));
        assert_eq!(surface.width, "640px");
    }

    #[test]
    fn clone_is_independent_of_factory() {
        let config = SessionConfig::<RecordingFactory>::new(url()).with_autoplay(true);
        let copy = config.clone();
        assert_eq!(copy.url, config.url);
        assert!(copy.autoplay);
    }
}
