#![allow(dead_code)]

//! Shared rig for session integration tests.

use std::{sync::Arc, time::Duration};

use lyra::{Session, SessionConfig};
use lyra_engine::mock::{MockElement, RecordingFactory};
use lyra_events::{Event, SessionEvent};
use lyra_recovery::RecoveryOptions;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Short grace window so stall tests run in real time.
pub const GRACE: Duration = Duration::from_millis(100);

/// Comfortably past [`GRACE`].
pub const PAST_GRACE: Duration = Duration::from_millis(400);

pub struct Rig {
    pub element: Arc<MockElement>,
    pub factory: RecordingFactory,
    pub session: Session<RecordingFactory>,
}

pub fn stream_url() -> Url {
    Url::parse("https://cdn.example.com/live/master.m3u8").unwrap()
}

pub fn backup_url() -> Url {
    Url::parse("https://cdn.example.com/live/backup.m3u8").unwrap()
}

pub fn config_for(url: Url) -> SessionConfig<RecordingFactory> {
    SessionConfig::new(url).with_recovery(RecoveryOptions::new().with_grace(GRACE))
}

pub fn test_config() -> SessionConfig<RecordingFactory> {
    config_for(stream_url())
}

pub fn rig_with(
    factory: RecordingFactory,
    element: MockElement,
    config: SessionConfig<RecordingFactory>,
) -> Rig {
    let element = Arc::new(element);
    let session = Session::new(element.clone(), factory.clone(), config);
    Rig {
        element,
        factory,
        session,
    }
}

/// Managed engine; the element cannot decode the stream itself.
pub fn managed_rig() -> Rig {
    rig_with(
        RecordingFactory::supported(),
        MockElement::without_native_support(),
        test_config(),
    )
}

/// No managed engine available; the element decodes natively.
pub fn native_rig() -> Rig {
    rig_with(RecordingFactory::unsupported(), MockElement::new(), test_config())
}

/// Let the driver and any spawned resume tasks drain what is queued.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Sleep past the stall grace window, then settle.
pub async fn expire_grace() {
    tokio::time::sleep(PAST_GRACE).await;
    settle().await;
}

/// Session events drained from `rx` so far; element and engine events are
/// skipped.
pub fn session_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Session(event) = event {
            events.push(event);
        }
    }
    events
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
