#![forbid(unsafe_code)]

//! Session lifecycle: start, restart, stop, drop, and autoplay.

mod fixture;

use lyra_engine::{
    mock::{MockElement, RecordingConfig, RecordingFactory},
    EngineKind,
};
use lyra_events::{ElementEvent, SessionEvent};

#[tokio::test]
async fn started_and_stopped_are_published() {
    let mut rig = fixture::managed_rig();
    let mut rx = rig.session.subscribe();
    rig.session.start().await.unwrap();
    fixture::settle().await;
    rig.session.stop().await;

    assert_eq!(
        fixture::session_events(&mut rx),
        vec![SessionEvent::Started, SessionEvent::Stopped]
    );
    assert!(!rig.session.is_active());
}

#[tokio::test]
async fn stop_is_idempotent() {
    let mut rig = fixture::managed_rig();
    let mut rx = rig.session.subscribe();
    rig.session.stop().await;
    assert!(fixture::session_events(&mut rx).is_empty());

    rig.session.start().await.unwrap();
    fixture::settle().await;
    rig.session.stop().await;
    rig.session.stop().await;

    let events = fixture::session_events(&mut rx);
    let stops = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::Stopped))
        .count();
    assert_eq!(stops, 1);
    assert_eq!(rig.factory.engine(0).destroy_count(), 1);
}

#[tokio::test]
async fn restart_swaps_stream_and_engine() {
    let mut rig = fixture::managed_rig();
    rig.session.start().await.unwrap();
    fixture::settle().await;

    rig.session
        .restart(fixture::config_for(fixture::backup_url()))
        .await
        .unwrap();
    fixture::settle().await;

    assert_eq!(rig.factory.created(), 2);
    assert_eq!(rig.factory.engine(0).destroy_count(), 1);
    assert_eq!(rig.factory.live_engines(), 1);
    assert_eq!(
        rig.factory.engine(1).sources_loaded(),
        vec![fixture::backup_url().to_string()]
    );
    assert_eq!(rig.session.config().url, fixture::backup_url());
}

#[tokio::test]
async fn start_on_live_session_reinitializes() {
    let mut rig = fixture::managed_rig();
    let mut rx = rig.session.subscribe();
    rig.session.start().await.unwrap();
    fixture::settle().await;
    rig.session.start().await.unwrap();
    fixture::settle().await;

    assert_eq!(rig.factory.created(), 2);
    assert_eq!(rig.factory.engine(0).destroy_count(), 1);
    assert_eq!(rig.factory.live_engines(), 1);
    assert_eq!(
        fixture::session_events(&mut rx),
        vec![
            SessionEvent::Started,
            SessionEvent::Stopped,
            SessionEvent::Started
        ]
    );
}

#[tokio::test]
async fn stop_cancels_pending_stall() {
    let mut rig = fixture::managed_rig();
    rig.session.start().await.unwrap();
    fixture::settle().await;

    rig.element.emit(ElementEvent::Waiting);
    fixture::settle().await;
    rig.session.stop().await;
    fixture::expire_grace().await;

    assert_eq!(rig.factory.engine(0).load_count(), 1);
    assert_eq!(rig.element.play_count(), 0);
    assert_eq!(rig.factory.engine(0).destroy_count(), 1);
}

#[tokio::test]
async fn dropping_a_session_destroys_its_engine() {
    let rig = fixture::managed_rig();
    let fixture::Rig {
        mut session,
        factory,
        ..
    } = rig;
    session.start().await.unwrap();
    fixture::settle().await;

    drop(session);
    fixture::settle().await;

    assert_eq!(factory.engine(0).destroy_count(), 1);
    assert_eq!(factory.live_engines(), 0);
}

#[tokio::test]
async fn engine_config_reaches_the_factory() {
    let config = fixture::test_config().with_engine(RecordingConfig {
        label: "low-latency".to_owned(),
    });
    let mut rig = fixture::rig_with(
        RecordingFactory::supported(),
        MockElement::without_native_support(),
        config,
    );
    rig.session.start().await.unwrap();
    fixture::settle().await;

    assert_eq!(rig.factory.last_config().unwrap().label, "low-latency");
}

#[tokio::test]
async fn autoplay_managed_plays_on_manifest_ready() {
    let config = fixture::test_config().with_autoplay(true);
    let mut rig = fixture::rig_with(
        RecordingFactory::supported(),
        MockElement::without_native_support(),
        config,
    );
    rig.session.start().await.unwrap();
    fixture::settle().await;
    assert_eq!(rig.element.play_count(), 0);

    rig.factory.engine(0).emit_manifest_ready();
    fixture::settle().await;
    assert_eq!(rig.element.play_count(), 1);
}

#[tokio::test]
async fn autoplay_native_plays_on_can_play() {
    let config = fixture::test_config().with_autoplay(true);
    let mut rig = fixture::rig_with(RecordingFactory::unsupported(), MockElement::new(), config);
    rig.session.start().await.unwrap();
    fixture::settle().await;
    assert_eq!(rig.session.engine_kind(), Some(EngineKind::Native));

    rig.element.emit(ElementEvent::CanPlay);
    fixture::settle().await;
    assert_eq!(rig.element.play_count(), 1);
}

#[tokio::test]
async fn element_readiness_is_ignored_with_a_managed_engine() {
    let config = fixture::test_config().with_autoplay(true);
    // The element could decode natively, but the managed engine wins
    // selection and owns the readiness signal.
    let mut rig = fixture::rig_with(RecordingFactory::supported(), MockElement::new(), config);
    rig.session.start().await.unwrap();
    fixture::settle().await;
    assert_eq!(rig.session.engine_kind(), Some(EngineKind::Managed));

    rig.element.emit(ElementEvent::CanPlay);
    fixture::settle().await;
    assert_eq!(rig.element.play_count(), 0);

    rig.factory.engine(0).emit_manifest_ready();
    fixture::settle().await;
    assert_eq!(rig.element.play_count(), 1);
}
