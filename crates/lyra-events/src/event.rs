#![forbid(unsafe_code)]

use crate::{ElementEvent, EngineEvent, SessionEvent};

/// Unified event type carried by the bus.
///
/// `From` impls exist for every family so publishers can hand sub-enum
/// values straight to [`EventBus::publish`](crate::EventBus::publish).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Raw playback-element event.
    Element(ElementEvent),
    /// Managed-engine notification.
    Engine(EngineEvent),
    /// Watchdog decision or session lifecycle.
    Session(SessionEvent),
}

impl From<ElementEvent> for Event {
    fn from(event: ElementEvent) -> Self {
        Self::Element(event)
    }
}

impl From<EngineEvent> for Event {
    fn from(event: EngineEvent) -> Self {
        Self::Engine(event)
    }
}

impl From<SessionEvent> for Event {
    fn from(event: SessionEvent) -> Self {
        Self::Session(event)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::ReloadTrigger;

    #[rstest]
    #[case(ElementEvent::Pause)]
    #[case(ElementEvent::Waiting)]
    #[case(ElementEvent::Play)]
    #[case(ElementEvent::CanPlay)]
    fn element_events_wrap_into_event(#[case] ev: ElementEvent) {
        let wrapped: Event = ev.clone().into();
        assert_eq!(wrapped, Event::Element(ev));
    }

    #[test]
    fn engine_event_wraps_into_event() {
        let wrapped: Event = EngineEvent::ManifestReady.into();
        assert!(matches!(wrapped, Event::Engine(EngineEvent::ManifestReady)));
    }

    #[test]
    fn session_event_payload_survives_wrapping() {
        let wrapped: Event = SessionEvent::ReloadIssued {
            trigger: ReloadTrigger::StallDeadline,
        }
        .into();
        assert_eq!(
            wrapped,
            Event::Session(SessionEvent::ReloadIssued {
                trigger: ReloadTrigger::StallDeadline,
            })
        );
    }
}
