#![forbid(unsafe_code)]

use tracing::debug;

use crate::{EngineError, EngineKind, EngineResult, MediaElement, StreamEngineFactory};

/// MIME type probed for built-in HLS playback support.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

/// Pick the playback strategy for this platform.
///
/// The managed engine wins whenever the factory supports the platform;
/// native playback is the fallback for platforms that decode the stream
/// type themselves (Safari-style built-in HLS). Probed once per session at
/// start and fixed for the session's lifetime.
pub fn select_engine<F: StreamEngineFactory>(
    factory: &F,
    element: &dyn MediaElement,
) -> EngineResult<EngineKind> {
    if factory.is_supported() {
        return Ok(EngineKind::Managed);
    }
    if element.can_play_type(HLS_MIME_TYPE) {
        debug!("managed engine unsupported, falling back to native decoding");
        return Ok(EngineKind::Native);
    }
    Err(EngineError::Unsupported)
}
