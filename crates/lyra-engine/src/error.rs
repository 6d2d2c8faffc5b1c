#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors from engine selection and construction.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Neither the managed engine nor native decoding is usable here.
    #[error("no usable playback engine: managed engine unsupported and native decoding unavailable")]
    Unsupported,
    /// The factory failed to build a managed engine.
    #[error("engine construction failed: {reason}")]
    Construction {
        /// Factory-reported failure description.
        reason: String,
    },
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error from the playback element's asynchronous operations.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The platform rejected the play request (autoplay policy, decoder
    /// state, and similar).
    #[error("play request rejected: {reason}")]
    PlayRejected {
        /// Platform-reported rejection description.
        reason: String,
    },
}
