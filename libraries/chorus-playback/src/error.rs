//! Error types for playback state operations

use thiserror::Error;

/// Playback state errors
///
/// Display strings double as user-visible status messages, so they spell out
/// what was wrong with the request rather than just naming the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// Queue is empty
    #[error("there's nothing in the queue")]
    QueueEmpty,

    /// A single 1-based index pointed outside the queue
    #[error("there is no song at position {index}; the queue has {len} song(s)")]
    IndexOutOfBounds {
        /// Requested 1-based position
        index: usize,
        /// Queue length at the time of the request
        len: usize,
    },

    /// A range request was malformed or pointed outside the queue
    #[error("{lo}-{hi} is not a valid range; the queue has {len} song(s)")]
    InvalidRange {
        /// Requested 1-based lower bound
        lo: usize,
        /// Requested 1-based upper bound
        hi: usize,
        /// Queue length at the time of the request
        len: usize,
    },

    /// A session phase transition that is not legal from the current phase
    #[error("invalid session transition: {0}")]
    InvalidTransition(&'static str),
}

/// Result type for playback state operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
