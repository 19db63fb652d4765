//! Error types for the collaborator boundaries

use thiserror::Error;

/// Errors from the media resolution layer
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The query pointed at a source the resolver cannot handle
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// The query produced no playable results
    #[error("no results for \"{0}\"")]
    NoResults(String),

    /// The backing search/streaming service could not be reached
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Errors from the audio transport
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Voice connection could not be established
    #[error("couldn't connect to voice: {0}")]
    Connect(String),

    /// Stream acquisition for a track locator failed
    #[error("couldn't open stream: {0}")]
    Stream(String),

    /// The stream started but died mid-playback
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Errors from the notification sink
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The UI surface could not be attached to the given channel
    #[error("couldn't attach UI: {0}")]
    Attach(String),

    /// Publishing or topic update failed
    #[error("notification channel error: {0}")]
    Channel(String),
}

/// Errors from the settings store
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    /// Underlying storage failed
    #[error("settings storage error: {0}")]
    Storage(String),
}
