//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a guild (one playback session exists per guild)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playable track: an opaque locator plus user-facing display text
///
/// The locator is whatever the transport can resolve into an audio stream
/// (a URL or a provider-specific ID). Tracks are immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque media reference, resolvable by the transport
    pub locator: String,

    /// Display name shown in the queue and now-playing fields
    pub name: String,
}

impl Track {
    /// Create a new track
    pub fn new(locator: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            name: name.into(),
        }
    }
}

/// Named UI fields a session publishes to its notification sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiField {
    /// Name of the track currently streaming
    NowPlaying,
    /// Uploader/author line
    Author,
    /// Provider name derived from the locator
    Source,
    /// Progress/time line
    Time,
    /// Rendered queue listing
    Queue,
    /// Number of tracks left in the queue
    QueueSize,
    /// Current volume level
    Volume,
    /// Free-form status line
    Status,
}

impl UiField {
    /// Stable lowercase key for the field, as used by sink implementations
    pub fn as_str(self) -> &'static str {
        match self {
            UiField::NowPlaying => "nowplaying",
            UiField::Author => "author",
            UiField::Source => "source",
            UiField::Time => "time",
            UiField::Queue => "queue",
            UiField::QueueSize => "queuesize",
            UiField::Volume => "volume",
            UiField::Status => "status",
        }
    }
}

impl fmt::Display for UiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
