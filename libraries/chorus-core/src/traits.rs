//! Collaborator traits for Chorus Player
//!
//! The session core owns all queue/history/state mutation; these traits are
//! the seams where everything else plugs in. Implementations live outside
//! this workspace (a Discord gateway, a test fake, ...).

use crate::error::{ResolveError, SettingsError, SinkError, TransportError};
use crate::types::{GuildId, Track, UiField};
use async_trait::async_trait;
use std::fmt;

/// One-shot completion handle for a playing stream.
///
/// A transport receives one of these with every `play` call and must fire it
/// exactly once - when the stream ends naturally, when it dies with an error,
/// or when it is force-stopped. It may be fired from any thread: the closure
/// inside only performs a channel send, never touches session state, and
/// never panics.
pub struct StreamDone {
    inner: Option<Box<dyn FnOnce(Option<TransportError>) + Send>>,
}

impl StreamDone {
    /// Wrap a completion closure.
    pub fn new(f: impl FnOnce(Option<TransportError>) + Send + 'static) -> Self {
        Self {
            inner: Some(Box::new(f)),
        }
    }

    /// Fire the completion. `error` carries the failure for streams that
    /// died mid-playback, `None` for a clean end or a forced stop.
    pub fn complete(mut self, error: Option<TransportError>) {
        if let Some(f) = self.inner.take() {
            f(error);
        }
    }
}

impl fmt::Debug for StreamDone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamDone")
            .field("armed", &self.inner.is_some())
            .finish()
    }
}

/// The audio pipeline for one session.
///
/// Stream acquisition happens inside [`play`](Transport::play) and may
/// suspend or fail; the session holds no locks across that await.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the voice connection for this session.
    async fn connect(&self, channel_ref: &str) -> Result<(), TransportError>;

    /// Resolve `locator` into an audio stream and start playing it at
    /// `gain` (1.0 = unity). Fires `done` exactly once when the stream ends.
    async fn play(&self, locator: &str, gain: f32, done: StreamDone)
        -> Result<(), TransportError>;

    /// Force-stop the active stream, if any. Triggers the pending `done`.
    fn stop(&self);

    /// Pause the active stream.
    fn pause(&self);

    /// Resume a paused stream.
    fn resume(&self);

    /// Whether a stream is currently playing.
    fn is_playing(&self) -> bool;

    /// Whether a stream is paused mid-track.
    fn is_paused(&self) -> bool;

    /// Update the live gain of the active stream (1.0 = unity).
    fn set_gain(&self, gain: f32);

    /// Tear down the voice connection.
    async fn disconnect(&self);
}

/// Media resolution: free text or a link in, an ordered track list out.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve a query into playable tracks. A playlist link may produce
    /// many tracks; a search query produces at least one or `NoResults`.
    async fn resolve(&self, query: &str) -> Result<Vec<Track>, ResolveError>;
}

/// Fan-out target for keyed UI field updates.
///
/// Rendering (code fences, percent suffixes, embed layout) is entirely the
/// implementation's concern; the session only pushes raw values.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Attach the UI surface to the given text channel.
    async fn attach(&self, channel_ref: &str) -> Result<(), SinkError>;

    /// Detach the UI surface, releasing the external resource.
    async fn detach(&self);

    /// Publish a new value for a field.
    fn publish(&self, field: UiField, value: &str);
}

/// Persistent per-guild key/value settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting; `None` when it was never written.
    async fn get(&self, guild: GuildId, key: &str) -> Result<Option<String>, SettingsError>;

    /// Write a setting.
    async fn set(&self, guild: GuildId, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Optional per-session channel-topic target for the status line.
#[async_trait]
pub trait TopicChannel: Send + Sync {
    /// Replace the channel topic.
    async fn set_topic(&self, text: &str) -> Result<(), SinkError>;
}
