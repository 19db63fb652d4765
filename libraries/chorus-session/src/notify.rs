//! Notification fan-out
//!
//! Thin layer between the session and its `NotificationSink`: renders queue
//! snapshots, resets now-playing fields, and mirrors status lines into the
//! log. Rendering beyond plain text (code fences, embeds, percent suffixes)
//! is the sink implementation's concern.

use chorus_core::{NotificationSink, Track, UiField};
use chorus_playback::Queue;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Value published when a field has nothing to show
const FIELD_EMPTY: &str = "---";

/// Publishes keyed field updates for one session
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    display_size: usize,
}

impl Notifier {
    /// Create a notifier rendering `display_size` queue slots
    pub fn new(sink: Arc<dyn NotificationSink>, display_size: usize) -> Self {
        Self { sink, display_size }
    }

    /// The underlying sink, for attach/detach during session transitions
    pub fn sink(&self) -> &Arc<dyn NotificationSink> {
        &self.sink
    }

    /// Publish the queue listing and size. Called after every queue mutation
    /// so the UI never drifts from session state.
    pub fn queue(&self, queue: &Queue) {
        let listing = queue
            .snapshot(self.display_size)
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {name}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        self.sink.publish(UiField::Queue, &listing);
        self.sink.publish(UiField::QueueSize, &queue.len().to_string());
    }

    /// Publish the now-playing fields for a freshly started track.
    ///
    /// Track metadata carries no author or duration, so those fields reset
    /// rather than going stale from the previous track.
    pub fn now_playing(&self, track: &Track) {
        self.sink.publish(UiField::NowPlaying, &track.name);
        self.sink.publish(UiField::Author, FIELD_EMPTY);
        self.sink.publish(UiField::Source, source_label(&track.locator));
        self.sink.publish(UiField::Time, FIELD_EMPTY);
    }

    /// Reset all now-playing fields to their empty placeholder
    pub fn reset_now_playing(&self) {
        self.sink.publish(UiField::NowPlaying, FIELD_EMPTY);
        self.sink.publish(UiField::Author, FIELD_EMPTY);
        self.sink.publish(UiField::Source, FIELD_EMPTY);
        self.sink.publish(UiField::Time, FIELD_EMPTY);
    }

    /// Publish the current volume level
    pub fn volume(&self, level: u16) {
        self.sink.publish(UiField::Volume, &level.to_string());
    }

    /// Publish an informational status line
    pub fn status_info(&self, message: &str) {
        info!(status = message, "session status");
        self.sink.publish(UiField::Status, message);
    }

    /// Publish a warning status line
    pub fn status_warn(&self, message: &str) {
        warn!(status = message, "session status");
        self.sink.publish(UiField::Status, message);
    }

    /// Publish an error status line
    pub fn status_error(&self, message: &str) {
        error!(status = message, "session status");
        self.sink.publish(UiField::Status, message);
    }
}

/// Human-readable source name derived from a track locator
pub fn source_label(locator: &str) -> &'static str {
    if locator.contains("youtu") {
        "YouTube"
    } else if locator.contains("soundcloud") {
        "SoundCloud"
    } else if locator.contains("twitch") {
        "Twitch"
    } else {
        "Unknown"
    }
}
