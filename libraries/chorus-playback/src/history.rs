//! Bounded playback history
//!
//! Finished tracks land here newest-first from the consumer's point of view:
//! `pop` returns the most recently played track. Capacity is enforced by
//! evicting the oldest entry.

use chorus_core::Track;
use std::collections::VecDeque;

/// Bounded stack of finished tracks
#[derive(Debug, Clone)]
pub struct History {
    tracks: VecDeque<Track>,
    max: usize,
}

impl History {
    /// Create an empty history holding at most `max` tracks
    pub fn new(max: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max.min(64)),
            max,
        }
    }

    /// Record a finished track, evicting the oldest entry when full
    pub fn push(&mut self, track: Track) {
        if self.tracks.len() >= self.max {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
    }

    /// Take back the most recently played track (rewind path)
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    /// Take everything out, oldest first (loop wraparound path)
    pub fn drain_all(&mut self) -> Vec<Track> {
        self.tracks.drain(..).collect()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Number of recorded tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
