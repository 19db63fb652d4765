//! Chorus Player - Playback State
//!
//! Pure data structures and invariant-preserving operations for the playback
//! session: the ordered queue, the bounded history, volume, loop mode and the
//! session phase machine.
//!
//! Nothing in this crate performs I/O or knows about async execution; the
//! session actor in `chorus-session` owns instances of these types and is the
//! only writer. That split keeps every queue invariant testable without a
//! runtime.
//!
//! # Example
//!
//! ```rust
//! use chorus_core::Track;
//! use chorus_playback::{History, Queue};
//!
//! let mut queue = Queue::new();
//! queue.enqueue(vec![Track::new("yt:1", "First"), Track::new("yt:2", "Second")], 0);
//!
//! let mut history = History::new(500);
//! if let Some(track) = queue.pop_front() {
//!     history.push(track);
//! }
//! assert_eq!(queue.len(), 1);
//! assert_eq!(history.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod error;
mod history;
mod queue;
mod state;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use history::History;
pub use queue::Queue;
pub use state::{LoopMode, SessionPhase};
pub use volume::Volume;
