//! Ordered playback queue
//!
//! Insertion order is significant: the front of the queue is always the next
//! track consumed by playback advance.

use crate::error::{PlaybackError, Result};
use chorus_core::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Maximum rendered length of a track name in a queue listing
const DISPLAY_NAME_MAX: usize = 40;

/// Placeholder for empty queue slots in a listing
const DISPLAY_PLACEHOLDER: &str = "---";

/// Ordered queue of tracks
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Insert tracks into the queue.
    ///
    /// `at_index == 0` appends to the end. `at_index >= 1` splices so the
    /// first new track lands at 1-based position `at_index`; an index past
    /// the end degrades to an append.
    pub fn enqueue(&mut self, tracks: Vec<Track>, at_index: usize) {
        if at_index == 0 {
            self.tracks.extend(tracks);
        } else {
            let at = (at_index - 1).min(self.tracks.len());
            self.tracks.splice(at..at, tracks);
        }
    }

    /// Take the front track (the one playback consumes next)
    pub fn pop_front(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.tracks.remove(0))
        }
    }

    /// Put a track back at the very front (rewind path)
    pub fn push_front(&mut self, track: Track) {
        self.tracks.insert(0, track);
    }

    /// Remove the 0-based half-open range `[lo, hi_excl)`.
    ///
    /// Returns how many tracks were removed. The error distinguishes the
    /// empty-queue, single-index (`hi_excl == lo + 1`) and ranged cases.
    pub fn remove_range(&mut self, lo: usize, hi_excl: usize) -> Result<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlaybackError::QueueEmpty);
        }
        if lo >= len || hi_excl > len || hi_excl <= lo {
            if hi_excl == lo + 1 {
                return Err(PlaybackError::IndexOutOfBounds {
                    index: lo + 1,
                    len,
                });
            }
            return Err(PlaybackError::InvalidRange {
                lo: lo + 1,
                hi: hi_excl,
                len,
            });
        }

        let removed = self.tracks.drain(lo..hi_excl).count();
        Ok(removed)
    }

    /// Uniform random permutation in place (Fisher-Yates)
    pub fn shuffle(&mut self) {
        let mut rng = thread_rng();
        self.tracks.shuffle(&mut rng);
    }

    /// Remove everything, returning how many tracks were dropped
    pub fn clear(&mut self) -> usize {
        let len = self.tracks.len();
        self.tracks.clear();
        len
    }

    /// Take all tracks out, preserving order (loop wraparound path)
    pub fn drain_all(&mut self) -> Vec<Track> {
        std::mem::take(&mut self.tracks)
    }

    /// Render up to `n` display entries for the UI.
    ///
    /// Names longer than 40 characters are truncated to 37 plus an ellipsis;
    /// slots past the end of the queue render as "---" so the listing always
    /// has a fixed shape.
    pub fn snapshot(&self, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| match self.tracks.get(i) {
                Some(track) => truncate_name(&track.name),
                None => DISPLAY_PLACEHOLDER.to_string(),
            })
            .collect()
    }

    /// Track at 0-based index, if any
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Number of tracks in the queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate over the queued tracks front to back
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX {
        let mut out: String = name.chars().take(DISPLAY_NAME_MAX - 3).collect();
        out.push_str("...");
        out
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn track(id: &str) -> Track {
        Track::new(format!("yt:{}", id), format!("Track {}", id))
    }

    fn names(queue: &Queue) -> Vec<String> {
        queue.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn enqueue_at_zero_appends() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a"), track("b")], 0);
        queue.enqueue(vec![track("c")], 0);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get(2).unwrap().name, "Track c");
    }

    #[test]
    fn enqueue_at_index_splices() {
        // [A, B, C], insert [X, Y] at 1-based position 2 -> [A, X, Y, B, C]
        let mut queue = Queue::new();
        queue.enqueue(vec![track("A"), track("B"), track("C")], 0);
        queue.enqueue(vec![track("X"), track("Y")], 2);

        assert_eq!(
            names(&queue),
            vec!["Track A", "Track X", "Track Y", "Track B", "Track C"]
        );
    }

    #[test]
    fn enqueue_past_end_appends() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a")], 0);
        queue.enqueue(vec![track("b")], 99);

        assert_eq!(names(&queue), vec!["Track a", "Track b"]);
    }

    #[test]
    fn pop_front_consumes_in_order() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a"), track("b")], 0);

        assert_eq!(queue.pop_front().unwrap().name, "Track a");
        assert_eq!(queue.pop_front().unwrap().name, "Track b");
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn push_front_lands_at_head() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("z")], 0);
        queue.push_front(track("y"));
        queue.push_front(track("x"));

        assert_eq!(names(&queue), vec!["Track x", "Track y", "Track z"]);
    }

    #[test]
    fn remove_range_half_open() {
        // RemoveRange(1,3) on [A,B,C,D,E] removes positions 1,2 -> [A,D,E]
        let mut queue = Queue::new();
        queue.enqueue(
            vec![track("A"), track("B"), track("C"), track("D"), track("E")],
            0,
        );

        let removed = queue.remove_range(1, 3).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(names(&queue), vec!["Track A", "Track D", "Track E"]);
    }

    #[test]
    fn remove_range_rejects_empty_queue() {
        let mut queue = Queue::new();
        assert_eq!(queue.remove_range(0, 1), Err(PlaybackError::QueueEmpty));
    }

    #[test]
    fn remove_range_rejects_single_out_of_bounds() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a")], 0);

        assert_eq!(
            queue.remove_range(4, 5),
            Err(PlaybackError::IndexOutOfBounds { index: 5, len: 1 })
        );
    }

    #[test]
    fn remove_range_rejects_bad_range() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a"), track("b")], 0);

        // upper bound past the end
        assert!(matches!(
            queue.remove_range(0, 3),
            Err(PlaybackError::InvalidRange { .. })
        ));
        // empty range
        assert!(matches!(
            queue.remove_range(1, 1),
            Err(PlaybackError::InvalidRange { .. })
        ));
    }

    #[test]
    fn snapshot_pads_and_truncates() {
        let mut queue = Queue::new();
        let long_name = "x".repeat(50);
        queue.enqueue(vec![Track::new("yt:long", long_name), track("b")], 0);

        let snap = queue.snapshot(4);
        assert_eq!(snap.len(), 4);
        assert_eq!(snap[0].chars().count(), 40);
        assert!(snap[0].ends_with("..."));
        assert_eq!(snap[1], "Track b");
        assert_eq!(snap[2], "---");
        assert_eq!(snap[3], "---");
    }

    #[test]
    fn snapshot_keeps_exact_forty_chars() {
        let mut queue = Queue::new();
        let name = "y".repeat(40);
        queue.enqueue(vec![Track::new("yt:40", name.clone())], 0);

        assert_eq!(queue.snapshot(1)[0], name);
    }

    #[test]
    fn drain_all_preserves_order() {
        let mut queue = Queue::new();
        queue.enqueue(vec![track("a"), track("b"), track("c")], 0);

        let drained = queue.drain_all();
        assert!(queue.is_empty());
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].name, "Track a");
        assert_eq!(drained[2].name, "Track c");
    }

    proptest! {
        /// Length after enqueue/pop sequences is len + inserted - popped, and
        /// untouched elements keep their relative order.
        #[test]
        fn enqueue_pop_preserves_length_and_order(
            initial in proptest::collection::vec(0u32..1000, 0..20),
            inserted in proptest::collection::vec(0u32..1000, 0..10),
            at_index in 0usize..25,
            pops in 0usize..10,
        ) {
            let mut queue = Queue::new();
            queue.enqueue(
                initial.iter().map(|i| Track::new(format!("l{i}"), format!("n{i}"))).collect(),
                0,
            );
            let before = queue.len();

            queue.enqueue(
                inserted.iter().map(|i| Track::new(format!("i{i}"), format!("m{i}"))).collect(),
                at_index,
            );
            prop_assert_eq!(queue.len(), before + inserted.len());

            let mut popped = 0;
            for _ in 0..pops {
                if queue.pop_front().is_some() {
                    popped += 1;
                }
            }
            prop_assert_eq!(queue.len(), (before + inserted.len()).saturating_sub(popped));

            // the original elements still appear in their original order
            let survivors: Vec<String> = queue
                .iter()
                .filter(|t| t.locator.starts_with('l'))
                .map(|t| t.locator.clone())
                .collect();
            let expected: Vec<String> = initial
                .iter()
                .map(|i| format!("l{i}"))
                .collect();
            prop_assert!(is_subsequence(&survivors, &expected));
        }
    }

    fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
        let mut it = haystack.iter();
        needle.iter().all(|n| it.any(|h| h == n))
    }
}
