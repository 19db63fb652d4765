//! Completion bridge
//!
//! A transport signals "stream ended" from its own execution context. The
//! bridge turns that signal into a `StreamEnded` command on the session's
//! channel, so it is serialized with every other command and the foreign
//! thread never touches session state.
//!
//! Each armed stream gets a fresh sequence number. A completion whose number
//! no longer matches the armed one is stale: the stream was superseded by a
//! skip, a stop, or teardown, and the signal is dropped on arrival. This is
//! what guarantees at most one advance per stream end even when a forced
//! stop races a natural completion.

use crate::command::Command;
use chorus_core::StreamDone;
use tokio::sync::mpsc::UnboundedSender;

/// Marshals stream completions into the session's command stream
#[derive(Debug)]
pub struct CompletionBridge {
    tx: UnboundedSender<Command>,
    next_seq: u64,
    armed: Option<u64>,
}

impl CompletionBridge {
    /// Create a bridge feeding the given command channel
    pub fn new(tx: UnboundedSender<Command>) -> Self {
        Self {
            tx,
            next_seq: 0,
            armed: None,
        }
    }

    /// Arm the bridge for a new stream.
    ///
    /// The returned handle may be fired from any thread; it only performs a
    /// channel send. A send to a closed channel (session already gone) is
    /// ignored.
    pub fn arm(&mut self) -> StreamDone {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.armed = Some(seq);

        let tx = self.tx.clone();
        StreamDone::new(move |error| {
            let _ = tx.send(Command::StreamEnded { seq, error });
        })
    }

    /// Disarm without waiting for the completion to arrive. Any in-flight or
    /// late signal for the previously armed stream becomes stale.
    pub fn invalidate(&mut self) {
        self.armed = None;
    }

    /// Check a received completion against the armed stream. Returns `true`
    /// exactly once per armed stream; stale signals return `false`.
    pub fn acknowledge(&mut self, seq: u64) -> bool {
        if self.armed == Some(seq) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// Whether a stream completion is currently expected
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
