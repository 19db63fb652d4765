//! Session commands and argument parsing
//!
//! Everything a session can be asked to do is one `Command` variant sent over
//! its channel. The spec parsers (`SkipSpec`, `RemoveSpec`, `VolumeSpec`)
//! live here so the dispatch layer can reject malformed arguments before
//! anything reaches a session; a parse failure is an input error for the
//! user, never a session state change.

use chorus_core::TransportError;
use chorus_playback::LoopMode;
use std::str::FromStr;
use thiserror::Error;

/// A malformed command argument
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Skip argument was neither a positive count nor "all"
    #[error("'{0}' is not a number of songs or 'all'")]
    InvalidSkip(String),

    /// Remove argument was neither a position, a range, nor "all"
    #[error("'{0}' is not a position, a range like 2-5, or 'all'")]
    InvalidRemove(String),

    /// Volume argument was neither a number nor a step
    #[error("'{0}' is not a volume, '+' or '-'")]
    InvalidVolume(String),

    /// Loop argument was not a known mode
    #[error("'{0}' is not a loop mode (off, on or shuffle)")]
    InvalidLoopMode(String),
}

/// How many queued songs a skip consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipSpec {
    /// Skip the current song plus `n - 1` queued ones
    Count(u32),
    /// Skip everything, landing in the empty-queue branch
    All,
}

impl FromStr for SkipSpec {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(Self::Count(n)),
            _ => Err(CommandError::InvalidSkip(s.to_string())),
        }
    }
}

/// Which queued songs a remove drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveSpec {
    /// A single 1-based position
    Index(usize),
    /// An inclusive 1-based range
    Range(usize, usize),
    /// The whole queue
    All,
}

impl FromStr for RemoveSpec {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        if let Some((lo, hi)) = s.split_once('-') {
            let lo = lo.trim().parse::<usize>();
            let hi = hi.trim().parse::<usize>();
            return match (lo, hi) {
                (Ok(lo), Ok(hi)) if lo >= 1 => Ok(Self::Range(lo, hi)),
                _ => Err(CommandError::InvalidRemove(s.to_string())),
            };
        }
        match s.parse::<usize>() {
            Ok(i) if i >= 1 => Ok(Self::Index(i)),
            _ => Err(CommandError::InvalidRemove(s.to_string())),
        }
    }
}

/// A volume adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSpec {
    /// Step to the next multiple of ten
    Up,
    /// Step to the previous multiple of ten
    Down,
    /// Absolute level, clamped to 0..=200 when applied
    Absolute(u16),
}

impl FromStr for VolumeSpec {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Up),
            "-" => Ok(Self::Down),
            _ => s
                .parse::<u16>()
                .map(Self::Absolute)
                .map_err(|_| CommandError::InvalidVolume(s.to_string())),
        }
    }
}

/// Parse a loop mode argument, rejecting unknown modes as an input error.
pub fn parse_loop_mode(s: &str) -> Result<LoopMode, CommandError> {
    s.to_ascii_lowercase()
        .parse::<LoopMode>()
        .map_err(|()| CommandError::InvalidLoopMode(s.to_string()))
}

/// Everything a session can be asked to do.
///
/// `StreamEnded` is internal: only the completion bridge constructs it, and
/// its sequence number is how stale stream completions are told apart from
/// the one currently armed.
#[derive(Debug)]
pub enum Command {
    /// Resolve a query and enqueue the results, starting the session first
    /// if it is offline
    Play {
        /// Voice channel to connect to when offline
        voice_channel: String,
        /// Text channel to attach the UI surface to when offline
        text_channel: String,
        /// Free text or a link for the resolver
        query: String,
        /// 1-based queue position for the first resolved track; 0 appends
        index: usize,
        /// Force-stop the current stream so the inserted tracks start now
        interrupt: bool,
        /// Shuffle the resolved batch before enqueueing
        shuffle: bool,
    },
    /// Pause the active stream
    Pause,
    /// Resume a paused stream
    Resume,
    /// Pause if playing, resume if paused
    Toggle,
    /// Drop the current song and zero or more queued ones
    Skip(SkipSpec),
    /// Drop queued songs without touching the current one
    Remove(RemoveSpec),
    /// Replay previously played songs; `Rewind(0)` restarts the current one
    Rewind(u32),
    /// Shuffle the queue in place
    Shuffle,
    /// Change the loop mode
    SetLoop(LoopMode),
    /// Adjust the volume
    SetVolume(VolumeSpec),
    /// Force-stop and clear queue and history, staying connected
    Stop,
    /// Reconnect the voice transport to another channel
    MoveVoice(String),
    /// Reattach the UI surface to another text channel
    MoveText(String),
    /// Enable the channel-topic status line
    TopicOn,
    /// Disable the channel-topic status line
    TopicOff,
    /// Tear the session down permanently
    Destroy,
    /// A stream finished, failed or was force-stopped (bridge internal)
    StreamEnded {
        /// Bridge sequence number the stream was armed with
        seq: u64,
        /// The failure, for streams that died mid-playback
        error: Option<TransportError>,
    },
}
