//! Loop mode and the session phase machine
//!
//! The phase machine replaces ad-hoc "starting"/"moving" flags with one
//! explicit enum so every command handler can make a single readiness check.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens when the queue runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Playback stops at the end of the queue
    #[default]
    Off,
    /// Played tracks cycle back into the queue in order
    On,
    /// Played tracks cycle back into the queue in random order
    Shuffle,
}

impl LoopMode {
    /// Lowercase wire/settings form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Shuffle => "shuffle",
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoopMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "shuffle" => Ok(Self::Shuffle),
            _ => Err(()),
        }
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No voice connection; nothing is playing
    Offline,
    /// First connection in progress
    Starting,
    /// Connected and accepting playback commands
    Ready,
    /// Connected but mid-reconnect to another channel
    Moving,
    /// Torn down permanently; the actor is draining its mailbox
    Destroyed,
}

impl SessionPhase {
    /// Whether playback commands may run right now
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether a connection attempt is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Starting | Self::Moving)
    }

    /// Enter the in-flight phase for a connection attempt.
    ///
    /// `Offline` becomes `Starting`, `Ready` becomes `Moving`. Any other
    /// phase rejects the transition, which callers surface as "busy".
    pub fn begin_transition(&mut self) -> Result<()> {
        *self = match self {
            Self::Offline => Self::Starting,
            Self::Ready => Self::Moving,
            Self::Starting | Self::Moving => {
                return Err(PlaybackError::InvalidTransition(
                    "connection attempt already in flight",
                ))
            }
            Self::Destroyed => {
                return Err(PlaybackError::InvalidTransition("session is destroyed"))
            }
        };
        Ok(())
    }

    /// Leave the in-flight phase. A successful attempt lands in `Ready`;
    /// a failed one falls back to `Offline`.
    pub fn end_transition(&mut self, success: bool) {
        if self.is_busy() {
            *self = if success { Self::Ready } else { Self::Offline };
        }
    }

    /// Tear down for good. Terminal from every phase.
    pub fn destroy(&mut self) {
        *self = Self::Destroyed;
    }
}
