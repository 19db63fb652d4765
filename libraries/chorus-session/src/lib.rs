//! Chorus Player - Session Core
//!
//! The concurrency core of the player: one actor task per guild owns that
//! guild's queue, history, volume and phase, and processes a serialized
//! command stream. Stream completions from the transport's execution context
//! are marshaled onto that same stream by the completion bridge, so a skip
//! racing a natural track end can never double-advance.
//!
//! External collaborators (voice transport, media resolver, UI sink,
//! settings store) are the trait objects defined in `chorus-core`; the
//! [`PlayerRegistry`] wires them to sessions via a [`SessionBackend`].

#![forbid(unsafe_code)]

mod bridge;
mod command;
mod config;
mod notify;
mod registry;
mod session;

// Public exports
pub use bridge::CompletionBridge;
pub use command::{Command, CommandError, RemoveSpec, SkipSpec, VolumeSpec, parse_loop_mode};
pub use config::SessionConfig;
pub use notify::{source_label, Notifier};
pub use registry::{PlayerRegistry, SessionBackend};
pub use session::{Session, SessionDeps, SessionHandle};
