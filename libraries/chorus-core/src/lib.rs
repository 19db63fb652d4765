//! Chorus Player Core
//!
//! Core types and collaborator traits for Chorus Player.
//!
//! This crate defines the contract between the session core and the outside
//! world. The session never talks to a streaming service, a voice connection
//! or a chat UI directly; it talks to the traits defined here:
//!
//! - [`Transport`] - the audio pipeline (connect, play, stop, gain)
//! - [`Resolver`] - turns free-text queries and links into [`Track`] lists
//! - [`NotificationSink`] - keyed field updates for whatever UI is attached
//! - [`SettingsStore`] - persistent per-guild settings (volume, topic)
//! - [`TopicChannel`] - optional status line target
//!
//! The only concrete machinery here is [`StreamDone`], the one-shot handle a
//! transport fires when a stream ends. It is defined in core so transport
//! implementations never need to know anything about session internals.

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ResolveError, SettingsError, SinkError, TransportError};
pub use traits::{NotificationSink, Resolver, SettingsStore, StreamDone, TopicChannel, Transport};
pub use types::{GuildId, Track, UiField};
