//! Process-wide session registry
//!
//! One registry owns every live session handle, keyed by guild. Sessions are
//! created on first use; a handle whose task has terminated is replaced on
//! the next lookup rather than resurrected.

use crate::config::SessionConfig;
use crate::session::{Session, SessionDeps, SessionHandle};
use chorus_core::{GuildId, NotificationSink, Resolver, SettingsStore, TopicChannel, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Supplies per-guild collaborator instances for new sessions.
///
/// The registry is generic over where transports and sinks come from; a
/// Discord gateway builds real ones, tests build fakes.
pub trait SessionBackend: Send + Sync {
    /// Voice transport for a guild
    fn transport(&self, guild: GuildId) -> Arc<dyn Transport>;

    /// UI surface for a guild
    fn sink(&self, guild: GuildId) -> Arc<dyn NotificationSink>;

    /// Shared media resolver
    fn resolver(&self) -> Arc<dyn Resolver>;

    /// Shared settings store
    fn settings(&self) -> Arc<dyn SettingsStore>;

    /// Channel-topic target for a guild, if the guild has one
    fn topic_channel(&self, guild: GuildId) -> Option<Arc<dyn TopicChannel>>;
}

/// Registry of live sessions keyed by guild
pub struct PlayerRegistry {
    backend: Arc<dyn SessionBackend>,
    config: SessionConfig,
    sessions: Mutex<HashMap<GuildId, SessionHandle>>,
}

impl PlayerRegistry {
    /// Create an empty registry
    pub fn new(backend: Arc<dyn SessionBackend>, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the session for a guild, spawning one when there is none or
    /// when the previous one has terminated.
    ///
    /// # Panics
    /// Panics if the registry mutex was poisoned by a panicking thread.
    pub fn get_or_create(&self, guild: GuildId) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(handle) = sessions.get(&guild) {
            if !handle.is_closed() {
                return handle.clone();
            }
            debug!(%guild, "replacing terminated session");
        }

        let deps = SessionDeps {
            transport: self.backend.transport(guild),
            resolver: self.backend.resolver(),
            settings: self.backend.settings(),
            sink: self.backend.sink(guild),
            topic: self.backend.topic_channel(guild),
        };
        let handle = Session::spawn(guild, self.config.clone(), deps);
        sessions.insert(guild, handle.clone());
        handle
    }

    /// The live session for a guild, if one exists and has not terminated.
    ///
    /// # Panics
    /// Panics if the registry mutex was poisoned by a panicking thread.
    pub fn get(&self, guild: GuildId) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(&guild).filter(|h| !h.is_closed()).cloned()
    }

    /// Drop the handle for a guild. The session task itself terminates when
    /// it processes its destroy command or when every handle is gone.
    ///
    /// # Panics
    /// Panics if the registry mutex was poisoned by a panicking thread.
    pub fn remove(&self, guild: GuildId) {
        self.sessions.lock().unwrap().remove(&guild);
    }

    /// Number of registered sessions, terminated ones included.
    ///
    /// # Panics
    /// Panics if the registry mutex was poisoned by a panicking thread.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Whether no session is registered.
    ///
    /// # Panics
    /// Panics if the registry mutex was poisoned by a panicking thread.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }
}
