//! Session configuration

use serde::{Deserialize, Serialize};

/// Tunables shared by every session a registry spawns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hard cap on history entries; the oldest are evicted past this
    pub history_max: usize,

    /// Number of queue slots rendered in the UI listing
    pub queue_display_size: usize,

    /// Volume used when a guild has no persisted setting yet
    pub default_volume: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_max: 500,
            queue_display_size: 9,
            default_volume: 20,
        }
    }
}
