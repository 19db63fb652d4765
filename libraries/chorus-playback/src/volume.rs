//! Session volume
//!
//! Volume is an integer percentage where 100 is unity gain. Absolute sets
//! allow boosting up to 200; the step operations walk multiples of ten and
//! stay inside 0..=100.

use serde::{Deserialize, Serialize};

/// Hard ceiling for absolute volume sets
const VOLUME_MAX: u16 = 200;

/// Ceiling for stepped adjustment
const STEP_MAX: u16 = 100;

/// Granularity of stepped adjustment
const STEP: u16 = 10;

/// Integer volume with percent semantics (100 = unity gain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    level: u16,
}

impl Volume {
    /// Create a volume, clamping to the 0..=200 range
    pub fn new(level: u16) -> Self {
        Self {
            level: level.min(VOLUME_MAX),
        }
    }

    /// Set an absolute level, clamping to the 0..=200 range
    pub fn set(&mut self, level: u16) {
        self.level = level.min(VOLUME_MAX);
    }

    /// Current level as a percentage
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Multiplicative gain for the transport (1.0 = unity)
    pub fn gain(&self) -> f32 {
        f32::from(self.level) / 100.0
    }

    /// Step up to the next multiple of ten, capped at 100.
    ///
    /// Returns the new level, or `None` when already at or above the cap
    /// (a boosted level never steps further up).
    pub fn step_up(&mut self) -> Option<u16> {
        if self.level >= STEP_MAX {
            return None;
        }
        self.level = ((self.level / STEP) * STEP + STEP).min(STEP_MAX);
        Some(self.level)
    }

    /// Step down to the previous multiple of ten, with boosted levels
    /// snapping back to 100 first.
    ///
    /// Returns the new level, or `None` when already at zero.
    pub fn step_down(&mut self) -> Option<u16> {
        if self.level == 0 {
            return None;
        }
        if self.level > STEP_MAX {
            self.level = STEP_MAX;
        } else {
            self.level = (self.level).div_ceil(STEP) * STEP - STEP;
        }
        Some(self.level)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self { level: 20 }
    }
}
