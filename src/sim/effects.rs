//! Time-bounded status effects
//!
//! Pure functions of the injected clock and four expiry timestamps. An effect
//! is active iff `now` is strictly before its timestamp. Effects do not stack
//! in duration: reapplying one overwrites its expiry.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Expiry timestamps for the four status effects (absolute ms)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Effects {
    pub slow_until: f64,
    pub fast_until: f64,
    pub invert_until: f64,
    pub shield_until: f64,
}

impl Effects {
    pub fn slow_active(&self, now: f64) -> bool {
        now < self.slow_until
    }

    pub fn fast_active(&self, now: f64) -> bool {
        now < self.fast_until
    }

    pub fn invert_active(&self, now: f64) -> bool {
        now < self.invert_until
    }

    pub fn shield_active(&self, now: f64) -> bool {
        now < self.shield_until
    }

    /// Spend the shield on an absorbed collision. The expiry is pulled back to
    /// `now`, so the shield is immediately inactive rather than decaying.
    pub fn consume_shield(&mut self, now: f64) {
        self.shield_until = now;
    }

    /// Effective tick interval: slow widens it, fast narrows it down to a
    /// floor. Both checks are independent and both apply when both are active.
    pub fn compute_tick_ms(&self, now: f64, base_ms: f64, tuning: &Tuning) -> f64 {
        let mut ms = base_ms;
        if self.slow_active(now) {
            ms += tuning.slow_penalty_ms;
        }
        if self.fast_active(now) {
            ms = (ms - tuning.fast_bonus_ms).max(tuning.fast_floor_ms);
        }
        ms
    }
}
