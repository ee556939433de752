//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked (or
//! loaded from JSON) without touching simulation logic.

use serde::{Deserialize, Serialize};

use crate::sim::FoodKind;

/// Balance values for one food kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoodTuning {
    /// Base score, multiplied by the combo at consumption
    pub value: u32,
    /// Net snake growth per pellet
    pub grow: u32,
    /// Spawn weight; the table's weights sum to 1.0
    pub weight: f32,
}

/// Game balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub normal: FoodTuning,
    pub turbo: FoodTuning,
    pub danger: FoodTuning,

    /// Tick interval at level 1 (ms)
    pub base_tick_ms: f64,
    /// Floor for the level-derived interval (ms)
    pub min_tick_ms: f64,
    /// Interval reduction per level gained (ms)
    pub level_step_ms: f64,
    /// Score required per level
    pub level_threshold: u32,

    /// Added to the interval while slow is active (ms)
    pub slow_penalty_ms: f64,
    /// Subtracted from the interval while fast is active (ms)
    pub fast_bonus_ms: f64,
    /// Hard floor for the fast-adjusted interval (ms)
    pub fast_floor_ms: f64,

    /// Combo multiplier cap
    pub combo_cap: u32,
    /// Combo window after regular food (ms)
    pub food_combo_window_ms: f64,
    /// Combo window after bonus food (ms)
    pub bonus_combo_window_ms: f64,

    /// Fixed bonus-food reward
    pub bonus_value: u32,
    pub bonus_ttl_ms: f64,
    /// Chance to spawn a bonus pellet after eating (when none is live)
    pub bonus_chance: f32,

    pub powerup_ttl_ms: f64,
    /// Per-consumption chance of a power-up spawn
    pub powerup_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            normal: FoodTuning {
                value: 10,
                grow: 1,
                weight: 0.75,
            },
            turbo: FoodTuning {
                value: 25,
                grow: 2,
                weight: 0.20,
            },
            danger: FoodTuning {
                value: 40,
                grow: 1,
                weight: 0.05,
            },

            base_tick_ms: 140.0,
            min_tick_ms: 72.0,
            level_step_ms: 8.0,
            level_threshold: 140,

            slow_penalty_ms: 35.0,
            fast_bonus_ms: 35.0,
            fast_floor_ms: 50.0,

            combo_cap: 8,
            food_combo_window_ms: 2600.0,
            bonus_combo_window_ms: 3000.0,

            bonus_value: 80,
            bonus_ttl_ms: 6000.0,
            bonus_chance: 0.2,

            powerup_ttl_ms: 9000.0,
            powerup_chance: 0.25,
        }
    }
}

impl Tuning {
    /// Balance values for a food kind
    pub fn food(&self, kind: FoodKind) -> FoodTuning {
        match kind {
            FoodKind::Normal => self.normal,
            FoodKind::Turbo => self.turbo,
            FoodKind::Danger => self.danger,
        }
    }

    /// Precomputed cumulative weight table for food sampling
    pub fn food_cumulative(&self) -> [(FoodKind, f32); 3] {
        let mut sum = 0.0;
        let mut table = [(FoodKind::Normal, 0.0); 3];
        for (slot, kind) in table
            .iter_mut()
            .zip([FoodKind::Normal, FoodKind::Turbo, FoodKind::Danger])
        {
            sum += self.food(kind).weight;
            *slot = (kind, sum);
        }
        table
    }

    /// Parse tuning from JSON, falling back to the shipped defaults on
    /// malformed input.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("invalid tuning json, using defaults: {err}");
                Self::default()
            }
        }
    }
}
