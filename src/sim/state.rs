//! Game state and core simulation types
//!
//! A single owned `GameState` value holds everything the tick mutates. No
//! globals, no ambient clock: callers inject `now` (milliseconds, monotonic)
//! into every time-dependent operation.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::grid::{Cell, Direction};
use crate::cell_center_px;
use crate::consts::MAX_PARTICLES;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session started yet
    Idle,
    /// Active gameplay
    Running,
    /// Suspended, state intact
    Paused,
    /// Run ended on an unshielded self-collision
    Over,
}

/// Food varieties, sampled by cumulative weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Turbo,
    Danger,
}

impl FoodKind {
    pub fn color(self) -> &'static str {
        match self {
            FoodKind::Normal => "#00e6a8",
            FoodKind::Turbo => "#00c2ff",
            FoodKind::Danger => "#ff5e7e",
        }
    }
}

/// The regular food pellet (always exactly one on the board)
#[derive(Debug, Clone, Copy)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

/// Transient bonus pellet with an expiry timestamp
#[derive(Debug, Clone, Copy)]
pub struct BonusFood {
    pub cell: Cell,
    /// Absolute expiry (ms); decays to absent once `now` passes it
    pub expires_at: f64,
}

impl BonusFood {
    pub const COLOR: &'static str = "#ffe87d";
}

/// Power-up varieties. Good ones help, bad ones punish; all spawn with a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    GoodSlow,
    GoodShield,
    GoodGrow,
    BadBomb,
    BadFast,
    BadInvert,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 6] = [
        PowerupKind::GoodSlow,
        PowerupKind::GoodShield,
        PowerupKind::GoodGrow,
        PowerupKind::BadBomb,
        PowerupKind::BadFast,
        PowerupKind::BadInvert,
    ];

    pub fn is_good(self) -> bool {
        matches!(
            self,
            PowerupKind::GoodSlow | PowerupKind::GoodShield | PowerupKind::GoodGrow
        )
    }

    /// Display label (render hint)
    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::GoodSlow => "Freeze",
            PowerupKind::GoodShield => "Shield",
            PowerupKind::GoodGrow => "Grow+",
            PowerupKind::BadBomb => "Bomb",
            PowerupKind::BadFast => "Speed+",
            PowerupKind::BadInvert => "Invert",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerupKind::GoodSlow => "#73d7ff",
            PowerupKind::GoodShield => "#9effaf",
            PowerupKind::GoodGrow => "#59ffc9",
            PowerupKind::BadBomb => "#ff4d5f",
            PowerupKind::BadFast => "#ff8f3f",
            PowerupKind::BadInvert => "#cf84ff",
        }
    }

    /// Effect duration for timed kinds (ms); instant kinds return 0
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerupKind::GoodSlow => 5000.0,
            PowerupKind::GoodShield => 6000.0,
            PowerupKind::GoodGrow => 0.0,
            PowerupKind::BadBomb => 0.0,
            PowerupKind::BadFast => 4000.0,
            PowerupKind::BadInvert => 4000.0,
        }
    }

    /// Score change at pickup. Negative deltas are clamped so score stays >= 0.
    pub fn score_delta(self) -> i32 {
        match self {
            PowerupKind::GoodSlow => 20,
            PowerupKind::GoodShield => 25,
            PowerupKind::GoodGrow => 20,
            PowerupKind::BadBomb => -20,
            PowerupKind::BadFast => -10,
            PowerupKind::BadInvert => -10,
        }
    }
}

/// A power-up entity on the board
#[derive(Debug, Clone, Copy)]
pub struct Powerup {
    pub cell: Cell,
    pub kind: PowerupKind,
    /// Absolute expiry (ms)
    pub expires_at: f64,
}

/// A cosmetic particle. No gameplay effect; pruned when life reaches zero.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub color: &'static str,
}

/// Particles spawned per burst
pub const BURST_PARTICLES: usize = 10;

/// Complete simulation state (single-owner, mutated only by tick/input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; the only randomness source in the engine
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Body cells, head first
    pub snake: VecDeque<Cell>,
    /// Committed direction for the current tick
    pub dir: Direction,
    /// Latest accepted direction request, committed at the next tick
    pub pending_dir: Direction,
    pub food: Food,
    pub bonus_food: Option<BonusFood>,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Never decreases within a session
    pub level: u32,
    /// Consumption multiplier in `[1, combo_cap]`
    pub combo: u32,
    /// Combo resets to 1 once `now` passes this
    pub combo_until: f64,
    /// Level-derived tick interval before effects (ms)
    pub base_tick_ms: f64,
    /// Effective tick interval after slow/fast effects (ms)
    pub tick_ms: f64,
    pub effects: Effects,
    pub tuning: Tuning,
}

impl GameState {
    /// Create a fresh state in the `Idle` phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            snake: VecDeque::new(),
            dir: Direction::Right,
            pending_dir: Direction::Right,
            food: Food {
                cell: Cell::new(0, 0),
                kind: FoodKind::Normal,
            },
            bonus_food: None,
            powerups: Vec::new(),
            particles: Vec::new(),
            score: 0,
            level: 1,
            combo: 1,
            combo_until: 0.0,
            base_tick_ms: tuning.base_tick_ms,
            tick_ms: tuning.base_tick_ms,
            effects: Effects::default(),
            tuning,
        };
        state.reset();
        state
    }

    /// Reset all entity/score/effect state to initial values. Keeps the RNG
    /// stream running so consecutive runs differ.
    pub fn reset(&mut self) {
        self.snake = VecDeque::from([Cell::new(8, 10), Cell::new(7, 10), Cell::new(6, 10)]);
        debug_assert_eq!(self.snake.len(), crate::consts::START_LENGTH);
        self.dir = Direction::Right;
        self.pending_dir = Direction::Right;
        self.powerups.clear();
        self.bonus_food = None;
        self.particles.clear();
        self.score = 0;
        self.combo = 1;
        self.combo_until = 0.0;
        self.level = 1;
        self.base_tick_ms = self.tuning.base_tick_ms;
        self.tick_ms = self.tuning.base_tick_ms;
        self.effects = Effects::default();
        self.respawn_food();
    }

    /// Head cell (the snake is never empty during a session)
    pub fn head(&self) -> Cell {
        *self.snake.front().unwrap_or(&Cell::new(0, 0))
    }

    /// Append `count` duplicates of the tail cell
    pub fn grow_tail(&mut self, count: usize) {
        if let Some(&tail) = self.snake.back() {
            for _ in 0..count {
                self.snake.push_back(tail);
            }
        }
    }

    /// Spawn a cosmetic particle burst at a pixel position
    pub fn spawn_burst(&mut self, pos: Vec2, color: &'static str) {
        for _ in 0..BURST_PARTICLES {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                self.rng.random::<f32>() - 0.5,
                self.rng.random::<f32>() - 0.5,
            ) * 2.0;
            let life = 25.0 + self.rng.random::<f32>() * 15.0;
            self.particles.push(Particle {
                pos,
                vel,
                life,
                color,
            });
        }
    }

    /// Advance and prune cosmetic particles (one call per accepted tick)
    pub fn update_particles(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Recompute level from score. Level only ever goes up; each new level
    /// shaves the base tick interval down to its floor.
    pub fn level_up_if_needed(&mut self) {
        let next = self.score / self.tuning.level_threshold + 1;
        if next > self.level {
            self.level = next;
            self.base_tick_ms = (self.tuning.base_tick_ms
                - (self.level - 1) as f64 * self.tuning.level_step_ms)
                .max(self.tuning.min_tick_ms);
            log::info!("level up -> {} (base interval {} ms)", self.level, self.base_tick_ms);
            let head_px = cell_center_px(self.head());
            self.spawn_burst(head_px, "#ffffff");
        }
    }
}
