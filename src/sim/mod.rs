//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected timestamps only (milliseconds, monotonic), no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod effects;
pub mod grid;
pub mod spawn;
pub mod state;
pub mod tick;

pub use effects::Effects;
pub use grid::{Cell, Direction, in_bounds, wrap_cell};
pub use spawn::{find_free_cell, pick_food_kind};
pub use state::{
    BonusFood, Food, FoodKind, GamePhase, GameState, Particle, Powerup, PowerupKind,
};
