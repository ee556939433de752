//! Random spawning: weighted food types and free-cell placement
//!
//! Sampling is bounded. A saturated grid can no longer hang the engine: the
//! random phase gives up after a fixed attempt budget, a deterministic scan
//! takes over, and a fully occupied board is reported instead of retried.

use rand::Rng;

use super::grid::Cell;
use super::state::{BonusFood, Food, FoodKind, GameState, Powerup, PowerupKind};
use crate::consts::{COLS, MAX_POWERUPS, ROWS};

/// Random-phase attempts before falling back to a deterministic scan
const MAX_RANDOM_ATTEMPTS: i32 = COLS * ROWS * 4;

/// Pick a food kind from a cumulative weight table and a uniform roll in [0,1)
pub fn pick_food_kind(table: &[(FoodKind, f32)], roll: f32) -> FoodKind {
    for &(kind, cumulative) in table {
        if roll < cumulative {
            return kind;
        }
    }
    // Weights are authored to sum to 1.0; a short table still yields its tail
    table.last().map(|&(kind, _)| kind).unwrap_or(FoodKind::Normal)
}

/// Uniformly pick a cell for which `occupied` is false. Returns `None` only
/// when every cell on the board is occupied.
pub fn find_free_cell<R: Rng>(
    rng: &mut R,
    mut occupied: impl FnMut(Cell) -> bool,
) -> Option<Cell> {
    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..COLS), rng.random_range(0..ROWS));
        if !occupied(cell) {
            return Some(cell);
        }
    }
    for y in 0..ROWS {
        for x in 0..COLS {
            let cell = Cell::new(x, y);
            if !occupied(cell) {
                return Some(cell);
            }
        }
    }
    None
}

impl GameState {
    /// Replace the food pellet: weighted kind, uniformly random free cell.
    /// Bonus food may legally share the cell; only the snake body and live
    /// power-ups exclude.
    pub fn respawn_food(&mut self) {
        let table = self.tuning.food_cumulative();
        let roll = self.rng.random::<f32>();
        let kind = pick_food_kind(&table, roll);

        let snake = &self.snake;
        let powerups = &self.powerups;
        let cell = find_free_cell(&mut self.rng, |c| {
            snake.contains(&c) || powerups.iter().any(|p| p.cell == c)
        });
        match cell {
            Some(cell) => self.food = Food { cell, kind },
            None => log::error!("grid saturated, food respawn skipped"),
        }
    }

    /// Place a bonus pellet with its expiry stamped relative to `now`
    pub fn spawn_bonus(&mut self, now: f64) {
        let snake = &self.snake;
        let powerups = &self.powerups;
        let cell = find_free_cell(&mut self.rng, |c| {
            snake.contains(&c) || powerups.iter().any(|p| p.cell == c)
        });
        if let Some(cell) = cell {
            self.bonus_food = Some(BonusFood {
                cell,
                expires_at: now + self.tuning.bonus_ttl_ms,
            });
        }
    }

    /// Place one power-up of the given kind. Power-ups exclude everything
    /// already on the board: snake, food, bonus food, other power-ups.
    pub fn spawn_powerup(&mut self, kind: PowerupKind, now: f64) {
        let food_cell = self.food.cell;
        let bonus_cell = self.bonus_food.map(|b| b.cell);
        let snake = &self.snake;
        let powerups = &self.powerups;
        let cell = find_free_cell(&mut self.rng, |c| {
            snake.contains(&c)
                || c == food_cell
                || bonus_cell == Some(c)
                || powerups.iter().any(|p| p.cell == c)
        });
        if let Some(cell) = cell {
            log::debug!("power-up {:?} at {:?}", kind, cell);
            self.powerups.push(Powerup {
                cell,
                kind,
                expires_at: now + self.tuning.powerup_ttl_ms,
            });
        }
    }

    /// Roll for a power-up spawn. Called once per tick, and only on ticks
    /// where the snake consumed food.
    pub fn maybe_spawn_powerup(&mut self, now: f64) {
        if self.powerups.len() >= MAX_POWERUPS {
            return;
        }
        if self.rng.random::<f32>() > self.tuning.powerup_chance {
            return;
        }
        let kind = PowerupKind::ALL[self.rng.random_range(0..PowerupKind::ALL.len())];
        self.spawn_powerup(kind, now);
    }
}
