//! The per-tick simulation step
//!
//! One `step` per accepted tick: commit the pending direction, advance the
//! head with toroidal wraparound, resolve self-collision and consumption,
//! prune expired timers, recompute the tick interval. Gating of when a tick
//! is accepted lives in the session controller.

use rand::Rng;

use super::grid::{Direction, wrap_cell};
use super::state::{BonusFood, GamePhase, GameState, PowerupKind};
use crate::cell_center_px;

impl GameState {
    /// Offer a direction request. Under an active invert effect the request
    /// is mirrored before anything else. A request that would reverse the
    /// *committed* direction is silently dropped; an accepted request
    /// overwrites any pending, unconsumed one.
    pub fn queue_direction(&mut self, requested: Direction, now: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        let dir = if self.effects.invert_active(now) {
            requested.inverted()
        } else {
            requested
        };
        if dir == self.dir.opposite() {
            return;
        }
        self.pending_dir = dir;
    }

    /// Advance the simulation by one accepted tick
    pub fn step(&mut self, now: f64) {
        if self.phase != GamePhase::Running {
            return;
        }

        // The only point where the direction changes; reversals were already
        // rejected at input time.
        self.dir = self.pending_dir;

        let head = wrap_cell(self.head() + self.dir.vector());

        // Collision is checked before the tail moves, so the about-to-vacate
        // tail cell still counts.
        if self.snake.contains(&head) {
            if self.effects.shield_active(now) {
                self.effects.consume_shield(now);
                self.spawn_burst(cell_center_px(head), PowerupKind::GoodShield.color());
            } else {
                log::info!("game over at score {} (level {})", self.score, self.level);
                self.phase = GamePhase::Over;
                return;
            }
        }

        self.snake.push_front(head);

        // Exactly one consumption per tick, in priority order
        if head == self.food.cell {
            self.eat_food(now);
        } else if self.bonus_food.map(|b| b.cell) == Some(head) {
            self.eat_bonus(now);
        } else if let Some(idx) = self.powerups.iter().position(|p| p.cell == head) {
            let picked = self.powerups.remove(idx);
            self.apply_powerup(picked.kind, now);
            self.level_up_if_needed();
        } else {
            // Net-zero tick: the head prepend is paid for by the tail
            self.snake.pop_back();
        }

        // TTL expiry is polled, not event-driven
        if self.bonus_food.is_some_and(|b| now > b.expires_at) {
            self.bonus_food = None;
        }
        self.powerups.retain(|p| now < p.expires_at);
        if now > self.combo_until {
            self.combo = 1;
        }

        self.tick_ms = self
            .effects
            .compute_tick_ms(now, self.base_tick_ms, &self.tuning);
        self.update_particles();
    }

    fn eat_food(&mut self, now: f64) {
        let food_tuning = self.tuning.food(self.food.kind);
        self.score += food_tuning.value * self.combo;
        self.combo = (self.combo + 1).min(self.tuning.combo_cap);
        self.combo_until = now + self.tuning.food_combo_window_ms;
        self.spawn_burst(cell_center_px(self.head()), self.food.kind.color());

        // The head prepend already grew the snake by one; duplicate the tail
        // for the remainder, and skip the tail pop entirely. Net growth is
        // exactly `grow` segments.
        self.grow_tail(food_tuning.grow.saturating_sub(1) as usize);

        self.respawn_food();
        if self.bonus_food.is_none() && self.rng.random::<f32>() < self.tuning.bonus_chance {
            self.spawn_bonus(now);
        }
        self.maybe_spawn_powerup(now);
        self.level_up_if_needed();
    }

    fn eat_bonus(&mut self, now: f64) {
        self.score += self.tuning.bonus_value;
        self.combo = (self.combo + 2).min(self.tuning.combo_cap);
        self.combo_until = now + self.tuning.bonus_combo_window_ms;
        self.spawn_burst(cell_center_px(self.head()), BonusFood::COLOR);
        self.bonus_food = None;
        self.level_up_if_needed();
    }

    /// Apply a power-up once, atomically, at pickup
    fn apply_powerup(&mut self, kind: PowerupKind, now: f64) {
        match kind {
            PowerupKind::GoodSlow => self.effects.slow_until = now + kind.duration_ms(),
            PowerupKind::GoodShield => self.effects.shield_until = now + kind.duration_ms(),
            PowerupKind::GoodGrow => self.grow_tail(2),
            PowerupKind::BadBomb => {
                if self.snake.len() > 4 {
                    self.snake.pop_back();
                    self.snake.pop_back();
                }
            }
            PowerupKind::BadFast => self.effects.fast_until = now + kind.duration_ms(),
            PowerupKind::BadInvert => self.effects.invert_until = now + kind.duration_ms(),
        }

        let delta = kind.score_delta();
        if delta >= 0 {
            self.score += delta as u32;
        } else {
            // Score floor is zero
            self.score = self.score.saturating_sub(delta.unsigned_abs());
        }
        log::debug!("picked up {:?} ({:+})", kind, delta);
        self.spawn_burst(cell_center_px(self.head()), kind.color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Cell, in_bounds};
    use crate::sim::state::{Food, FoodKind, Powerup};
    use crate::tuning::Tuning;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    /// Put food of the given kind directly in the head's path
    fn food_ahead(state: &mut GameState, kind: FoodKind) {
        let cell = wrap_cell(state.head() + state.dir.vector());
        state.food = Food { cell, kind };
    }

    #[test]
    fn test_reversal_rejected() {
        let mut state = running_state(1);
        assert_eq!(state.dir, Direction::Right);

        state.queue_direction(Direction::Left, 0.0);
        assert_eq!(state.pending_dir, Direction::Right);

        state.queue_direction(Direction::Up, 0.0);
        assert_eq!(state.pending_dir, Direction::Up);
    }

    #[test]
    fn test_pending_overwrites() {
        let mut state = running_state(1);
        state.queue_direction(Direction::Up, 0.0);
        state.queue_direction(Direction::Down, 0.0);
        // Down is not the reverse of the committed Right, so it wins
        assert_eq!(state.pending_dir, Direction::Down);
    }

    #[test]
    fn test_invert_mirrors_requests() {
        let mut state = running_state(1);
        state.effects.invert_until = 1000.0;

        // Mirrored Up becomes Down, accepted
        state.queue_direction(Direction::Up, 0.0);
        assert_eq!(state.pending_dir, Direction::Down);

        // Mirrored Right becomes Left, the reverse of the committed Right
        state.pending_dir = Direction::Right;
        state.queue_direction(Direction::Right, 0.0);
        assert_eq!(state.pending_dir, Direction::Right);

        // Effect expired: requests pass through unmirrored
        state.queue_direction(Direction::Up, 2000.0);
        assert_eq!(state.pending_dir, Direction::Up);
    }

    #[test]
    fn test_eat_normal_food() {
        let mut state = running_state(3);
        food_ahead(&mut state, FoodKind::Normal);
        let len = state.snake.len();

        state.step(0.0);

        assert_eq!(state.score, 10);
        assert_eq!(state.combo, 2);
        assert_eq!(state.combo_until, 2600.0);
        // Net growth of exactly one segment, no tail removal
        assert_eq!(state.snake.len(), len + 1);
    }

    #[test]
    fn test_eat_turbo_food_with_combo() {
        let mut state = running_state(3);
        state.combo = 3;
        food_ahead(&mut state, FoodKind::Turbo);
        let len = state.snake.len();

        state.step(0.0);

        assert_eq!(state.score, 75);
        assert_eq!(state.combo, 4);
        assert_eq!(state.snake.len(), len + 2);
    }

    #[test]
    fn test_combo_caps_at_eight() {
        let mut state = running_state(3);
        state.combo = 8;
        food_ahead(&mut state, FoodKind::Normal);
        state.step(0.0);
        assert_eq!(state.combo, 8);
        assert_eq!(state.score, 80);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut state = running_state(3);
        food_ahead(&mut state, FoodKind::Normal);
        state.step(0.0);
        assert_eq!(state.combo, 2);

        // Keep later ticks consumption-free
        state.food.cell = Cell::new(0, 0);
        state.bonus_food = None;
        state.powerups.clear();

        // Inside the window: combo survives
        state.step(2600.0);
        assert_eq!(state.combo, 2);

        // Past the window: back to 1
        state.step(2700.0);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_noop_tick_keeps_length() {
        let mut state = running_state(3);
        // Park the food away from the path
        state.food.cell = Cell::new(0, 0);
        let len = state.snake.len();
        state.step(0.0);
        assert_eq!(state.snake.len(), len);
    }

    #[test]
    fn test_eat_bonus_food() {
        let mut state = running_state(3);
        state.food.cell = Cell::new(0, 0);
        let cell = wrap_cell(state.head() + state.dir.vector());
        state.bonus_food = Some(BonusFood {
            cell,
            expires_at: 6000.0,
        });

        state.step(100.0);

        assert_eq!(state.score, 80);
        assert_eq!(state.combo, 3);
        assert_eq!(state.combo_until, 3100.0);
        assert!(state.bonus_food.is_none());
    }

    #[test]
    fn test_bonus_food_expires() {
        let mut state = running_state(3);
        state.food.cell = Cell::new(0, 0);
        state.bonus_food = Some(BonusFood {
            cell: Cell::new(1, 1),
            expires_at: 500.0,
        });
        state.step(600.0);
        assert!(state.bonus_food.is_none());
    }

    #[test]
    fn test_powerup_expires() {
        let mut state = running_state(3);
        state.food.cell = Cell::new(0, 0);
        state.powerups.push(Powerup {
            cell: Cell::new(1, 1),
            kind: PowerupKind::GoodGrow,
            expires_at: 500.0,
        });
        state.step(500.0);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_pickup_applies_timed_effect() {
        let mut state = running_state(3);
        state.food.cell = Cell::new(0, 0);
        let cell = wrap_cell(state.head() + state.dir.vector());
        state.powerups.push(Powerup {
            cell,
            kind: PowerupKind::GoodSlow,
            expires_at: 9000.0,
        });

        state.step(100.0);

        assert!(state.powerups.is_empty());
        assert_eq!(state.effects.slow_until, 5100.0);
        assert_eq!(state.score, 20);
        // Slow widens the effective interval
        assert_eq!(state.tick_ms, 175.0);
    }

    #[test]
    fn test_score_never_negative() {
        let mut state = running_state(3);
        state.score = 5;
        state.apply_powerup(PowerupKind::BadBomb, 0.0);
        assert_eq!(state.score, 0);

        state.apply_powerup(PowerupKind::BadFast, 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bomb_spares_short_snake() {
        let mut state = running_state(3);
        assert_eq!(state.snake.len(), 3);
        state.apply_powerup(PowerupKind::BadBomb, 0.0);
        assert_eq!(state.snake.len(), 3);

        state.grow_tail(3);
        state.apply_powerup(PowerupKind::BadBomb, 0.0);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_grow_powerup() {
        let mut state = running_state(3);
        state.apply_powerup(PowerupKind::GoodGrow, 0.0);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.score, 20);
    }

    /// A snake folded so that stepping down runs into its own body
    fn colliding_state() -> GameState {
        let mut state = running_state(9);
        state.snake = std::collections::VecDeque::from([
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ]);
        state.dir = Direction::Down;
        state.pending_dir = Direction::Down;
        state.food.cell = Cell::new(0, 0);
        state
    }

    #[test]
    fn test_shielded_collision_survives() {
        let mut state = colliding_state();
        state.effects.shield_until = 1000.0;
        let len = state.snake.len();

        state.step(100.0);

        assert_eq!(state.phase, GamePhase::Running);
        // Shield is spent whole, immediately inactive
        assert!(!state.effects.shield_active(100.0));
        assert_eq!(state.snake.len(), len);
    }

    #[test]
    fn test_unshielded_collision_ends_session() {
        let mut state = colliding_state();
        let snake_before = state.snake.clone();

        state.step(100.0);

        assert_eq!(state.phase, GamePhase::Over);
        // Terminal transition performs no further effects this tick
        assert_eq!(state.snake, snake_before);

        // Ticks are no longer consumed
        state.step(300.0);
        assert_eq!(state.snake, snake_before);
    }

    #[test]
    fn test_level_up_on_threshold() {
        let mut state = running_state(3);
        state.score = 130;
        food_ahead(&mut state, FoodKind::Normal);

        state.step(0.0);

        assert_eq!(state.score, 140);
        assert_eq!(state.level, 2);
        assert_eq!(state.base_tick_ms, 132.0);
    }

    #[test]
    fn test_level_never_decreases() {
        let mut state = running_state(3);
        state.score = 300;
        state.level_up_if_needed();
        assert_eq!(state.level, 3);

        state.score = 0;
        state.level_up_if_needed();
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_base_interval_floor() {
        let mut state = running_state(3);
        state.score = 140 * 40;
        state.level_up_if_needed();
        assert_eq!(state.base_tick_ms, 72.0);
    }

    #[test]
    fn test_particles_decay() {
        let mut state = running_state(3);
        state.food.cell = Cell::new(0, 0);
        state.spawn_burst(glam::Vec2::new(10.0, 10.0), "#ffffff");
        assert!(!state.particles.is_empty());
        for i in 0..60 {
            state.step(i as f64 * 140.0);
        }
        if state.phase == GamePhase::Running {
            assert!(state.particles.is_empty());
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn head_stays_in_bounds(moves in proptest::collection::vec(0u8..4, 1..300)) {
                let mut state = running_state(0xfeed);
                let mut now = 0.0;
                for m in moves {
                    let dir = match m {
                        0 => Direction::Up,
                        1 => Direction::Down,
                        2 => Direction::Left,
                        _ => Direction::Right,
                    };
                    state.queue_direction(dir, now);
                    state.step(now);
                    prop_assert!(in_bounds(state.head()));
                    if state.phase != GamePhase::Running {
                        break;
                    }
                    now += 140.0;
                }
            }
        }
    }
}
