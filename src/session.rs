//! Session lifecycle and tick gating
//!
//! Wraps the simulation state with the start/pause/game-over state machine,
//! variable-rate tick gating, best-score bookkeeping, and score saving. An
//! external driver calls `frame` at render rate; an actual simulation step
//! runs only when the speed-derived interval has elapsed.

use std::collections::VecDeque;

use crate::highscores::Leaderboard;
use crate::persistence::ScoreStore;
use crate::sim::{BonusFood, Cell, Direction, Food, GamePhase, GameState, Particle, Powerup};
use crate::tuning::Tuning;

/// Fallback name when the player leaves the input blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Discrete input events, decoupled from any binding mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Direction(Direction),
    TogglePause,
    Restart,
}

/// HUD values, published after every tick and session transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub best_score: u32,
}

/// Read-only view for the render collaborator
#[derive(Debug)]
pub struct RenderSnapshot<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub food: &'a Food,
    pub bonus_food: Option<&'a BonusFood>,
    pub powerups: &'a [Powerup],
    pub particles: &'a [Particle],
}

/// One play session: simulation state plus the persistence collaborator
pub struct Session<S: ScoreStore> {
    pub state: GameState,
    store: S,
    leaderboard: Leaderboard,
    best_score: u32,
    /// Timestamp of the last accepted tick (ms)
    last_tick: f64,
}

impl<S: ScoreStore> Session<S> {
    /// Create a session in the `Idle` phase, loading persisted scores
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let best_score = store.load_best_score();
        let leaderboard = store.load_leaderboard();
        Self {
            state: GameState::new(seed, tuning),
            store,
            leaderboard,
            best_score,
            last_tick: 0.0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reset all entity/score/effect state and enter `Running`
    pub fn start(&mut self, now: f64) {
        self.state.reset();
        self.state.phase = GamePhase::Running;
        self.last_tick = now;
        log::info!("session started (seed {})", self.state.seed);
    }

    /// Single input entry point for the input collaborator
    pub fn handle_input(&mut self, event: InputEvent, now: f64) {
        match event {
            // Dropped unless the session is running
            InputEvent::Direction(dir) => self.state.queue_direction(dir, now),
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::Restart => self.start(now),
        }
    }

    /// Pause toggles only between `Running` and `Paused`; no state reset
    fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Running => self.state.phase = GamePhase::Paused,
            GamePhase::Paused => self.state.phase = GamePhase::Running,
            _ => {}
        }
    }

    /// Render-rate entry point. Runs at most one simulation step, and only
    /// when the interval derived from the current speed has elapsed. Returns
    /// whether a step ran. `Idle`/`Paused`/`Over` consume no ticks.
    pub fn frame(&mut self, now: f64) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        if now - self.last_tick < self.state.tick_ms {
            return false;
        }
        self.state.step(now);
        self.last_tick = now;
        if self.state.phase == GamePhase::Over {
            self.finish_run();
        }
        true
    }

    /// Terminal bookkeeping: persist a strictly better best score
    fn finish_run(&mut self) {
        if self.state.score > self.best_score {
            self.best_score = self.state.score;
            self.store.save_best_score(self.best_score);
            log::info!("new best score {}", self.best_score);
        }
    }

    /// Record the finished run on the leaderboard. No-op unless the session
    /// is `Over` (mid-game scores are never recorded); blank or whitespace
    /// names fall back to a placeholder. Returns whether the score was saved.
    pub fn save_score(&mut self, name: &str) -> bool {
        if self.state.phase != GamePhase::Over {
            return false;
        }
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            name
        };
        self.leaderboard.add_score(name, self.state.score);
        self.store.save_leaderboard(&self.leaderboard);
        true
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.state.score,
            level: self.state.level,
            combo: self.state.combo,
            best_score: self.best_score,
        }
    }

    /// Read-only state view, consumed once per frame by the renderer
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            snake: &self.state.snake,
            food: &self.state.food,
            bonus_food: self.state.bonus_food.as_ref(),
            powerups: &self.state.powerups,
            particles: &self.state.particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::wrap_cell;

    fn session() -> Session<MemoryStore> {
        Session::new(77, Tuning::default(), MemoryStore::new())
    }

    /// Fold the snake so the next step self-collides
    fn force_collision(state: &mut GameState) {
        state.snake = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ]);
        state.dir = Direction::Down;
        state.pending_dir = Direction::Down;
        state.food.cell = Cell::new(0, 0);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Idle);

        s.start(0.0);
        assert_eq!(s.phase(), GamePhase::Running);

        s.handle_input(InputEvent::TogglePause, 10.0);
        assert_eq!(s.phase(), GamePhase::Paused);
        s.handle_input(InputEvent::TogglePause, 20.0);
        assert_eq!(s.phase(), GamePhase::Running);

        force_collision(&mut s.state);
        assert!(s.frame(200.0));
        assert_eq!(s.phase(), GamePhase::Over);

        // Pause cannot leave the terminal state; restart can
        s.handle_input(InputEvent::TogglePause, 210.0);
        assert_eq!(s.phase(), GamePhase::Over);
        s.handle_input(InputEvent::Restart, 220.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.hud().score, 0);
    }

    #[test]
    fn test_frame_gating() {
        let mut s = session();
        s.start(0.0);
        let head = s.state.head();

        // Too early: render-only frames, no simulation step
        assert!(!s.frame(50.0));
        assert!(!s.frame(139.0));
        assert_eq!(s.state.head(), head);

        assert!(s.frame(140.0));
        assert_eq!(s.state.head(), wrap_cell(head + Direction::Right.vector()));

        // The interval restarts from the accepted tick
        assert!(!s.frame(200.0));
        assert!(s.frame(280.0));
    }

    #[test]
    fn test_no_ticks_while_paused_or_idle() {
        let mut s = session();
        // Idle: frames do nothing
        assert!(!s.frame(1000.0));

        s.start(0.0);
        s.handle_input(InputEvent::TogglePause, 10.0);
        let snake = s.state.snake.clone();
        assert!(!s.frame(500.0));
        assert_eq!(s.state.snake, snake);
    }

    #[test]
    fn test_direction_input_ignored_unless_running() {
        let mut s = session();
        s.handle_input(InputEvent::Direction(Direction::Up), 0.0);
        assert_eq!(s.state.pending_dir, Direction::Right);

        s.start(0.0);
        s.handle_input(InputEvent::Direction(Direction::Up), 1.0);
        assert_eq!(s.state.pending_dir, Direction::Up);
    }

    #[test]
    fn test_best_score_updates_on_game_over() {
        let mut s = session();
        s.start(0.0);
        s.state.score = 250;
        force_collision(&mut s.state);
        s.frame(200.0);

        assert_eq!(s.best_score(), 250);
        assert_eq!(s.store().load_best_score(), 250);

        // A worse run leaves the best untouched
        s.start(300.0);
        s.state.score = 100;
        force_collision(&mut s.state);
        s.frame(500.0);
        assert_eq!(s.best_score(), 250);
        assert_eq!(s.hud().best_score, 250);
    }

    #[test]
    fn test_save_score_only_when_over() {
        let mut s = session();
        s.start(0.0);
        s.state.score = 60;
        assert!(!s.save_score("ana"));
        assert!(s.leaderboard().is_empty());

        force_collision(&mut s.state);
        s.frame(200.0);
        assert!(s.save_score("ana"));
        assert_eq!(s.leaderboard().top_score(), Some(60));
        assert_eq!(s.store().load_leaderboard().top_score(), Some(60));
    }

    #[test]
    fn test_blank_name_defaults() {
        let mut s = session();
        s.start(0.0);
        force_collision(&mut s.state);
        s.frame(200.0);

        assert!(s.save_score("   "));
        assert_eq!(s.leaderboard().entries[0].name, DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_persisted_scores_survive_sessions() {
        let mut store = MemoryStore::new();
        store.save_best_score(500);
        let s = Session::new(1, Tuning::default(), store);
        assert_eq!(s.best_score(), 500);
        assert_eq!(s.hud().best_score, 500);
    }
}
