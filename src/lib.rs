//! Snake Rush - a grid snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, spawning, effects, tick)
//! - `session`: Lifecycle state machine and tick gating
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: Best score / leaderboard storage abstraction
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::Leaderboard;
pub use session::{HudSnapshot, InputEvent, RenderSnapshot, Session};
pub use sim::{Direction, GamePhase, GameState};
pub use tuning::Tuning;

/// Route panics and `log` output to the browser console (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub fn init_wasm_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Structural game constants
pub mod consts {
    /// Grid width in cells
    pub const COLS: i32 = 20;
    /// Grid height in cells
    pub const ROWS: i32 = 20;
    /// Cell size in pixels (particle bursts live in pixel space)
    pub const CELL_PX: f32 = 28.0;

    /// Maximum concurrent power-ups on the board
    pub const MAX_POWERUPS: usize = 3;
    /// Maximum cosmetic particles
    pub const MAX_PARTICLES: usize = 256;

    /// Snake length at spawn
    pub const START_LENGTH: usize = 3;
}

/// Center of a grid cell in pixel space (for particle bursts)
#[inline]
pub fn cell_center_px(cell: glam::IVec2) -> glam::Vec2 {
    use consts::CELL_PX;
    glam::Vec2::new(
        cell.x as f32 * CELL_PX + CELL_PX / 2.0,
        cell.y as f32 * CELL_PX + CELL_PX / 2.0,
    )
}
