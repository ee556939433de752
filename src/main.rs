//! Snake Rush headless driver
//!
//! Runs a session against a synthetic clock with a simple random-turn
//! policy. Exercises the engine end to end without a renderer: pass a seed
//! as the first argument to replay a run.

#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;

#[cfg(not(target_arch = "wasm32"))]
use snake_rush::persistence::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
use snake_rush::sim::Direction;
#[cfg(not(target_arch = "wasm32"))]
use snake_rush::{GamePhase, InputEvent, Session, Tuning};

/// Synthetic display refresh interval (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after two simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_RUN_MS: f64 = 120_000.0;

/// The driver is native-only; the wasm build ships the library alone
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut session = Session::new(seed, Tuning::default(), MemoryStore::new());
    let mut policy = Pcg32::seed_from_u64(seed ^ 0x5EED);

    session.start(0.0);
    log::info!("demo run with seed {seed}");

    let mut now = 0.0;
    let mut ticks = 0u64;
    while session.phase() == GamePhase::Running && now < MAX_RUN_MS {
        now += FRAME_MS;

        // Turn at random every so often; illegal reversals are dropped by
        // the engine, so the policy can stay naive.
        if policy.random::<f32>() < 0.08 {
            let dir = match policy.random_range(0..4u8) {
                0 => Direction::Up,
                1 => Direction::Down,
                2 => Direction::Left,
                _ => Direction::Right,
            };
            session.handle_input(InputEvent::Direction(dir), now);
        }

        if session.frame(now) {
            ticks += 1;
        }
    }

    if session.phase() == GamePhase::Over {
        session.save_score("demo");
    }

    let hud = session.hud();
    println!(
        "run ended after {ticks} ticks ({:.1}s): score {} level {} combo x{} best {}",
        now / 1000.0,
        hud.score,
        hud.level,
        hud.combo,
        hud.best_score
    );
    for (i, entry) in session.leaderboard().entries.iter().enumerate() {
        println!("{:>2}. {} - {}", i + 1, entry.name, entry.score);
    }
}
