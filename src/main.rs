//! Maze Chase entry point
//!
//! The browser build is driven through `maze_chase::web`. Natively this runs
//! a headless round with an autopilot steering the player, which is handy for
//! watching pursuer behavior in the logs (`RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Maze Chase (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let settings = maze_chase::Settings::load();
    autopilot::run(seed, &settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is maze_chase::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;
    use maze_chase::Settings;
    use maze_chase::cell_center;
    use maze_chase::sim::{GameEvent, GameState, PursuitBrain, TickInput, tick};

    const SIM_DT: f32 = 1.0 / 60.0;
    /// Hard stop in case the round never resolves
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// Re-plan this often even when not blocked
    const REPLAN_TICKS: u64 = 20;

    pub fn run(seed: u64, settings: &Settings) {
        let mut state = GameState::new(seed, settings);
        let mut brain = PursuitBrain::new(seed ^ 0xA5A5);
        let mut collected = 0u32;
        let mut caught = 0u32;

        while !state.phase.is_terminal() && state.time_ticks < MAX_TICKS {
            let input = TickInput {
                direction: steer(&state, &mut brain),
                pause: false,
            };
            for event in tick(&mut state, &input, SIM_DT) {
                match event {
                    GameEvent::Collected { .. } => collected += 1,
                    GameEvent::Caught { .. } => caught += 1,
                    GameEvent::CountdownTick { remaining } if remaining % 10 == 0 => {
                        log::info!("{}s left, score {}", remaining, state.score);
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Finished as {:?} after {} ticks: score {}, {} pellets, caught {} times",
            state.phase,
            state.time_ticks,
            state.score,
            collected,
            caught
        );
    }

    /// Head for the goal marker if there is one, else the nearest pellet
    fn steer(state: &GameState, brain: &mut PursuitBrain) -> Option<maze_chase::sim::Direction> {
        let body = &state.player.body;
        let distance = body.speed * SIM_DT;
        let blocked = !body.can_move(&state.grid, &state.model, body.facing, distance);
        if !blocked && state.time_ticks % REPLAN_TICKS != 0 {
            return None;
        }

        let target = state.goal.map(|g| g.pos).or_else(|| nearest_pellet(state))?;
        brain.choose_toward(body, &state.grid, &state.model, target, distance)
    }

    fn nearest_pellet(state: &GameState) -> Option<Vec2> {
        let pos = state.player.pos();
        state
            .grid
            .iter_cells()
            .filter(|(_, _, cell)| cell.is_collectible())
            .map(|(row, col, _)| cell_center(col, row))
            .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)))
    }
}
