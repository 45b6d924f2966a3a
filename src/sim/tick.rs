//! One frame of simulation

use super::direction::Direction;
use super::grid::CellType;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested heading (arrow key), applied as-is
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame of `dt` seconds.
///
/// Motion uses `dt` clamped to `MAX_FRAME_DT`; the countdown uses the raw
/// value so wall-clock seconds keep counting across frame hitches.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase.is_terminal() {
        return events;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.countdown.stop();
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
                return events;
            }
            GamePhase::Paused => {
                state.countdown.start();
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return events;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let motion_dt = dt.min(MAX_FRAME_DT);
    state.time_ticks += 1;

    if let Some(dir) = input.direction {
        state.player.set_direction(dir);
    }

    if state.phase == GamePhase::Ready {
        state.ready_timer -= motion_dt;
        if state.ready_timer <= 0.0 {
            state.ready_timer = 0.0;
            state.phase = GamePhase::Playing;
            state.countdown.start();
            events.push(GameEvent::RoundStarted);
            log::info!("Round started");
        }
        return events;
    }

    state.sim_time_ms += f64::from(motion_dt) * 1000.0;

    if !update_player(state, motion_dt, &mut events) {
        return events;
    }
    if !update_pursuers(state, motion_dt, &mut events) {
        return events;
    }
    if !check_goal(state, &mut events) {
        return events;
    }
    update_countdown(state, dt, &mut events);

    events
}

/// Animate, move and collect. Returns false if the round ended.
fn update_player(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) -> bool {
    state.player.animate();
    let assist = state.settings.motion_assist;
    let outcome = state.player.step(&mut state.grid, &state.model, dt, assist);
    if outcome.points == 0 {
        return true;
    }

    state.score += u64::from(outcome.points);
    events.push(GameEvent::Collected {
        points: outcome.points,
        power: outcome.points == CellType::PowerPellet.points(),
    });

    if state.grid.pellets_remaining() == 0 {
        events.push(GameEvent::MazeCleared);
        state.finish(GamePhase::Won);
        return false;
    }
    true
}

/// Move every pursuer toward the player, then test for a catch
fn update_pursuers(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) -> bool {
    let target = Some(state.player.pos());
    for pursuer in &mut state.pursuers {
        pursuer.update(&state.grid, &state.model, state.sim_time_ms, dt, target);
    }

    let Some(catcher) = state
        .pursuers
        .iter()
        .find(|p| p.catches(&state.player.body))
        .map(|p| p.id)
    else {
        return true;
    };

    let lives_left = state.lose_life();
    events.push(GameEvent::Caught {
        pursuer: catcher,
        lives_left,
    });
    if lives_left == 0 {
        events.push(GameEvent::GameOver);
    }
    false
}

fn check_goal(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let reached = state
        .goal
        .is_some_and(|goal| goal.reached(state.player.pos(), state.player.body.collision_radius()));
    if reached {
        events.push(GameEvent::GoalReached);
        state.finish(GamePhase::Won);
    }
    !reached
}

fn update_countdown(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let step = state.countdown.advance(dt);
    if step.ticks > 0 {
        events.push(GameEvent::CountdownTick {
            remaining: state.countdown.remaining(),
        });
    }
    if step.expired {
        events.push(GameEvent::TimeUp);
        state.finish(GamePhase::TimeUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::cell_center;
    use crate::sim::goal::GoalMarker;
    use crate::sim::state::Difficulty;
    use glam::Vec2;

    const SIM_DT: f32 = 1.0 / 60.0;

    fn quiet_settings() -> Settings {
        Settings {
            goal_marker: false,
            ..Settings::default()
        }
    }

    /// Run through the lead-in
    fn start_round(state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(tick(state, &TickInput::default(), 0.1));
            if state.phase != GamePhase::Ready {
                break;
            }
        }
        events
    }

    #[test]
    fn test_ready_lead_in() {
        let mut state = GameState::new(1, &quiet_settings());
        let start = state.player.pos();
        tick(&mut state, &TickInput { direction: Some(Direction::Left), pause: false }, 1.0);
        // No motion during the lead-in, but the heading is remembered
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.pos(), start);
        assert_eq!(state.player.facing(), Direction::Left);

        let events = start_round(&mut state);
        assert!(events.contains(&GameEvent::RoundStarted));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.countdown.is_running());
    }

    #[test]
    fn test_collecting_scores() {
        let mut state = GameState::new(1, &quiet_settings());
        start_round(&mut state);
        let left = TickInput { direction: Some(Direction::Left), pause: false };

        let mut events = Vec::new();
        for _ in 0..30 {
            events.extend(tick(&mut state, &left, SIM_DT));
        }
        assert!(state.score >= 10);
        assert!(events.contains(&GameEvent::Collected { points: 10, power: false }));
        assert_eq!(state.grid.cell_at(29, 13), CellType::Empty);
    }

    #[test]
    fn test_motion_clamped_countdown_raw() {
        let mut state = GameState::new(1, &quiet_settings());
        start_round(&mut state);
        let start = state.player.pos();
        let left = TickInput { direction: Some(Direction::Left), pause: false };

        let events = tick(&mut state, &left, 5.0);
        let moved = start.x - state.player.pos().x;
        assert!((moved - state.player.body.speed * MAX_FRAME_DT).abs() < 1e-3);
        assert_eq!(state.countdown.remaining(), 55);
        assert!(events.contains(&GameEvent::CountdownTick { remaining: 55 }));
    }

    #[test]
    fn test_pause_freezes_round() {
        let mut state = GameState::new(1, &quiet_settings());
        start_round(&mut state);

        let events = tick(&mut state, &TickInput { direction: None, pause: true }, SIM_DT);
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(state.phase, GamePhase::Paused);

        let pos = state.player.pos();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert_eq!(state.player.pos(), pos);
        assert_eq!(state.countdown.remaining(), 60);

        let events = tick(&mut state, &TickInput { direction: None, pause: true }, SIM_DT);
        assert!(events.contains(&GameEvent::Resumed));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.countdown.is_running());
    }

    #[test]
    fn test_time_up_ends_round() {
        let mut state = GameState::new(1, &Settings {
            round_secs: 2,
            ..quiet_settings()
        });
        start_round(&mut state);

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(tick(&mut state, &TickInput::default(), SIM_DT));
        }
        assert_eq!(state.phase, GamePhase::TimeUp);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::TimeUp).count(), 1);
        assert_eq!(state.countdown.remaining(), 0);

        // Terminal phases ignore further frames
        let ticks = state.time_ticks;
        assert!(tick(&mut state, &TickInput::default(), SIM_DT).is_empty());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_caught_costs_a_life() {
        let mut state = GameState::new(4, &Settings {
            difficulty: Difficulty::Medium,
            ..quiet_settings()
        });
        start_round(&mut state);
        state.pursuers[0].body.pos = state.player.pos();

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::Caught { pursuer: 0, lives_left: 2 }));
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.pos(), cell_center(14, 29));
        assert_eq!(state.pursuers[0].body.pos, cell_center(6, 14));
        assert!(!state.countdown.is_running());
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut state = GameState::new(4, &Settings {
            difficulty: Difficulty::Medium,
            lives: 1,
            ..quiet_settings()
        });
        start_round(&mut state);
        state.pursuers[1].body.pos = state.player.pos() + Vec2::new(1.0, 0.0);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_goal_reached_wins() {
        let mut state = GameState::new(4, &quiet_settings());
        start_round(&mut state);
        state.goal = Some(GoalMarker {
            pos: state.player.pos() + Vec2::new(1.0, 0.0),
        });

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::GoalReached));
        assert_eq!(state.phase, GamePhase::Won);
        assert!(!state.countdown.is_running());
    }

    #[test]
    fn test_last_pellet_clears_maze() {
        let mut state = GameState::new(4, &quiet_settings());
        let cells: Vec<(usize, usize)> = state
            .grid
            .iter_cells()
            .filter(|&(row, col, cell)| cell.is_collectible() && (row, col) != (29, 13))
            .map(|(row, col, _)| (row, col))
            .collect();
        for (row, col) in cells {
            state.grid.collect(row as i32, col as i32);
        }
        assert_eq!(state.grid.pellets_remaining(), 1);
        start_round(&mut state);

        let left = TickInput { direction: Some(Direction::Left), pause: false };
        let mut events = Vec::new();
        for _ in 0..30 {
            events.extend(tick(&mut state, &left, SIM_DT));
        }
        assert!(events.contains(&GameEvent::MazeCleared));
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let settings = Settings {
            difficulty: Difficulty::Hard,
            ..Settings::default()
        };
        let mut state1 = GameState::new(99999, &settings);
        let mut state2 = GameState::new(99999, &settings);

        let inputs = [
            TickInput { direction: Some(Direction::Left), pause: false },
            TickInput::default(),
            TickInput { direction: Some(Direction::Up), pause: false },
            TickInput { direction: Some(Direction::Right), pause: false },
        ];

        for i in 0..2000 {
            let input = &inputs[(i / 60) % inputs.len()];
            let e1 = tick(&mut state1, input, SIM_DT);
            let e2 = tick(&mut state2, input, SIM_DT);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.player.pos(), state2.player.pos());
        for (a, b) in state1.pursuers.iter().zip(&state2.pursuers) {
            assert_eq!(a.body.pos, b.body.pos);
        }
    }

    #[test]
    fn test_stopped_round_ignores_frames() {
        let mut state = GameState::new(1, &quiet_settings());
        start_round(&mut state);
        state.stop();
        let pos = state.player.pos();
        assert!(tick(&mut state, &TickInput { direction: Some(Direction::Left), pause: true }, SIM_DT).is_empty());
        assert_eq!(state.player.pos(), pos);
        assert_eq!(state.phase, GamePhase::Stopped);
    }
}
