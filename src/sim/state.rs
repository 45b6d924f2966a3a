//! Game state and round orchestration
//!
//! Owns everything a round needs: the grid, the player, the pursuers, the
//! goal marker, score, lives and the countdown. Entities never reference each
//! other; the pursuers read the player's position through `tick`.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionModel;
use super::countdown::Countdown;
use super::direction::Direction;
use super::goal::GoalMarker;
use super::grid::Grid;
use super::player::Player;
use super::pursuer::Pursuer;
use crate::Settings;
use crate::cell_center;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Lead-in before motion; the countdown is not running yet
    Ready,
    Playing,
    Paused,
    /// Countdown reached zero
    TimeUp,
    /// Out of lives
    GameOver,
    /// Goal reached or maze cleared
    Won,
    /// Torn down by the host
    Stopped,
}

impl GamePhase {
    /// Phases in which `tick` does nothing
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GamePhase::TimeUp | GamePhase::GameOver | GamePhase::Won | GamePhase::Stopped
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn pursuer_count(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 2,
            Difficulty::Hard => 4,
        }
    }
}

/// Something the host should react to (sound, HUD, end screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Lead-in finished, motion and countdown begin
    RoundStarted,
    Collected { points: u32, power: bool },
    /// Countdown decremented to `remaining`
    CountdownTick { remaining: u32 },
    Caught { pursuer: u32, lives_left: u8 },
    GoalReached,
    MazeCleared,
    TimeUp,
    GameOver,
    Paused,
    Resumed,
}

/// Identifies the session a frame callback belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameToken {
    pub generation: u64,
}

/// RNG state wrapper: every consumer gets its own stream of the run seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Hand out the current stream and move to the next one
    pub fn fork(&mut self) -> Pcg32 {
        let rng = self.to_rng();
        self.stream += 1;
        rng
    }

    /// Seed for a component that owns its own RNG
    pub fn next_seed(&mut self) -> u64 {
        self.fork().random()
    }
}

/// Render view of one entity
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    pub facing: Direction,
    /// Effective (x, y) radii
    pub radius: Vec2,
    pub color: [f32; 4],
}

/// Read-only view of a round for renderers and HUDs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub remaining_secs: u32,
    pub pellets_remaining: usize,
    pub player: EntityView,
    pub mouth_angle: f32,
    pub pursuers: Vec<EntityView>,
    pub goal: Option<Vec2>,
}

/// Complete round state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub grid: Grid,
    pub model: CollisionModel,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub pursuers: Vec<Pursuer>,
    pub goal: Option<GoalMarker>,
    pub countdown: Countdown,
    /// Lead-in seconds left while in `Ready`
    pub ready_timer: f32,
    /// Simulated milliseconds spent in `Playing`
    pub sim_time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    generation: u64,
}

impl GameState {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let settings = settings.clone().sanitized();
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Ready,
            score: 0,
            lives: settings.lives,
            grid: Grid::classic(),
            model: CollisionModel::new(settings.collision),
            player: Player::new(player_spawn(), &settings.player_look()),
            pursuers: Vec::new(),
            goal: None,
            countdown: Countdown::new(settings.round_secs),
            ready_timer: READY_SECS,
            sim_time_ms: 0.0,
            time_ticks: 0,
            generation: 0,
            settings,
        };
        state.spawn_entities();
        state.place_goal();
        log::info!(
            "New round: seed {}, {:?}, {} pursuers",
            seed,
            state.settings.difficulty,
            state.pursuers.len()
        );
        state
    }

    /// Put the player and every pursuer back on their spawn cells
    pub fn spawn_entities(&mut self) {
        self.player = Player::new(player_spawn(), &self.settings.player_look());
        let count = self.settings.difficulty.pursuer_count();
        self.pursuers = PURSUER_SPAWNS
            .iter()
            .take(count)
            .enumerate()
            .map(|(id, &(col, row))| Pursuer::new(id as u32, cell_center(col, row), self.rng_state.next_seed()))
            .collect();
    }

    fn place_goal(&mut self) {
        self.goal = if self.settings.goal_marker {
            let mut rng = self.rng_state.fork();
            Some(GoalMarker::place(&self.grid, &mut rng))
        } else {
            None
        };
    }

    /// Lose a life. Returns the lives left; with any left the round goes
    /// back to the lead-in with entities on their spawns.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.countdown.stop();
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over, score {}", self.score);
        } else {
            self.spawn_entities();
            self.ready_timer = READY_SECS;
            self.phase = GamePhase::Ready;
            log::info!("Caught, {} lives left", self.lives);
        }
        self.lives
    }

    /// End the round in `phase` and disarm the countdown
    pub fn finish(&mut self, phase: GamePhase) {
        self.countdown.stop();
        self.phase = phase;
        log::info!("Round finished: {:?}, score {}", phase, self.score);
    }

    /// Fresh round with the same settings. Outstanding frame tokens go stale.
    pub fn restart(&mut self) {
        self.grid.reset();
        self.score = 0;
        self.lives = self.settings.lives;
        self.countdown.reset(self.settings.round_secs);
        self.ready_timer = READY_SECS;
        self.sim_time_ms = 0.0;
        self.time_ticks = 0;
        self.spawn_entities();
        self.place_goal();
        self.phase = GamePhase::Ready;
        self.generation += 1;
        log::info!("Round restarted (session {})", self.generation);
    }

    /// Swap in new settings and restart with them
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone().sanitized();
        self.model = CollisionModel::new(self.settings.collision);
        self.restart();
    }

    /// Tear down. Outstanding frame tokens go stale.
    pub fn stop(&mut self) {
        self.countdown.stop();
        self.phase = GamePhase::Stopped;
        self.generation += 1;
        log::info!("Round stopped");
    }

    pub fn frame_token(&self) -> FrameToken {
        FrameToken {
            generation: self.generation,
        }
    }

    /// Whether a callback scheduled with `token` still belongs to this session
    pub fn is_current(&self, token: FrameToken) -> bool {
        token.generation == self.generation && self.phase != GamePhase::Stopped
    }

    pub fn snapshot(&self) -> Snapshot {
        let body = &self.player.body;
        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            remaining_secs: self.countdown.remaining(),
            pellets_remaining: self.grid.pellets_remaining(),
            player: EntityView {
                id: 0,
                pos: body.pos,
                facing: body.facing,
                radius: body.effective_radius(),
                color: self.player.color,
            },
            mouth_angle: self.player.mouth_angle,
            pursuers: self
                .pursuers
                .iter()
                .map(|p| EntityView {
                    id: p.id,
                    pos: p.body.pos,
                    facing: p.body.facing,
                    radius: p.body.effective_radius(),
                    color: p.color,
                })
                .collect(),
            goal: self.goal.map(|g| g.pos),
        }
    }
}

fn player_spawn() -> Vec2 {
    cell_center(PLAYER_SPAWN.0, PLAYER_SPAWN.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::CellType;

    fn settings(difficulty: Difficulty) -> Settings {
        Settings {
            difficulty,
            ..Settings::default()
        }
    }

    #[test]
    fn test_new_round_layout() {
        let state = GameState::new(1, &settings(Difficulty::Hard));
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.lives, 3);
        assert_eq!(state.pursuers.len(), 4);
        assert_eq!(state.player.pos(), cell_center(14, 29));
        assert_eq!(state.pursuers[1].body.pos, cell_center(21, 14));
        assert!(!state.countdown.is_running());
        assert_eq!(state.countdown.remaining(), 60);
    }

    #[test]
    fn test_difficulty_pursuer_counts() {
        for (difficulty, count) in [(Difficulty::Easy, 0), (Difficulty::Medium, 2), (Difficulty::Hard, 4)] {
            assert_eq!(GameState::new(3, &settings(difficulty)).pursuers.len(), count);
        }
    }

    #[test]
    fn test_goal_placement_follows_settings() {
        let with_goal = GameState::new(8, &Settings::default());
        let goal = with_goal.goal.unwrap();
        let (row, col) = crate::pixel_to_grid(goal.pos);
        assert!(matches!(with_goal.grid.cell_at(row, col), CellType::Empty | CellType::Pellet));

        let no_goal = GameState::new(8, &Settings {
            goal_marker: false,
            ..Settings::default()
        });
        assert!(no_goal.goal.is_none());
    }

    #[test]
    fn test_same_seed_same_round() {
        let a = GameState::new(77, &settings(Difficulty::Hard));
        let b = GameState::new(77, &settings(Difficulty::Hard));
        assert_eq!(a.goal, b.goal);
        let ja = serde_json::to_string(&a.snapshot()).unwrap();
        let jb = serde_json::to_string(&b.snapshot()).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn test_restart_restores_round_and_invalidates_token() {
        let mut state = GameState::new(5, &settings(Difficulty::Medium));
        let token = state.frame_token();
        state.score = 120;
        state.lives = 1;
        state.grid.collect(1, 1);
        state.phase = GamePhase::GameOver;

        state.restart();
        assert!(!state.is_current(token));
        assert!(state.is_current(state.frame_token()));
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.grid.cell_at(1, 1), CellType::Pellet);
        assert_eq!(state.countdown.remaining(), 60);
    }

    #[test]
    fn test_apply_settings_restarts_with_new_rules() {
        let mut state = GameState::new(5, &Settings::default());
        let token = state.frame_token();
        state.apply_settings(&Settings {
            difficulty: Difficulty::Hard,
            round_secs: 30,
            collision: crate::sim::SamplePattern::Full9,
            ..Settings::default()
        });
        assert!(!state.is_current(token));
        assert_eq!(state.pursuers.len(), 4);
        assert_eq!(state.countdown.remaining(), 30);
        assert_eq!(state.model.pattern, crate::sim::SamplePattern::Full9);
    }

    #[test]
    fn test_stop_invalidates_token() {
        let mut state = GameState::new(5, &Settings::default());
        let token = state.frame_token();
        assert!(state.is_current(token));
        state.stop();
        assert_eq!(state.phase, GamePhase::Stopped);
        assert!(!state.is_current(token));
        assert!(!state.is_current(state.frame_token()));
    }

    #[test]
    fn test_lose_life_respawns_then_ends() {
        let mut state = GameState::new(9, &Settings {
            lives: 2,
            ..settings(Difficulty::Medium)
        });
        state.phase = GamePhase::Playing;
        state.player.body.pos = cell_center(1, 1);

        assert_eq!(state.lose_life(), 1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.pos(), cell_center(14, 29));

        state.phase = GamePhase::Playing;
        assert_eq!(state.lose_life(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(2, &settings(Difficulty::Medium));
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["phase"], "ready");
        assert_eq!(json["lives"], 3);
        assert_eq!(json["pursuers"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(GameEvent::Caught { pursuer: 1, lives_left: 2 }).unwrap();
        assert_eq!(json["type"], "caught");
        assert_eq!(json["lives_left"], 2);
    }
}
