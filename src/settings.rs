//! Round configuration and player preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CELL_SIZE, PLAYER_RADIUS, ROUND_SECS, START_LIVES};
use crate::sim::collision::{CARDINAL_FRACTION, SamplePattern};
use crate::sim::entity::BodyShape;
use crate::sim::player::{MotionAssist, PlayerLook};
use crate::sim::state::Difficulty;

pub const MIN_PLAYER_SIZE: f32 = 0.5;
/// Largest size whose cardinal wall samples still fit inside a one-cell
/// corridor for every shape (with a 5% margin)
pub const MAX_PLAYER_SIZE: f32 =
    0.95 * (CELL_SIZE / 2.0) / (CARDINAL_FRACTION * PLAYER_RADIUS * BodyShape::MAX_MEAN_MULTIPLIER);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of pursuers
    pub difficulty: Difficulty,
    /// Round length in whole seconds
    pub round_secs: u32,
    pub lives: u8,

    // === Movement ===
    pub collision: SamplePattern,
    pub motion_assist: MotionAssist,

    /// Place a goal marker that wins the round when reached
    pub goal_marker: bool,

    // === Player look ===
    pub player_shape: BodyShape,
    /// Size multiplier (`MIN_PLAYER_SIZE` - `MAX_PLAYER_SIZE`)
    pub player_size: f32,
    /// RGBA
    pub player_color: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        let look = PlayerLook::default();
        Self {
            difficulty: Difficulty::Easy,
            round_secs: ROUND_SECS,
            lives: START_LIVES,

            collision: SamplePattern::Cross5,
            motion_assist: MotionAssist::None,

            goal_marker: true,

            player_shape: look.shape,
            player_size: look.size,
            player_color: look.color,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp values into playable ranges
    pub fn sanitized(mut self) -> Self {
        self.player_size = if self.player_size.is_finite() {
            self.player_size.clamp(MIN_PLAYER_SIZE, MAX_PLAYER_SIZE)
        } else {
            1.0
        };
        self.round_secs = self.round_secs.max(1);
        self.lives = self.lives.max(1);
        for channel in &mut self.player_color {
            *channel = if channel.is_finite() { channel.clamp(0.0, 1.0) } else { 1.0 };
        }
        self
    }

    pub fn player_look(&self) -> PlayerLook {
        PlayerLook {
            shape: self.player_shape,
            size: self.player_size,
            color: self.player_color,
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "maze_chase_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(json) = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage for key {}, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.round_secs, 60);
        assert_eq!(settings.lives, 3);
        assert_eq!(settings.collision, SamplePattern::Cross5);
        assert_eq!(settings.motion_assist, MotionAssist::None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"hard","round_secs":90}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.round_secs, 90);
        assert_eq!(settings.lives, 3);
        assert!(settings.goal_marker);
    }

    #[test]
    fn test_json_is_sanitized() {
        let settings =
            Settings::from_json(r#"{"player_size":9.0,"round_secs":0,"lives":0,"player_shape":"wide"}"#).unwrap();
        assert_eq!(settings.player_size, MAX_PLAYER_SIZE);
        assert_eq!(settings.round_secs, 1);
        assert_eq!(settings.lives, 1);
        assert_eq!(settings.player_shape, BodyShape::Wide);
    }

    #[test]
    fn test_largest_player_can_move_for_every_shape() {
        use crate::cell_center;
        use crate::sim::{CollisionModel, Direction, Grid, Player};

        let json = r#"{"player_size":100.0}"#;
        for shape in BodyShape::ALL {
            for pattern in [SamplePattern::Cross5, SamplePattern::Full9] {
                let mut settings = Settings::from_json(json).unwrap();
                settings.player_shape = shape;
                let model = CollisionModel::new(pattern);
                let mut grid = Grid::classic();
                let spawn = cell_center(14, 29);
                let mut player = Player::new(spawn, &settings.player_look());
                assert!(!model.is_wall_collision(&grid, spawn, player.body.collision_radius()));

                for dir in [Direction::Left, Direction::Right] {
                    player.body.pos = spawn;
                    player.set_direction(dir);
                    let outcome = player.step(&mut grid, &model, 1.0 / 60.0, MotionAssist::None);
                    assert!(outcome.moved, "{:?} {:?} {:?}", shape, pattern, dir);
                }
            }
        }
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(Settings::from_json("{not json"), Err(SettingsError::Json(_))));
        assert!(Settings::from_json(r#"{"difficulty":"impossible"}"#).is_err());
    }

    #[test]
    fn test_json_survives_save_format() {
        let mut settings = Settings::default();
        settings.collision = SamplePattern::Full9;
        settings.motion_assist = MotionAssist::GridSnap;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
