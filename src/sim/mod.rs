//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod countdown;
pub mod direction;
pub mod entity;
pub mod goal;
pub mod grid;
pub mod player;
pub mod pursuer;
pub mod state;
pub mod tick;

pub use collision::{CollisionModel, SamplePattern, apply_tunnel_wrap, collect_at};
pub use countdown::{Countdown, CountdownStep};
pub use direction::Direction;
pub use entity::{Body, BodyShape};
pub use goal::GoalMarker;
pub use grid::{CLASSIC_LAYOUT, CellType, Grid, GridError};
pub use player::{MotionAssist, Player, PlayerLook, StepOutcome};
pub use pursuer::{Pursuer, PursuitBrain};
pub use state::{
    Difficulty, EntityView, FrameToken, GameEvent, GamePhase, GameState, RngState, Snapshot,
};
pub use tick::{TickInput, tick};
