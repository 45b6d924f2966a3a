//! Adversary entities and their pursuit logic
//!
//! A pursuer is always MOVING in some direction. It re-decides that direction
//! on a jittered interval instead of every tick, which gives visibly discrete
//! "decisions" rather than perfect tracking. When its committed direction is
//! blocked between decisions it scrambles to any open direction at once and
//! asks for an early re-decision.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::CollisionModel;
use super::direction::Direction;
use super::entity::Body;
use super::grid::Grid;
use crate::consts::{CELL_SIZE, PURSUER_RADIUS, PURSUER_SPEED};

/// Within this distance of the target, decisions come faster
const CLOSE_RANGE: f32 = CELL_SIZE * 10.0;

/// Classic colors: red, orange, pink, cyan
pub const PURSUER_COLORS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.5, 0.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
];

/// Decision strategy for a pursuer: when to re-decide and which way to turn.
/// Owns its own seeded RNG so runs replay exactly.
#[derive(Debug, Clone)]
pub struct PursuitBrain {
    /// Sim time (ms) of the last decision; `None` forces one on the next update
    last_decision_ms: Option<f64>,
    /// Current decision interval (ms)
    interval_ms: f64,
    rng: Pcg32,
}

impl PursuitBrain {
    pub fn new(seed: u64) -> Self {
        Self {
            last_decision_ms: None,
            interval_ms: 100.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn decision_due(&self, now_ms: f64) -> bool {
        match self.last_decision_ms {
            None => true,
            Some(last) => now_ms - last > self.interval_ms,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Directions ordered by how much they close the gap to the target.
    ///
    /// A direction that reduces the distance along its axis scores the
    /// absolute delta on that axis; one that does not scores -1. Sorting
    /// descending puts the dominant axis first.
    pub fn rank(delta: Vec2) -> [(Direction, f32); 4] {
        let mut ranked = Direction::ALL.map(|dir| {
            let along = dir.unit().dot(delta);
            (dir, if along > 0.0 { along } else { -1.0 })
        });
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Pick the best open direction toward `target`, falling back to a
    /// shuffled scan of all four.
    pub fn choose_toward(
        &mut self,
        body: &Body,
        grid: &Grid,
        model: &CollisionModel,
        target: Vec2,
        distance: f32,
    ) -> Option<Direction> {
        Self::rank(target - body.pos)
            .into_iter()
            .find(|&(dir, priority)| priority > 0.0 && body.can_move(grid, model, dir, distance))
            .map(|(dir, _)| dir)
            .or_else(|| self.scan(body, grid, model, distance))
    }

    /// First open direction from a uniformly shuffled order
    pub fn scan(&mut self, body: &Body, grid: &Grid, model: &CollisionModel, distance: f32) -> Option<Direction> {
        let mut order = Direction::ALL;
        order.shuffle(&mut self.rng);
        order
            .into_iter()
            .find(|&dir| body.can_move(grid, model, dir, distance))
    }

    /// Record a chase decision and jitter the next interval
    fn schedule(&mut self, now_ms: f64, close: bool) {
        self.last_decision_ms = Some(now_ms);
        self.interval_ms = if close {
            50.0 + self.rng.random::<f64>() * 100.0
        } else {
            100.0 + self.rng.random::<f64>() * 200.0
        };
    }

    /// Record a wander decision (nothing to chase)
    fn schedule_wander(&mut self, now_ms: f64) {
        self.last_decision_ms = Some(now_ms);
        self.interval_ms = 200.0 + self.rng.random::<f64>() * 300.0;
    }

    fn force_reevaluate(&mut self) {
        self.last_decision_ms = None;
    }
}

/// An adversary
#[derive(Debug, Clone)]
pub struct Pursuer {
    pub id: u32,
    pub body: Body,
    pub color: [f32; 4],
    pub brain: PursuitBrain,
}

impl Pursuer {
    pub fn new(id: u32, spawn: Vec2, seed: u64) -> Self {
        Self {
            id,
            body: Body::new(spawn, PURSUER_SPEED, PURSUER_RADIUS),
            color: PURSUER_COLORS[id as usize % PURSUER_COLORS.len()],
            brain: PursuitBrain::new(seed),
        }
    }

    /// Re-decide if due, then move. `target` is the player's position, read
    /// but not owned. Returns whether the pursuer moved.
    pub fn update(
        &mut self,
        grid: &Grid,
        model: &CollisionModel,
        now_ms: f64,
        dt: f32,
        target: Option<Vec2>,
    ) -> bool {
        let distance = self.body.speed * dt;

        if self.brain.decision_due(now_ms) {
            match target {
                Some(target) => {
                    if let Some(dir) = self.brain.choose_toward(&self.body, grid, model, target, distance) {
                        self.body.facing = dir;
                    }
                    let close = self.body.pos.distance(target) < CLOSE_RANGE;
                    self.brain.schedule(now_ms, close);
                }
                None => {
                    if let Some(dir) = self.brain.scan(&self.body, grid, model, distance) {
                        self.body.facing = dir;
                    }
                    self.brain.schedule_wander(now_ms);
                }
            }
            log::debug!(
                "Pursuer {} heading {:?}, next decision in {:.0}ms",
                self.id,
                self.body.facing,
                self.brain.interval_ms()
            );
        }

        if self.body.try_step(grid, model, self.body.facing, distance) {
            return true;
        }

        // Blocked between decisions: take any open direction now
        match self.brain.scan(&self.body, grid, model, distance) {
            Some(dir) => {
                self.body.facing = dir;
                self.brain.force_reevaluate();
                self.body.try_step(grid, model, dir, distance)
            }
            None => false,
        }
    }

    /// Centers closer than the sum of both radii
    pub fn catches(&self, player: &Body) -> bool {
        self.body.touches(player.pos, player.collision_radius())
    }
}
