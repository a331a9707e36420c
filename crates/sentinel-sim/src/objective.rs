//! The defended objective.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Finite-health target at the end of the path. Health only ever goes down
/// and stops at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    position: Vec2,
    max_health: f32,
    health: f32,
}

impl Objective {
    pub fn new(position: Vec2, max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            position,
            max_health,
            health: max_health,
        }
    }

    /// Apply damage, clamping at zero. Returns the health actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.health <= 0.0 || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        before - self.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}
