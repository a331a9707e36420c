//! Fundamental simulation types: time, identities and arena geometry.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH};

/// Simulation time tracking. Advances only while the session is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active ticks integrated so far.
    pub tick: u64,
    /// Active seconds integrated so far.
    pub elapsed_secs: f64,
}

impl SimTime {
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}

/// Spawn-sequence identity of a unit, unique and increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u64);

/// Weak reference to a pooled unit.
///
/// Holds the pool slot together with the identity that occupied it when the
/// reference was taken. A reference whose slot has since been recycled for a
/// different unit no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    pub slot: usize,
    pub id: UnitId,
}

/// Index of a placement slot within a level's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned arena rectangle anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Bounds {
    /// Whether a circle of `radius` at `center` overlaps the arena at all.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius >= 0.0
            && center.y + radius >= 0.0
            && center.x - radius <= self.width
            && center.y - radius <= self.height
    }
}
