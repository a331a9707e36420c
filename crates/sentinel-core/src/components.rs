//! ECS components for defender entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the simulation systems, not here. The
//! [`Behavior`](crate::defs::Behavior) enum from the definitions is attached
//! directly as a component as well.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{SlotId, UnitRef};

/// Where a defender stands. Fixed for the defender's whole life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emplacement {
    pub slot: SlotId,
    pub position: Vec2,
}

/// Type-derived stats copied onto a defender when it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderStats {
    pub defender_type: String,
    pub name: String,
    pub range: f32,
    pub cost: u32,
    pub upgrade: Option<UpgradePath>,
}

/// The type a defender can become, and what that costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePath {
    pub to: String,
    pub cost: u32,
}

/// Firing cadence and current target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireControl {
    /// Seconds between shots or pulses.
    pub cooldown: f32,
    /// Seconds since the last shot or pulse (or since placement).
    pub timer: f32,
    /// Weak reference to the tracked unit. Re-validated every tick.
    pub target: Option<UnitRef>,
}
