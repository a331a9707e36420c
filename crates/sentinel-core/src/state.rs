//! Read-only snapshot of a session, produced once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{SimTime, SlotId, UnitId};

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub state: SessionState,
    pub level_id: String,
    pub level_name: String,
    pub balance: u32,
    pub objective: ObjectiveView,
    pub wave: WaveView,
    pub units: Vec<UnitView>,
    pub defenders: Vec<DefenderView>,
    pub projectiles: Vec<ProjectileView>,
    pub slots: Vec<SlotView>,
    pub selection: Selection,
    pub stats: SessionStats,
    /// Events raised since the previous snapshot, in emission order.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

/// Wave progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveView {
    /// One-based number of the wave most recently started; 0 before the first.
    pub current: usize,
    pub total: usize,
    pub phase: SpawnerPhase,
    /// Seconds until the next wave starts. Only present while idle between waves.
    pub next_wave_in: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub unit_type: String,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub radius: f32,
    pub slowed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderView {
    pub slot: SlotId,
    pub defender_type: String,
    pub name: String,
    pub position: Vec2,
    pub range: f32,
    pub behavior: BehaviorKind,
    pub target: Option<UnitId>,
    /// Upgrade price, if this defender has an upgrade.
    pub upgrade_cost: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub direction: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub id: SlotId,
    pub position: Vec2,
    pub occupied: bool,
}

/// Running totals for the current level attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub units_spawned: u32,
    pub units_killed: u32,
    pub units_leaked: u32,
    pub projectiles_fired: u32,
}
