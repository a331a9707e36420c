//! Discrete events emitted by the simulation for the presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::commands::PlayerCommand;
use crate::enums::SessionState;
use crate::types::{SlotId, UnitId};

/// Something observable happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A level was (re)built.
    LevelLoaded { level_id: String },
    /// A wave began dispatching. `index` is zero-based.
    WaveStarted { index: usize, wave_id: String },
    /// Every spawn event of a wave has been dispatched.
    WaveDispatched { index: usize },
    UnitSpawned {
        unit: UnitId,
        unit_type: String,
        position: Vec2,
    },
    /// A unit's health reached zero. `reward` has been credited.
    UnitDied { unit: UnitId, reward: u32 },
    UnitReachedObjective { unit: UnitId },
    DefenderPlaced {
        slot: SlotId,
        defender_type: String,
        cost: u32,
    },
    DefenderFired { slot: SlotId, target: UnitId },
    /// An area defender pulsed. `affected` counts units whose slow was (re)applied.
    DefenderPulsed { slot: SlotId, affected: u32 },
    DefenderUpgraded {
        slot: SlotId,
        from: String,
        to: String,
        cost: u32,
    },
    ObjectiveDamaged { amount: f32, remaining: f32 },
    SessionStateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// A queued command was refused. Nothing was mutated.
    CommandRejected {
        command: PlayerCommand,
        reason: String,
    },
    /// Non-fatal data problem that was skipped.
    Diagnostic(Diagnostic),
}

/// Non-fatal problems with definitions encountered at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// A spawn event named a unit type with no definition; the event was skipped.
    UnknownUnitType { wave_id: String, unit_type: String },
    /// A build request named a defender type with no definition.
    UnknownDefenderType { defender_type: String },
}
