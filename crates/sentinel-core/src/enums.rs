//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::SlotId;

/// Top-level session state. Only `Active` advances the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Active,
    /// Paused by the player; resumes only through an explicit toggle.
    Suspended,
    /// The objective was destroyed.
    Defeated,
    /// Every scheduled unit was spawned and eliminated.
    Victorious,
}

impl SessionState {
    /// Terminal states are left only by rebuilding the session.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Defeated | Self::Victorious)
    }
}

/// Wave scheduler phase as exposed to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerPhase {
    /// Waiting for the next wave to begin.
    #[default]
    Idle,
    /// A wave is dispatching spawn events.
    Spawning,
    /// The last wave has been fully dispatched.
    Exhausted,
}

/// Which behavior a defender carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorKind {
    #[default]
    Projectile,
    SlowPulse,
}

/// How a projectile stopped existing without hitting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileExpiry {
    Timeout,
    OutOfBounds,
}

/// Result of applying damage to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The unit was not alive; nothing changed.
    Ignored,
    /// Health dropped but stayed above zero.
    Damaged,
    /// Health reached zero on this hit.
    Killed,
}

/// Current player selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selection {
    #[default]
    None,
    /// A defender type chosen for placement.
    BuildType { defender_type: String },
    /// A placed defender chosen for upgrade.
    Placed { slot: SlotId },
}
