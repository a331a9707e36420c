//! Player commands sent from the presentation layer to the simulation.

use serde::{Deserialize, Serialize};

use crate::types::SlotId;

/// Commands the player can issue. Input-device translation happens upstream;
/// the simulation only ever sees these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Choose a defender type to build. Clears any placed-defender selection.
    SelectBuildType { defender_type: String },
    /// Build the selected defender type on a slot.
    PlaceDefender { slot: SlotId },
    /// Select the defender standing on a slot, e.g. to upgrade it.
    SelectPlacedDefender { slot: SlotId },
    /// Upgrade the selected placed defender.
    AttemptUpgrade,
    /// Clear the current selection.
    Deselect,
    /// Suspend an active session or resume a suspended one.
    TogglePause,
    /// Rebuild the current level from scratch.
    Restart,
    /// Load the next level after a victory.
    AdvanceLevel,
}
