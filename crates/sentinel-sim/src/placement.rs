//! Fixed build locations and their occupancy.
//!
//! A slot only points at its defender; the ECS world owns the defender.

use glam::Vec2;
use hecs::Entity;

use sentinel_core::constants::PLATFORM_SIZE;
use sentinel_core::error::CommandError;
use sentinel_core::types::SlotId;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSlot {
    pub id: SlotId,
    pub position: Vec2,
    pub defender: Option<Entity>,
}

impl PlacementSlot {
    pub fn is_occupied(&self) -> bool {
        self.defender.is_some()
    }
}

/// All platforms of a level, indexed by [`SlotId`].
#[derive(Debug, Clone, Default)]
pub struct PlacementGrid {
    slots: Vec<PlacementSlot>,
}

impl PlacementGrid {
    pub fn new(positions: &[Vec2]) -> Self {
        let slots = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| PlacementSlot {
                id: SlotId(i as u32),
                position,
                defender: None,
            })
            .collect();
        Self { slots }
    }

    pub fn slot(&self, id: SlotId) -> Option<&PlacementSlot> {
        self.slots.get(id.index())
    }

    pub fn slots(&self) -> &[PlacementSlot] {
        &self.slots
    }

    /// Position of `id` if it exists and is free.
    pub fn available_position(&self, id: SlotId) -> Result<Vec2, CommandError> {
        match self.slot(id) {
            Some(slot) if !slot.is_occupied() => Ok(slot.position),
            _ => Err(CommandError::SlotUnavailable(id)),
        }
    }

    pub fn defender_at(&self, id: SlotId) -> Option<Entity> {
        self.slot(id).and_then(|slot| slot.defender)
    }

    /// Claim a free slot for `defender`.
    pub fn occupy(&mut self, id: SlotId, defender: Entity) -> Result<(), CommandError> {
        match self.slots.get_mut(id.index()) {
            Some(slot) if !slot.is_occupied() => {
                slot.defender = Some(defender);
                Ok(())
            }
            _ => Err(CommandError::SlotUnavailable(id)),
        }
    }

    /// Swap the defender on an occupied slot. Returns the previous occupant.
    pub fn replace(&mut self, id: SlotId, defender: Entity) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index())?;
        slot.defender.replace(defender)
    }

    /// Occupied slots in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotId, Entity)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.defender.map(|defender| (slot.id, defender)))
    }

    pub fn free_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots
            .iter()
            .filter(|slot| !slot.is_occupied())
            .map(|slot| slot.id)
    }

    /// The slot whose square platform contains `point`.
    pub fn slot_at(&self, point: Vec2) -> Option<SlotId> {
        let half = PLATFORM_SIZE * 0.5;
        self.slots
            .iter()
            .find(|slot| {
                let d = (point - slot.position).abs();
                d.x <= half && d.y <= half
            })
            .map(|slot| slot.id)
    }
}
