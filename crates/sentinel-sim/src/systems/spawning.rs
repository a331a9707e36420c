//! Turns scheduled unit types into pooled units at the head of the path.

use std::collections::BTreeMap;

use tracing::debug;

use sentinel_core::defs::UnitTypeDef;
use sentinel_core::events::GameEvent;
use sentinel_core::types::UnitId;

use crate::path::Path;
use crate::pool::Pool;
use crate::unit::{Unit, UnitInit};

/// Spawn one unit per entry of `requests`, draining it. Returns how many
/// units entered the field.
pub fn run(
    requests: &mut Vec<String>,
    unit_types: &BTreeMap<String, UnitTypeDef>,
    units: &mut Pool<Unit>,
    path: &Path,
    next_unit_id: &mut u64,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut spawned = 0;
    for unit_type in requests.drain(..) {
        // The scheduler has already filtered unknown types.
        let Some(def) = unit_types.get(&unit_type) else {
            continue;
        };
        let id = UnitId(*next_unit_id);
        *next_unit_id += 1;

        let start = path.start();
        let (slot, _) = units.acquire(
            &unit_type,
            UnitInit {
                id,
                unit_type: unit_type.clone(),
                def: def.clone(),
                start,
            },
        );
        debug!(unit = id.0, slot, %unit_type, "unit spawned");
        events.push(GameEvent::UnitSpawned {
            unit: id,
            unit_type,
            position: start,
        });
        spawned += 1;
    }
    spawned
}
