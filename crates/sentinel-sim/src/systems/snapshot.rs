//! Builds the per-tick [`SessionSnapshot`] for the presentation layer.

use sentinel_core::components::{DefenderStats, Emplacement, FireControl};
use sentinel_core::defs::Behavior;
use sentinel_core::events::GameEvent;
use sentinel_core::state::*;

use crate::session::Session;
use crate::systems::defenders::resolve_target;

/// Assemble a read-only snapshot. `events` are attached as-is.
pub fn build(session: &Session, events: Vec<GameEvent>) -> SessionSnapshot {
    let level = session.level();

    let units = session
        .units
        .iter_active()
        .filter(|(_, unit)| unit.is_alive())
        .map(|(_, unit)| UnitView {
            id: unit.id(),
            unit_type: unit.unit_type().to_string(),
            position: unit.position(),
            health: unit.health(),
            max_health: unit.max_health(),
            radius: unit.radius(),
            slowed: unit.slow().is_some(),
        })
        .collect();

    let mut defenders = Vec::new();
    for (slot, entity) in session.grid.occupied() {
        let Ok(mut query) = session
            .defenders
            .query_one::<(&Emplacement, &DefenderStats, &Behavior, &FireControl)>(entity)
        else {
            continue;
        };
        let Some((emplacement, stats, behavior, fire)) = query.get() else {
            continue;
        };
        defenders.push(DefenderView {
            slot,
            defender_type: stats.defender_type.clone(),
            name: stats.name.clone(),
            position: emplacement.position,
            range: stats.range,
            behavior: behavior.kind(),
            target: fire
                .target
                .filter(|target| resolve_target(&session.units, *target).is_some())
                .map(|target| target.id),
            upgrade_cost: stats.upgrade.as_ref().map(|upgrade| upgrade.cost),
        });
    }

    let projectiles = session
        .projectiles
        .iter_active()
        .map(|(_, projectile)| ProjectileView {
            position: projectile.position(),
            direction: projectile.direction(),
            radius: projectile.radius(),
        })
        .collect();

    let slots = session
        .grid
        .slots()
        .iter()
        .map(|slot| SlotView {
            id: slot.id,
            position: slot.position,
            occupied: slot.is_occupied(),
        })
        .collect();

    SessionSnapshot {
        time: session.time,
        state: session.state,
        level_id: level.id.clone(),
        level_name: level.def.name.clone(),
        balance: session.economy.balance(),
        objective: ObjectiveView {
            position: session.objective.position(),
            health: session.objective.health(),
            max_health: session.objective.max_health(),
        },
        wave: WaveView {
            current: session.spawner.wave_number(),
            total: session.spawner.total_waves(),
            phase: session.spawner.phase(),
            next_wave_in: session.spawner.time_until_next_wave(),
        },
        units,
        defenders,
        projectiles,
        slots,
        selection: session.selection.clone(),
        stats: session.stats,
        events,
    }
}
