//! Defender system: target acquisition, firing and slow pulses.
//!
//! Defenders update in placement-slot order. Projectile defenders retarget
//! every tick to the nearest live unit in range (ties go to the unit that
//! spawned first) and fire once their cooldown has elapsed. Pulse defenders
//! keep no target; each time the cooldown elapses they slow every live unit
//! in range, whether or not anything is there.

use glam::Vec2;
use hecs::{Entity, World};

use sentinel_core::components::{DefenderStats, Emplacement, FireControl, UpgradePath};
use sentinel_core::defs::{Behavior, DefenderTypeDef};
use sentinel_core::events::GameEvent;
use sentinel_core::types::{SlotId, UnitRef};

use crate::placement::PlacementGrid;
use crate::pool::Pool;
use crate::projectile::{Projectile, ProjectileInit};
use crate::unit::Unit;

/// Create a defender entity of `defender_type` standing on `slot`.
pub fn spawn(
    world: &mut World,
    slot: SlotId,
    position: Vec2,
    defender_type: &str,
    def: &DefenderTypeDef,
) -> Entity {
    let upgrade = def.upgrades_to.as_ref().map(|to| UpgradePath {
        to: to.clone(),
        cost: def.upgrade_cost,
    });
    world.spawn((
        Emplacement { slot, position },
        DefenderStats {
            defender_type: defender_type.to_string(),
            name: def.name.clone(),
            range: def.range,
            cost: def.cost,
            upgrade,
        },
        def.behavior,
        FireControl {
            cooldown: def.cooldown(),
            timer: 0.0,
            target: None,
        },
    ))
}

/// Nearest live unit within `range` of `origin`, by squared distance.
/// Equal distances resolve to the lowest unit id.
pub fn nearest_in_range(units: &Pool<Unit>, origin: Vec2, range: f32) -> Option<UnitRef> {
    let range_sq = range * range;
    let mut best: Option<(f32, UnitRef)> = None;
    for (slot, unit) in units.iter_active() {
        if !unit.is_alive() {
            continue;
        }
        let distance_sq = origin.distance_squared(unit.position());
        if distance_sq > range_sq {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_sq, best_ref)) => {
                distance_sq < best_sq || (distance_sq == best_sq && unit.id() < best_ref.id)
            }
        };
        if closer {
            best = Some((
                distance_sq,
                UnitRef {
                    slot,
                    id: unit.id(),
                },
            ));
        }
    }
    best.map(|(_, target)| target)
}

/// Resolve a weak unit reference. `None` once the unit has died, reached the
/// objective, or its slot was recycled.
pub fn resolve_target(units: &Pool<Unit>, target: UnitRef) -> Option<&Unit> {
    units
        .get(target.slot)
        .filter(|unit| unit.is_alive() && unit.id() == target.id)
}

/// Run every placed defender for one tick. Returns the number of projectiles fired.
pub fn run(
    world: &mut World,
    grid: &PlacementGrid,
    units: &mut Pool<Unit>,
    projectiles: &mut Pool<Projectile>,
    projectile_lifetime: f32,
    events: &mut Vec<GameEvent>,
    dt: f32,
) -> u32 {
    let mut fired = 0;
    for (slot, entity) in grid.occupied() {
        let Ok((emplacement, stats, behavior, fire)) = world
            .query_one_mut::<(&Emplacement, &DefenderStats, &Behavior, &mut FireControl)>(entity)
        else {
            continue;
        };
        fire.timer = (fire.timer + dt).min(fire.cooldown);

        match *behavior {
            Behavior::Projectile {
                damage,
                projectile_speed,
                projectile_size,
            } => {
                fire.target = nearest_in_range(units, emplacement.position, stats.range);
                if fire.timer < fire.cooldown {
                    continue;
                }
                let Some((target, aim)) = fire
                    .target
                    .and_then(|target| resolve_target(units, target).map(|u| (target, u.position())))
                else {
                    continue;
                };
                projectiles.acquire(
                    &(),
                    ProjectileInit {
                        source: slot,
                        origin: emplacement.position,
                        aim,
                        damage,
                        speed: projectile_speed,
                        radius: projectile_size * 0.5,
                        lifetime: projectile_lifetime,
                    },
                );
                fire.timer = 0.0;
                fired += 1;
                events.push(GameEvent::DefenderFired {
                    slot,
                    target: target.id,
                });
            }
            Behavior::SlowPulse {
                slow_factor,
                slow_duration,
            } => {
                if fire.timer < fire.cooldown {
                    continue;
                }
                fire.timer = 0.0;
                let range_sq = stats.range * stats.range;
                let mut affected = 0;
                for (_slot, unit) in units.iter_active_mut() {
                    if unit.is_alive()
                        && emplacement.position.distance_squared(unit.position()) <= range_sq
                        && unit.apply_slow(slow_factor, slow_duration)
                    {
                        affected += 1;
                    }
                }
                if affected > 0 {
                    events.push(GameEvent::DefenderPulsed { slot, affected });
                }
            }
        }
    }
    fired
}
