//! Combat resolution: units arriving at the objective and projectile hits.
//!
//! Both passes only mark entries inactive; nothing is removed while the
//! pools are being walked.

use tracing::debug;

use sentinel_core::enums::DamageOutcome;
use sentinel_core::events::GameEvent;

use crate::economy::Economy;
use crate::objective::Objective;
use crate::pool::{Pool, Poolable};
use crate::projectile::Projectile;
use crate::unit::Unit;

/// Charge the objective for every unit that completed the path this tick and
/// release those units. Returns how many were resolved.
pub fn resolve_reached_objective(
    units: &mut Pool<Unit>,
    objective: &mut Objective,
    damage_per_unit: f32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut resolved = 0;
    for slot in 0..units.len() {
        let Some(unit) = units.get(slot) else {
            continue;
        };
        if !(unit.is_active() && unit.reached_objective()) {
            continue;
        }
        let id = unit.id();
        units.release(slot);
        resolved += 1;
        events.push(GameEvent::UnitReachedObjective { unit: id });

        let applied = objective.take_damage(damage_per_unit);
        if applied > 0.0 {
            debug!(unit = id.0, remaining = objective.health(), "objective hit");
            events.push(GameEvent::ObjectiveDamaged {
                amount: applied,
                remaining: objective.health(),
            });
        }
    }
    resolved
}

/// Test every active projectile against live units. The first live unit a
/// projectile overlaps takes its damage and consumes it; a kill credits the
/// unit's reward. Returns the number of kills.
pub fn resolve_collisions(
    projectiles: &mut Pool<Projectile>,
    units: &mut Pool<Unit>,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut kills = 0;
    for (_slot, projectile) in projectiles.iter_active_mut() {
        let hit = units
            .iter_active_mut()
            .map(|(_, unit)| unit)
            .find(|unit| unit.is_alive() && projectile.overlaps(unit));
        let Some(unit) = hit else {
            continue;
        };
        projectile.deactivate();
        if unit.take_damage(projectile.damage()) == DamageOutcome::Killed {
            let reward = unit.reward();
            economy.add(reward);
            kills += 1;
            debug!(unit = unit.id().0, reward, "unit killed");
            events.push(GameEvent::UnitDied {
                unit: unit.id(),
                reward,
            });
        }
    }
    kills
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use sentinel_core::defs::UnitTypeDef;
    use sentinel_core::types::{SlotId, UnitId};

    use super::*;
    use crate::path::Path;
    use crate::projectile::ProjectileInit;
    use crate::unit::UnitInit;

    fn spawn_unit(units: &mut Pool<Unit>, id: u64, at: Vec2, health: f32) -> usize {
        units
            .acquire(
                "grunt",
                UnitInit {
                    id: UnitId(id),
                    unit_type: "grunt".into(),
                    def: UnitTypeDef {
                        name: "Grunt".into(),
                        health,
                        speed: 1000.0,
                        reward: 5,
                        size: [20.0, 20.0],
                    },
                    start: at,
                },
            )
            .0
    }

    fn shoot(projectiles: &mut Pool<Projectile>, at: Vec2, damage: f32) {
        projectiles.acquire(
            &(),
            ProjectileInit {
                source: SlotId(0),
                origin: at,
                aim: at + Vec2::X,
                damage,
                speed: 300.0,
                radius: 2.5,
                lifetime: 5.0,
            },
        );
    }

    #[test]
    fn three_hits_kill_and_reward_once() {
        let mut units = Pool::new();
        let mut projectiles = Pool::new();
        let mut economy = Economy::new(0, 0);
        let mut events = Vec::new();
        let target = Vec2::new(100.0, 100.0);
        spawn_unit(&mut units, 1, target, 30.0);

        for _ in 0..3 {
            shoot(&mut projectiles, target, 10.0);
            resolve_collisions(&mut projectiles, &mut units, &mut economy, &mut events);
        }
        assert_eq!(units.active_count(), 0);
        assert_eq!(economy.balance(), 5);
        assert_eq!(
            events,
            vec![GameEvent::UnitDied {
                unit: UnitId(1),
                reward: 5
            }]
        );

        // A fourth projectile finds nothing alive and stays in flight.
        shoot(&mut projectiles, target, 10.0);
        let kills = resolve_collisions(&mut projectiles, &mut units, &mut economy, &mut events);
        assert_eq!(kills, 0);
        assert_eq!(economy.balance(), 5);
        assert_eq!(projectiles.active_count(), 1);
    }

    #[test]
    fn projectile_consumed_by_first_hit_only() {
        let mut units = Pool::new();
        let mut projectiles = Pool::new();
        let mut economy = Economy::new(0, 0);
        let mut events = Vec::new();
        let at = Vec2::new(50.0, 50.0);
        spawn_unit(&mut units, 1, at, 30.0);
        spawn_unit(&mut units, 2, at, 30.0);

        shoot(&mut projectiles, at, 10.0);
        resolve_collisions(&mut projectiles, &mut units, &mut economy, &mut events);

        let healths: Vec<f32> = units.iter_active().map(|(_, u)| u.health()).collect();
        assert_eq!(healths, vec![20.0, 30.0]);
        assert_eq!(projectiles.active_count(), 0);
    }

    #[test]
    fn miss_leaves_projectile_active() {
        let mut units = Pool::new();
        let mut projectiles = Pool::new();
        let mut economy = Economy::new(0, 0);
        let mut events = Vec::new();
        spawn_unit(&mut units, 1, Vec2::new(0.0, 0.0), 30.0);
        shoot(&mut projectiles, Vec2::new(100.0, 0.0), 10.0);

        resolve_collisions(&mut projectiles, &mut units, &mut economy, &mut events);
        assert_eq!(projectiles.active_count(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn arrivals_damage_objective() {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]).unwrap();
        let mut units = Pool::new();
        let mut objective = Objective::new(Vec2::new(10.0, 0.0), 10.0);
        let mut events = Vec::new();
        for id in 0..3 {
            spawn_unit(&mut units, id, path.start(), 30.0);
        }
        for (_, unit) in units.iter_active_mut() {
            assert!(unit.advance(&path, 0.1));
        }

        let resolved = resolve_reached_objective(&mut units, &mut objective, 1.0, &mut events);
        assert_eq!(resolved, 3);
        assert_eq!(objective.health(), 7.0);
        assert_eq!(units.active_count(), 0);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::ObjectiveDamaged { .. }))
                .count(),
            3
        );

        let resolved = resolve_reached_objective(&mut units, &mut objective, 1.0, &mut events);
        assert_eq!(resolved, 0, "units are charged only once");
    }

    #[test]
    fn arrived_unit_is_not_a_collision_target() {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]).unwrap();
        let mut units = Pool::new();
        let mut projectiles = Pool::new();
        let mut economy = Economy::new(0, 0);
        let mut events = Vec::new();
        spawn_unit(&mut units, 1, path.start(), 10.0);
        for (_, unit) in units.iter_active_mut() {
            unit.advance(&path, 0.1);
        }

        shoot(&mut projectiles, Vec2::new(10.0, 0.0), 50.0);
        let kills = resolve_collisions(&mut projectiles, &mut units, &mut economy, &mut events);
        assert_eq!(kills, 0);
        assert_eq!(economy.balance(), 0);
        assert_eq!(projectiles.active_count(), 1);
    }
}
