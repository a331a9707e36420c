//! Kinematic integration for units and projectiles.

use sentinel_core::types::Bounds;

use crate::path::Path;
use crate::pool::Pool;
use crate::projectile::Projectile;
use crate::unit::Unit;

/// Walk every live unit along the path. Returns how many consumed the final
/// waypoint this tick.
pub fn run_units(units: &mut Pool<Unit>, path: &Path, dt: f32) -> u32 {
    let mut arrived = 0;
    for (_slot, unit) in units.iter_active_mut() {
        if unit.advance(path, dt) {
            arrived += 1;
        }
    }
    arrived
}

/// Fly every active projectile, expiring those past their lifetime or
/// outside the arena.
pub fn run_projectiles(projectiles: &mut Pool<Projectile>, bounds: &Bounds, dt: f32) {
    for (_slot, projectile) in projectiles.iter_active_mut() {
        projectile.advance(dt, bounds);
    }
}
