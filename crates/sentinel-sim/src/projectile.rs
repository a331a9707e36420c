//! Non-homing projectiles fired by defenders.

use glam::Vec2;

use sentinel_core::enums::ProjectileExpiry;
use sentinel_core::types::{Bounds, SlotId};

use crate::pool::Poolable;
use crate::unit::Unit;

/// Arguments for firing a projectile.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileInit {
    /// Slot of the defender that fired.
    pub source: SlotId,
    pub origin: Vec2,
    /// Point the projectile was aimed at. Only the direction is kept.
    pub aim: Vec2,
    pub damage: f32,
    pub speed: f32,
    pub radius: f32,
    pub lifetime: f32,
}

/// A pooled projectile. Direction is fixed at creation.
#[derive(Debug, Clone)]
pub struct Projectile {
    source: SlotId,
    position: Vec2,
    direction: Vec2,
    damage: f32,
    speed: f32,
    radius: f32,
    age: f32,
    lifetime: f32,
    active: bool,
}

impl Poolable for Projectile {
    /// Every projectile can stand in for every other.
    type Kind = ();
    type Init = ProjectileInit;

    fn create(init: ProjectileInit) -> Self {
        let mut projectile = Self {
            source: init.source,
            position: Vec2::ZERO,
            direction: Vec2::NEG_Y,
            damage: 0.0,
            speed: 0.0,
            radius: 0.0,
            age: 0.0,
            lifetime: 0.0,
            active: false,
        };
        projectile.reinit(init);
        projectile
    }

    fn reinit(&mut self, init: ProjectileInit) {
        self.source = init.source;
        self.position = init.origin;
        // Aiming at its own origin sends the projectile straight up.
        self.direction = (init.aim - init.origin).try_normalize().unwrap_or(Vec2::NEG_Y);
        self.damage = init.damage;
        self.speed = init.speed;
        self.radius = init.radius;
        self.age = 0.0;
        self.lifetime = init.lifetime;
        self.active = true;
    }

    fn kind(&self) -> &() {
        &()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Projectile {
    /// Fly for `dt` seconds. Deactivates and reports why once the lifetime
    /// is exceeded or the projectile leaves `bounds`.
    pub fn advance(&mut self, dt: f32, bounds: &Bounds) -> Option<ProjectileExpiry> {
        if !self.active {
            return None;
        }
        self.position += self.direction * self.speed * dt;
        self.age += dt;

        let expiry = if self.age > self.lifetime {
            Some(ProjectileExpiry::Timeout)
        } else if !bounds.overlaps_circle(self.position, self.radius) {
            Some(ProjectileExpiry::OutOfBounds)
        } else {
            None
        };
        if expiry.is_some() {
            self.active = false;
        }
        expiry
    }

    /// Circle overlap against a unit's collision radius.
    pub fn overlaps(&self, unit: &Unit) -> bool {
        let reach = self.radius + unit.radius();
        self.position.distance_squared(unit.position()) <= reach * reach
    }

    pub fn source(&self) -> SlotId {
        self.source
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn age(&self) -> f32 {
        self.age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(origin: Vec2, aim: Vec2) -> Projectile {
        Projectile::create(ProjectileInit {
            source: SlotId(0),
            origin,
            aim,
            damage: 10.0,
            speed: 300.0,
            radius: 2.5,
            lifetime: 5.0,
        })
    }

    #[test]
    fn direction_fixed_at_creation() {
        let mut projectile = fire(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        assert_eq!(projectile.direction(), Vec2::X);
        projectile.advance(0.1, &Bounds::default());
        assert!((projectile.position() - Vec2::new(130.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn zero_length_aim_defaults_up() {
        let projectile = fire(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        assert_eq!(projectile.direction(), Vec2::NEG_Y);
    }

    #[test]
    fn expires_after_lifetime() {
        let bounds = Bounds {
            width: 1.0e6,
            height: 1.0e6,
        };
        let mut projectile = fire(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0));
        for _ in 0..20 {
            assert_eq!(projectile.advance(0.25, &bounds), None);
        }
        assert_eq!(
            projectile.advance(0.25, &bounds),
            Some(ProjectileExpiry::Timeout)
        );
        assert!(!projectile.is_active());
    }

    #[test]
    fn expires_out_of_bounds() {
        let mut projectile = fire(Vec2::new(1270.0, 360.0), Vec2::new(2000.0, 360.0));
        assert_eq!(
            projectile.advance(0.1, &Bounds::default()),
            Some(ProjectileExpiry::OutOfBounds)
        );
        assert_eq!(projectile.advance(0.1, &Bounds::default()), None);
    }
}
