//! Hostile units walking the path.

use glam::Vec2;

use sentinel_core::defs::UnitTypeDef;
use sentinel_core::enums::DamageOutcome;
use sentinel_core::types::UnitId;

use crate::path::Path;
use crate::pool::Poolable;

/// Active speed reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowEffect {
    pub factor: f32,
    pub remaining: f32,
}

/// Arguments for spawning (or respawning) a unit.
#[derive(Debug, Clone)]
pub struct UnitInit {
    pub id: UnitId,
    pub unit_type: String,
    pub def: UnitTypeDef,
    pub start: Vec2,
}

/// A pooled hostile unit.
///
/// A unit ends in exactly one of two ways: its health reaches zero (it goes
/// inactive immediately) or it consumes the final waypoint (it is flagged and
/// stays in its slot until the combat resolver charges the objective).
#[derive(Debug, Clone)]
pub struct Unit {
    id: UnitId,
    unit_type: String,
    name: String,
    max_health: f32,
    health: f32,
    base_speed: f32,
    speed: f32,
    slow: Option<SlowEffect>,
    reward: u32,
    radius: f32,
    position: Vec2,
    /// Index of the waypoint currently being walked towards.
    next_waypoint: usize,
    active: bool,
    reached_objective: bool,
}

impl Poolable for Unit {
    type Kind = str;
    type Init = UnitInit;

    fn create(init: UnitInit) -> Self {
        let mut unit = Self {
            id: init.id,
            unit_type: String::new(),
            name: String::new(),
            max_health: 0.0,
            health: 0.0,
            base_speed: 0.0,
            speed: 0.0,
            slow: None,
            reward: 0,
            radius: 0.0,
            position: Vec2::ZERO,
            next_waypoint: 1,
            active: false,
            reached_objective: false,
        };
        unit.reinit(init);
        unit
    }

    fn reinit(&mut self, init: UnitInit) {
        self.id = init.id;
        self.unit_type = init.unit_type;
        self.name.clone_from(&init.def.name);
        self.max_health = init.def.health;
        self.health = init.def.health;
        self.base_speed = init.def.speed;
        self.speed = init.def.speed;
        self.slow = None;
        self.reward = init.def.reward;
        self.radius = init.def.collision_radius();
        self.position = init.start;
        self.next_waypoint = 1;
        self.active = true;
        self.reached_objective = false;
    }

    fn kind(&self) -> &str {
        &self.unit_type
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Unit {
    /// Tick the slow effect and walk along `path`.
    ///
    /// Returns `true` on the tick the final waypoint is consumed.
    pub fn advance(&mut self, path: &Path, dt: f32) -> bool {
        if !self.is_alive() {
            return false;
        }

        if let Some(slow) = &mut self.slow {
            slow.remaining -= dt;
            if slow.remaining <= 0.0 {
                self.slow = None;
                self.speed = self.base_speed;
            }
        }

        let Some(target) = path.get(self.next_waypoint) else {
            return false;
        };
        let to_target = target - self.position;
        let distance = to_target.length();
        let step = (self.speed * dt).max(0.0);

        if step >= distance {
            self.position = target;
            self.next_waypoint += 1;
            if self.next_waypoint >= path.len() {
                self.reached_objective = true;
                return true;
            }
        } else if distance > 0.0 {
            self.position += to_target / distance * step;
        }
        false
    }

    /// Apply damage. Only live units can be hurt.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || amount.is_nan() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.active = false;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Slow to `factor` of base speed for `duration` seconds.
    ///
    /// An active effect is only replaced by a strictly stronger one.
    /// Returns whether the effect was applied.
    pub fn apply_slow(&mut self, factor: f32, duration: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        if let Some(current) = self.slow {
            if factor >= current.factor {
                return false;
            }
        }
        self.slow = Some(SlowEffect {
            factor,
            remaining: duration,
        });
        self.speed = self.base_speed * factor;
        true
    }

    /// Active and still on the path: a valid target and collision candidate.
    pub fn is_alive(&self) -> bool {
        self.active && !self.reached_objective
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn unit_type(&self) -> &str {
        &self.unit_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn slow(&self) -> Option<SlowEffect> {
        self.slow
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn next_waypoint(&self) -> usize {
        self.next_waypoint
    }

    pub fn reached_objective(&self) -> bool {
        self.reached_objective
    }
}
