//! Data definitions: levels, waves, unit types and defender types.
//!
//! Everything is loaded from a single JSON catalog and validated up front.
//! A catalog that passes [`Catalog::validate`] can build every level it lists
//! without further failure; the one deliberate exception is an unknown unit
//! type inside a wave, which the spawner skips at runtime.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::BehaviorKind;
use crate::error::LoadError;
use crate::types::Bounds;

/// Catalog embedded in the crate: the two stock levels and their rosters.
const BUILTIN_CATALOG: &str = include_str!("../data/sentinel.json");

/// A hostile unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeDef {
    pub name: String,
    pub health: f32,
    /// Base movement speed in units per second.
    pub speed: f32,
    /// Currency credited when a unit of this type is killed.
    #[serde(default)]
    pub reward: u32,
    /// Footprint `[width, height]`. Only the derived collision radius matters
    /// to the simulation.
    #[serde(default = "default_unit_size")]
    pub size: [f32; 2],
}

impl UnitTypeDef {
    pub fn collision_radius(&self) -> f32 {
        self.size[0].max(self.size[1]) * 0.5
    }
}

/// What a defender does when its cooldown elapses.
///
/// Also attached to defender entities as a component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum Behavior {
    /// Fires a non-homing projectile at the nearest unit in range.
    Projectile {
        #[serde(default = "default_projectile_damage")]
        damage: f32,
        #[serde(default = "default_projectile_speed")]
        projectile_speed: f32,
        /// Projectile diameter.
        #[serde(default = "default_projectile_size")]
        projectile_size: f32,
    },
    /// Slows every unit in range; never produces projectiles.
    SlowPulse {
        #[serde(default = "default_slow_factor")]
        slow_factor: f32,
        #[serde(default = "default_slow_duration")]
        slow_duration: f32,
    },
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Self::Projectile { .. } => BehaviorKind::Projectile,
            Self::SlowPulse { .. } => BehaviorKind::SlowPulse,
        }
    }
}

/// A buildable defender type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderTypeDef {
    pub name: String,
    /// Detection radius.
    pub range: f32,
    /// Shots (or pulses) per second.
    pub fire_rate: f32,
    pub cost: u32,
    #[serde(flatten)]
    pub behavior: Behavior,
    /// Type this defender becomes when upgraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrades_to: Option<String>,
    #[serde(default)]
    pub upgrade_cost: u32,
}

impl DefenderTypeDef {
    /// Seconds between shots. Infinite (never fires) for a non-positive rate.
    pub fn cooldown(&self) -> f32 {
        if self.fire_rate > 0.0 {
            1.0 / self.fire_rate
        } else {
            f32::INFINITY
        }
    }
}

/// One timed entry in a wave: `count` units of one type, `interval` apart,
/// starting `time_offset` seconds into the wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEventDef {
    pub unit_type: String,
    pub count: u32,
    #[serde(default)]
    pub interval: f32,
    #[serde(default, alias = "time")]
    pub time_offset: f32,
}

/// A playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default = "default_starting_currency")]
    pub starting_currency: u32,
    #[serde(default = "default_objective_health")]
    pub objective_health: f32,
    pub objective_location: Vec2,
    /// Key into [`Catalog::paths`].
    pub path: String,
    /// Key into [`Catalog::platforms`].
    pub platforms: String,
    /// Wave ids, dispatched in order.
    pub wave_sequence: Vec<String>,
    #[serde(default = "default_passive_income")]
    pub passive_income: u32,
    #[serde(default)]
    pub bounds: Bounds,
}

/// A level with every reference resolved against its catalog.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLevel<'a> {
    pub id: &'a str,
    pub def: &'a LevelDef,
    pub path: &'a [Vec2],
    pub platforms: &'a [Vec2],
}

/// The complete set of definitions a session draws from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Campaign order. The first entry is where a new session starts.
    pub level_order: Vec<String>,
    pub levels: BTreeMap<String, LevelDef>,
    pub paths: BTreeMap<String, Vec<Vec2>>,
    #[serde(default)]
    pub platforms: BTreeMap<String, Vec<Vec2>>,
    pub waves: BTreeMap<String, Vec<SpawnEventDef>>,
    pub units: BTreeMap<String, UnitTypeDef>,
    pub defenders: BTreeMap<String, DefenderTypeDef>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Id of the level at `index` in campaign order.
    pub fn level_id_at(&self, index: usize) -> Option<&str> {
        self.level_order.get(index).map(String::as_str)
    }

    /// Position of `level_id` in campaign order.
    pub fn level_index(&self, level_id: &str) -> Option<usize> {
        self.level_order.iter().position(|id| id == level_id)
    }

    /// Look up a level and resolve its path and platform references.
    pub fn resolve_level<'a>(&'a self, level_id: &'a str) -> Result<ResolvedLevel<'a>, LoadError> {
        let def = self
            .levels
            .get(level_id)
            .ok_or_else(|| LoadError::UnknownLevel(level_id.to_string()))?;
        let path = self
            .paths
            .get(&def.path)
            .ok_or_else(|| LoadError::UnknownPath {
                level: level_id.to_string(),
                path: def.path.clone(),
            })?;
        let platforms = self
            .platforms
            .get(&def.platforms)
            .ok_or_else(|| LoadError::UnknownPlatforms {
                level: level_id.to_string(),
                platforms: def.platforms.clone(),
            })?;
        Ok(ResolvedLevel {
            id: level_id,
            def,
            path,
            platforms,
        })
    }

    /// Check every cross-reference and numeric field.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.level_order.is_empty() {
            return Err(LoadError::NoLevels);
        }
        for id in &self.level_order {
            if !self.levels.contains_key(id) {
                return Err(LoadError::UnknownLevel(id.clone()));
            }
        }

        for (id, level) in &self.levels {
            let resolved = self.resolve_level(id)?;
            if resolved.path.len() < 2 {
                return Err(LoadError::PathTooShort {
                    path: level.path.clone(),
                    len: resolved.path.len(),
                });
            }
            if level.wave_sequence.is_empty() {
                return Err(LoadError::EmptyWaveSequence(id.clone()));
            }
            for wave in &level.wave_sequence {
                if !self.waves.contains_key(wave) {
                    return Err(LoadError::UnknownWave {
                        level: id.clone(),
                        wave: wave.clone(),
                    });
                }
            }
            ensure(
                level.objective_health > 0.0,
                || format!("level `{id}`"),
                "objective_health must be positive",
            )?;
            ensure(
                level.bounds.width > 0.0 && level.bounds.height > 0.0,
                || format!("level `{id}`"),
                "bounds must be positive",
            )?;
        }

        for (id, events) in &self.waves {
            for (i, event) in events.iter().enumerate() {
                ensure(
                    event.interval.is_finite() && event.interval >= 0.0,
                    || format!("wave `{id}` event {i}"),
                    "interval must be non-negative",
                )?;
                ensure(
                    event.time_offset.is_finite() && event.time_offset >= 0.0,
                    || format!("wave `{id}` event {i}"),
                    "time_offset must be non-negative",
                )?;
            }
        }

        for (id, unit) in &self.units {
            let what = || format!("unit type `{id}`");
            ensure(unit.health > 0.0, what, "health must be positive")?;
            ensure(
                unit.speed.is_finite() && unit.speed >= 0.0,
                what,
                "speed must be non-negative",
            )?;
            ensure(
                unit.size[0] > 0.0 && unit.size[1] > 0.0,
                what,
                "size must be positive",
            )?;
        }

        for (id, defender) in &self.defenders {
            let what = || format!("defender type `{id}`");
            ensure(defender.range >= 0.0, what, "range must be non-negative")?;
            ensure(defender.fire_rate > 0.0, what, "fire_rate must be positive")?;
            ensure(defender.cost > 0, what, "cost must be positive")?;
            match defender.behavior {
                Behavior::Projectile {
                    damage,
                    projectile_speed,
                    projectile_size,
                } => {
                    ensure(damage > 0.0, what, "damage must be positive")?;
                    ensure(projectile_speed > 0.0, what, "projectile_speed must be positive")?;
                    ensure(projectile_size > 0.0, what, "projectile_size must be positive")?;
                }
                Behavior::SlowPulse {
                    slow_factor,
                    slow_duration,
                } => {
                    ensure(
                        slow_factor > 0.0 && slow_factor <= 1.0,
                        what,
                        "slow_factor must be in (0, 1]",
                    )?;
                    ensure(slow_duration > 0.0, what, "slow_duration must be positive")?;
                }
            }
            if let Some(target) = &defender.upgrades_to {
                if !self.defenders.contains_key(target) {
                    return Err(LoadError::UnknownUpgradeTarget {
                        defender: id.clone(),
                        target: target.clone(),
                    });
                }
                ensure(defender.upgrade_cost > 0, what, "upgrade_cost must be positive")?;
            }
        }

        Ok(())
    }
}

fn ensure(cond: bool, what: impl FnOnce() -> String, reason: &str) -> Result<(), LoadError> {
    if cond {
        Ok(())
    } else {
        Err(LoadError::Invalid {
            what: what(),
            reason: reason.to_string(),
        })
    }
}

fn default_unit_size() -> [f32; 2] {
    DEFAULT_UNIT_SIZE
}

fn default_projectile_damage() -> f32 {
    DEFAULT_PROJECTILE_DAMAGE
}

fn default_projectile_speed() -> f32 {
    DEFAULT_PROJECTILE_SPEED
}

fn default_projectile_size() -> f32 {
    DEFAULT_PROJECTILE_SIZE
}

fn default_slow_factor() -> f32 {
    DEFAULT_SLOW_FACTOR
}

fn default_slow_duration() -> f32 {
    DEFAULT_SLOW_DURATION
}

fn default_starting_currency() -> u32 {
    DEFAULT_STARTING_CURRENCY
}

fn default_objective_health() -> f32 {
    DEFAULT_OBJECTIVE_HEALTH
}

fn default_passive_income() -> u32 {
    PASSIVE_INCOME_RATE
}
