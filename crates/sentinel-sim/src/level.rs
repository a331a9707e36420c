//! Level blueprints: catalog references resolved once, rebuilt on demand.
//!
//! A session resolves every level of its campaign up front, so definition
//! problems surface before the first tick and restarting a level can never
//! fail halfway.

use glam::Vec2;

use sentinel_core::defs::{Catalog, LevelDef};
use sentinel_core::error::LoadError;

use crate::economy::Economy;
use crate::objective::Objective;
use crate::path::Path;
use crate::placement::PlacementGrid;
use crate::spawner::{ScheduledWave, Spawner};

/// Immutable description of one level, with its path and waves resolved.
#[derive(Debug, Clone)]
pub struct LevelBlueprint {
    pub id: String,
    pub def: LevelDef,
    pub path: Path,
    pub platforms: Vec<Vec2>,
    pub waves: Vec<ScheduledWave>,
}

impl LevelBlueprint {
    pub fn resolve(catalog: &Catalog, level_id: &str) -> Result<Self, LoadError> {
        let level = catalog.resolve_level(level_id)?;
        let path = Path::new(level.path.to_vec())
            .filter(|path| path.len() >= 2)
            .ok_or_else(|| LoadError::PathTooShort {
                path: level.def.path.clone(),
                len: level.path.len(),
            })?;
        if level.def.wave_sequence.is_empty() {
            return Err(LoadError::EmptyWaveSequence(level_id.to_string()));
        }
        let waves = level
            .def
            .wave_sequence
            .iter()
            .map(|wave_id| {
                catalog
                    .waves
                    .get(wave_id)
                    .map(|events| ScheduledWave::new(wave_id.clone(), events.clone()))
                    .ok_or_else(|| LoadError::UnknownWave {
                        level: level_id.to_string(),
                        wave: wave_id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: level_id.to_string(),
            def: level.def.clone(),
            path,
            platforms: level.platforms.to_vec(),
            waves,
        })
    }

    /// Resolve every level in campaign order.
    pub fn resolve_campaign(catalog: &Catalog) -> Result<Vec<Self>, LoadError> {
        if catalog.level_order.is_empty() {
            return Err(LoadError::NoLevels);
        }
        catalog
            .level_order
            .iter()
            .map(|id| Self::resolve(catalog, id))
            .collect()
    }

    pub fn economy(&self) -> Economy {
        Economy::new(self.def.starting_currency, self.def.passive_income)
    }

    pub fn objective(&self) -> Objective {
        Objective::new(self.def.objective_location, self.def.objective_health)
    }

    pub fn spawner(&self, inter_wave_delay: f32) -> Spawner {
        Spawner::new(self.waves.clone(), inter_wave_delay)
    }

    pub fn grid(&self) -> PlacementGrid {
        PlacementGrid::new(&self.platforms)
    }

    /// Units scheduled across all waves, counting unknown types too.
    pub fn scheduled_units(&self) -> u32 {
        self.waves.iter().map(ScheduledWave::total_units).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_campaign_resolves() {
        let catalog = Catalog::builtin().unwrap();
        let levels = LevelBlueprint::resolve_campaign(&catalog).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].id, "level1");
        assert_eq!(levels[0].waves.len(), 3);
        assert_eq!(levels[0].scheduled_units(), 5 + 10 + 16);
        assert_eq!(levels[0].economy().balance(), 200);
        assert_eq!(levels[1].objective().health(), 15.0);
        assert_eq!(levels[1].grid().slots().len(), 8);
    }

    #[test]
    fn unknown_level_rejected() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            LevelBlueprint::resolve(&catalog, "level9"),
            Err(LoadError::UnknownLevel(_))
        ));
    }
}
