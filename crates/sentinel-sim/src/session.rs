//! Session controller: owns one level attempt and drives the tick.
//!
//! `Session` holds every piece of simulation state (economy, objective, wave
//! scheduler, placement grid, defender world and entity pools) and exposes
//! the legal state transitions. Nothing is global, so independent sessions
//! can run side by side.

use std::collections::VecDeque;

use hecs::{Entity, World};
use tracing::{debug, info, warn};

use sentinel_core::commands::PlayerCommand;
use sentinel_core::components::{DefenderStats, Emplacement};
use sentinel_core::constants::*;
use sentinel_core::defs::Catalog;
use sentinel_core::enums::{SessionState, Selection};
use sentinel_core::error::{CommandError, LoadError};
use sentinel_core::events::{Diagnostic, GameEvent};
use sentinel_core::state::{SessionSnapshot, SessionStats};
use sentinel_core::types::{SimTime, SlotId};

use crate::economy::Economy;
use crate::level::LevelBlueprint;
use crate::objective::Objective;
use crate::placement::PlacementGrid;
use crate::pool::Pool;
use crate::projectile::Projectile;
use crate::spawner::Spawner;
use crate::systems;
use crate::unit::Unit;

/// Runtime tunables. Level data covers everything per-level; these are the
/// knobs shared by every level of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Longest step a single tick will integrate.
    pub max_frame_dt: f32,
    /// Seconds between one wave finishing dispatch and the next starting.
    pub inter_wave_delay: f32,
    /// Seconds before an unspent projectile expires.
    pub projectile_lifetime: f32,
    /// Objective damage per unit that completes the path.
    pub objective_damage_per_unit: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            inter_wave_delay: INTER_WAVE_DELAY,
            projectile_lifetime: PROJECTILE_LIFETIME,
            objective_damage_per_unit: OBJECTIVE_DAMAGE_PER_UNIT,
        }
    }
}

/// One live level attempt plus the campaign it belongs to.
pub struct Session {
    pub(crate) catalog: Catalog,
    pub(crate) config: SessionConfig,
    pub(crate) levels: Vec<LevelBlueprint>,
    pub(crate) level_index: usize,
    pub(crate) state: SessionState,
    pub(crate) time: SimTime,
    pub(crate) economy: Economy,
    pub(crate) objective: Objective,
    pub(crate) spawner: Spawner,
    pub(crate) grid: PlacementGrid,
    /// Owns every placed defender; slots only point into it.
    pub(crate) defenders: World,
    pub(crate) units: Pool<Unit>,
    pub(crate) projectiles: Pool<Projectile>,
    pub(crate) selection: Selection,
    pub(crate) stats: SessionStats,
    next_unit_id: u64,
    command_queue: VecDeque<PlayerCommand>,
    spawn_requests: Vec<String>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start at the first level of the catalog's campaign.
    pub fn new(catalog: Catalog, config: SessionConfig) -> Result<Self, LoadError> {
        let first = catalog
            .level_id_at(0)
            .ok_or(LoadError::NoLevels)?
            .to_string();
        Self::with_level(catalog, config, &first)
    }

    /// Start at a specific level. Every level of the campaign is validated
    /// and resolved before anything is built.
    pub fn with_level(
        catalog: Catalog,
        config: SessionConfig,
        level_id: &str,
    ) -> Result<Self, LoadError> {
        catalog.validate()?;
        let levels = LevelBlueprint::resolve_campaign(&catalog)?;
        let level_index = levels
            .iter()
            .position(|level| level.id == level_id)
            .ok_or_else(|| LoadError::UnknownLevel(level_id.to_string()))?;

        let blueprint = &levels[level_index];
        let economy = blueprint.economy();
        let objective = blueprint.objective();
        let spawner = blueprint.spawner(config.inter_wave_delay);
        let grid = blueprint.grid();
        info!(
            level = %blueprint.id,
            waves = blueprint.waves.len(),
            slots = blueprint.platforms.len(),
            "level loaded"
        );
        let events = vec![GameEvent::LevelLoaded {
            level_id: blueprint.id.clone(),
        }];

        Ok(Self {
            catalog,
            config,
            levels,
            level_index,
            state: SessionState::Active,
            time: SimTime::default(),
            economy,
            objective,
            spawner,
            grid,
            defenders: World::new(),
            units: Pool::new(),
            projectiles: Pool::new(),
            selection: Selection::None,
            stats: SessionStats::default(),
            next_unit_id: 0,
            command_queue: VecDeque::new(),
            spawn_requests: Vec::new(),
            events,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by `dt` seconds and return the resulting snapshot, carrying
    /// every event raised since the previous snapshot.
    pub fn tick(&mut self, dt: f32) -> SessionSnapshot {
        self.step(dt);
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build(self, events)
    }

    /// Advance by `dt` seconds without building a snapshot. Events keep
    /// accumulating until [`tick`](Self::tick) or
    /// [`drain_events`](Self::drain_events).
    pub fn step(&mut self, dt: f32) {
        self.process_commands();

        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };

        self.check_outcome();
        if self.state != SessionState::Active {
            return;
        }
        self.run_systems(dt);
        self.time.advance(dt);
        self.check_outcome();
    }

    /// Snapshot of the current state without draining events.
    pub fn snapshot(&self) -> SessionSnapshot {
        systems::snapshot::build(self, Vec::new())
    }

    /// Take every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one command immediately.
    pub fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::SelectBuildType { defender_type } => {
                self.select_build_type(&defender_type)
            }
            PlayerCommand::PlaceDefender { slot } => self.place_defender(slot).map(|_| ()),
            PlayerCommand::SelectPlacedDefender { slot } => self.select_placed_defender(slot),
            PlayerCommand::AttemptUpgrade => self.attempt_upgrade().map(|_| ()),
            PlayerCommand::Deselect => {
                self.deselect();
                Ok(())
            }
            PlayerCommand::TogglePause => self.toggle_pause().map(|_| ()),
            PlayerCommand::Restart => {
                self.restart();
                Ok(())
            }
            PlayerCommand::AdvanceLevel => self.advance_level(),
        }
    }

    /// Choose a defender type to build. Clears any placed-defender selection.
    pub fn select_build_type(&mut self, defender_type: &str) -> Result<(), CommandError> {
        self.ensure_active()?;
        if !self.catalog.defenders.contains_key(defender_type) {
            warn!(defender_type, "unknown defender type selected");
            self.events
                .push(GameEvent::Diagnostic(Diagnostic::UnknownDefenderType {
                    defender_type: defender_type.to_string(),
                }));
            return Err(CommandError::UnknownDefenderType(defender_type.to_string()));
        }
        self.selection = Selection::BuildType {
            defender_type: defender_type.to_string(),
        };
        Ok(())
    }

    /// Build the selected defender type on `slot`, paying its cost.
    ///
    /// The build type stays selected so the player can keep placing.
    pub fn place_defender(&mut self, slot: SlotId) -> Result<Entity, CommandError> {
        self.ensure_active()?;
        let Selection::BuildType { defender_type } = &self.selection else {
            return Err(CommandError::NoBuildTypeSelected);
        };
        let defender_type = defender_type.clone();
        let Some(def) = self.catalog.defenders.get(&defender_type) else {
            return Err(CommandError::UnknownDefenderType(defender_type));
        };

        let position = self.grid.available_position(slot)?;
        if !self.economy.can_afford(def.cost) {
            return Err(CommandError::InsufficientFunds {
                needed: def.cost,
                available: self.economy.balance(),
            });
        }

        let entity =
            systems::defenders::spawn(&mut self.defenders, slot, position, &defender_type, def);
        self.grid.occupy(slot, entity)?;
        self.economy.spend(def.cost);

        info!(%slot, %defender_type, cost = def.cost, balance = self.economy.balance(), "defender placed");
        self.events.push(GameEvent::DefenderPlaced {
            slot,
            defender_type,
            cost: def.cost,
        });
        Ok(entity)
    }

    /// Select the defender on `slot`. Clears any build-type selection.
    pub fn select_placed_defender(&mut self, slot: SlotId) -> Result<(), CommandError> {
        self.ensure_active()?;
        self.grid
            .defender_at(slot)
            .ok_or(CommandError::NoDefenderAt(slot))?;
        self.selection = Selection::Placed { slot };
        Ok(())
    }

    /// Replace the selected defender with its upgrade, in place.
    ///
    /// On any failure nothing changes and nothing is spent. On success the
    /// selection is cleared.
    pub fn attempt_upgrade(&mut self) -> Result<Entity, CommandError> {
        self.ensure_active()?;
        let Selection::Placed { slot } = self.selection else {
            return Err(CommandError::NothingSelected);
        };
        let entity = self
            .grid
            .defender_at(slot)
            .ok_or(CommandError::NoDefenderAt(slot))?;

        let (from, upgrade, position) = {
            let stats = self
                .defenders
                .get::<&DefenderStats>(entity)
                .map_err(|_| CommandError::NoDefenderAt(slot))?;
            let emplacement = self
                .defenders
                .get::<&Emplacement>(entity)
                .map_err(|_| CommandError::NoDefenderAt(slot))?;
            (
                stats.defender_type.clone(),
                stats.upgrade.clone(),
                emplacement.position,
            )
        };
        let Some(upgrade) = upgrade.filter(|upgrade| upgrade.cost > 0) else {
            return Err(CommandError::NoUpgrade(from));
        };
        let Some(def) = self.catalog.defenders.get(&upgrade.to) else {
            return Err(CommandError::UnknownDefenderType(upgrade.to));
        };
        if !self.economy.can_afford(upgrade.cost) {
            return Err(CommandError::InsufficientFunds {
                needed: upgrade.cost,
                available: self.economy.balance(),
            });
        }

        self.economy.spend(upgrade.cost);
        let replacement =
            systems::defenders::spawn(&mut self.defenders, slot, position, &upgrade.to, def);
        self.grid.replace(slot, replacement);
        if self.defenders.despawn(entity).is_err() {
            warn!(%slot, "upgraded defender was already gone");
        }
        self.selection = Selection::None;

        info!(%slot, %from, to = %upgrade.to, cost = upgrade.cost, "defender upgraded");
        self.events.push(GameEvent::DefenderUpgraded {
            slot,
            from,
            to: upgrade.to,
            cost: upgrade.cost,
        });
        Ok(replacement)
    }

    /// Clear the current selection. Always allowed.
    pub fn deselect(&mut self) {
        self.selection = Selection::None;
    }

    /// Suspend an active session or resume a suspended one.
    pub fn toggle_pause(&mut self) -> Result<SessionState, CommandError> {
        let to = match self.state {
            SessionState::Active => SessionState::Suspended,
            SessionState::Suspended => SessionState::Active,
            from => {
                return Err(CommandError::InvalidTransition {
                    from,
                    to: SessionState::Suspended,
                })
            }
        };
        self.transition(to);
        Ok(to)
    }

    /// Rebuild the current level from scratch. Allowed from any state.
    pub fn restart(&mut self) {
        self.load_level(self.level_index);
    }

    /// Move on to the next level. Only legal after a victory.
    pub fn advance_level(&mut self) -> Result<(), CommandError> {
        if self.state != SessionState::Victorious {
            return Err(CommandError::InvalidTransition {
                from: self.state,
                to: SessionState::Active,
            });
        }
        let next = self.level_index + 1;
        if next >= self.levels.len() {
            return Err(CommandError::NoFurtherLevels(self.level_id().to_string()));
        }
        self.load_level(next);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn level(&self) -> &LevelBlueprint {
        &self.levels[self.level_index]
    }

    pub fn level_id(&self) -> &str {
        &self.level().id
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    /// Read-only view of the defender world.
    pub fn defenders(&self) -> &World {
        &self.defenders
    }

    pub fn units(&self) -> &Pool<Unit> {
        &self.units
    }

    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    fn ensure_active(&self) -> Result<(), CommandError> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(CommandError::NotActive(self.state))
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command.clone()) {
                debug!(?command, %err, "command rejected");
                self.events.push(GameEvent::CommandRejected {
                    command,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(?from, ?to, tick = self.time.tick, "session state changed");
        self.events.push(GameEvent::SessionStateChanged { from, to });
    }

    /// Defeat takes precedence: a destroyed objective loses even if the last
    /// unit fell on the same tick.
    fn check_outcome(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        if self.objective.is_destroyed() {
            self.transition(SessionState::Defeated);
        } else if self.spawner.is_finished() && self.units.active_count() == 0 {
            self.transition(SessionState::Victorious);
        }
    }

    fn load_level(&mut self, index: usize) {
        let Some(blueprint) = self.levels.get(index) else {
            return;
        };
        self.level_index = index;
        self.economy = blueprint.economy();
        self.objective = blueprint.objective();
        self.spawner = blueprint.spawner(self.config.inter_wave_delay);
        self.grid = blueprint.grid();
        self.defenders.clear();
        self.units.release_all();
        self.projectiles.release_all();
        self.spawn_requests.clear();
        self.selection = Selection::None;
        self.stats = SessionStats::default();
        self.time = SimTime::default();

        info!(level = %blueprint.id, "level loaded");
        self.events.push(GameEvent::LevelLoaded {
            level_id: blueprint.id.clone(),
        });
        self.transition(SessionState::Active);
    }

    /// One active tick, in fixed order.
    fn run_systems(&mut self, dt: f32) {
        let Some(level) = self.levels.get(self.level_index) else {
            return;
        };

        // 1. Passive income
        self.economy.update(dt);

        // 2. Wave schedule, then materialize whatever came due
        self.spawner.advance(
            dt,
            &self.catalog.units,
            &mut self.spawn_requests,
            &mut self.events,
        );
        self.stats.units_spawned += systems::spawning::run(
            &mut self.spawn_requests,
            &self.catalog.units,
            &mut self.units,
            &level.path,
            &mut self.next_unit_id,
            &mut self.events,
        );

        // 3. Defenders acquire targets and fire
        self.stats.projectiles_fired += systems::defenders::run(
            &mut self.defenders,
            &self.grid,
            &mut self.units,
            &mut self.projectiles,
            self.config.projectile_lifetime,
            &mut self.events,
            dt,
        );

        // 4. Unit movement
        systems::movement::run_units(&mut self.units, &level.path, dt);

        // 5. Projectile movement
        systems::movement::run_projectiles(&mut self.projectiles, &level.def.bounds, dt);

        // 6. Units at the objective
        self.stats.units_leaked += systems::combat::resolve_reached_objective(
            &mut self.units,
            &mut self.objective,
            self.config.objective_damage_per_unit,
            &mut self.events,
        );

        // 7. Projectile hits
        self.stats.units_killed += systems::combat::resolve_collisions(
            &mut self.projectiles,
            &mut self.units,
            &mut self.economy,
            &mut self.events,
        );
    }
}
