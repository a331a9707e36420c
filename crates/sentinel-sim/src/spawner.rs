//! Wave scheduler: decides when each unit of each wave enters the path.
//!
//! The scheduler only names unit types; turning a name into a pooled unit is
//! the spawning system's job. One spawn group is in flight at a time, so a
//! later event whose time offset has already passed waits until the current
//! group has dispatched its last unit.

use std::collections::BTreeMap;

use tracing::{info, warn};

use sentinel_core::constants::INTER_WAVE_DELAY;
use sentinel_core::defs::{SpawnEventDef, UnitTypeDef};
use sentinel_core::enums::SpawnerPhase;
use sentinel_core::events::{Diagnostic, GameEvent};

/// A wave with its events in dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledWave {
    pub id: String,
    pub events: Vec<SpawnEventDef>,
}

impl ScheduledWave {
    /// Events are sorted by time offset; equal offsets keep definition order.
    pub fn new(id: impl Into<String>, mut events: Vec<SpawnEventDef>) -> Self {
        events.sort_by(|a, b| a.time_offset.total_cmp(&b.time_offset));
        Self {
            id: id.into(),
            events,
        }
    }

    pub fn total_units(&self) -> u32 {
        self.events.iter().map(|event| event.count).sum()
    }
}

/// The spawn event currently dispatching units.
#[derive(Debug, Clone, PartialEq)]
struct SpawnGroup {
    unit_type: String,
    remaining: u32,
    interval: f32,
    /// Counts down to the next individual spawn.
    timer: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct WaveProgress {
    /// Seconds since the wave started. Never reset mid-wave.
    clock: f32,
    next_event: usize,
    group: Option<SpawnGroup>,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle { since_last_wave: f32 },
    Spawning(WaveProgress),
    Exhausted,
}

/// Per-level wave state machine: `Idle → Spawning → Idle … → Exhausted`.
#[derive(Debug, Clone)]
pub struct Spawner {
    waves: Vec<ScheduledWave>,
    /// Index of the wave most recently started.
    current: Option<usize>,
    phase: Phase,
    inter_wave_delay: f32,
    dispatched: u32,
}

impl Spawner {
    pub fn new(waves: Vec<ScheduledWave>, inter_wave_delay: f32) -> Self {
        let phase = if waves.is_empty() {
            Phase::Exhausted
        } else {
            Phase::Idle {
                since_last_wave: 0.0,
            }
        };
        Self {
            waves,
            current: None,
            phase,
            inter_wave_delay,
            dispatched: 0,
        }
    }

    /// Advance the schedule by `dt` seconds.
    ///
    /// Unit types due to spawn are appended to `spawns`. Events naming a type
    /// missing from `unit_types` are skipped with a diagnostic.
    pub fn advance(
        &mut self,
        dt: f32,
        unit_types: &BTreeMap<String, UnitTypeDef>,
        spawns: &mut Vec<String>,
        events: &mut Vec<GameEvent>,
    ) {
        if let Phase::Idle { since_last_wave } = &mut self.phase {
            *since_last_wave += dt;
            let due = self.current.is_none() || *since_last_wave >= self.inter_wave_delay;
            if !due {
                return;
            }
            self.start_next_wave(events);
        }

        let Some(index) = self.current else {
            return;
        };
        let Phase::Spawning(progress) = &mut self.phase else {
            return;
        };
        let wave = &self.waves[index];
        progress.clock += dt;

        if let Some(group) = &mut progress.group {
            group.timer -= dt;
            if group.timer <= 0.0 {
                spawns.push(group.unit_type.clone());
                self.dispatched += 1;
                group.remaining -= 1;
                group.timer = group.interval;
                if group.remaining == 0 {
                    progress.group = None;
                }
            }
        }

        while progress.group.is_none() {
            let Some(event) = wave.events.get(progress.next_event) else {
                break;
            };
            if progress.clock < event.time_offset {
                break;
            }
            progress.next_event += 1;
            if !unit_types.contains_key(&event.unit_type) {
                warn!(
                    wave = %wave.id,
                    unit_type = %event.unit_type,
                    "skipping spawn event with unknown unit type"
                );
                events.push(GameEvent::Diagnostic(Diagnostic::UnknownUnitType {
                    wave_id: wave.id.clone(),
                    unit_type: event.unit_type.clone(),
                }));
                continue;
            }
            if event.count == 0 {
                continue;
            }
            progress.group = Some(SpawnGroup {
                unit_type: event.unit_type.clone(),
                remaining: event.count,
                interval: event.interval,
                timer: 0.0,
            });
        }

        if progress.group.is_none() && progress.next_event >= wave.events.len() {
            self.finish_wave(index, events);
        }
    }

    fn start_next_wave(&mut self, events: &mut Vec<GameEvent>) {
        let index = self.current.map_or(0, |i| i + 1);
        let Some(wave) = self.waves.get(index) else {
            self.phase = Phase::Exhausted;
            return;
        };
        info!(wave = %wave.id, number = index + 1, total = self.waves.len(), "wave started");
        events.push(GameEvent::WaveStarted {
            index,
            wave_id: wave.id.clone(),
        });
        self.current = Some(index);
        self.phase = Phase::Spawning(WaveProgress {
            clock: 0.0,
            next_event: 0,
            group: None,
        });
    }

    fn finish_wave(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::WaveDispatched { index });
        if index + 1 >= self.waves.len() {
            info!(dispatched = self.dispatched, "all waves dispatched");
            self.phase = Phase::Exhausted;
        } else {
            self.phase = Phase::Idle {
                since_last_wave: 0.0,
            };
        }
    }

    /// True once the last wave has been fully dispatched.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    /// Seconds until the next wave starts. `None` while a wave is dispatching
    /// or after the last one.
    pub fn time_until_next_wave(&self) -> Option<f32> {
        match &self.phase {
            Phase::Idle { .. } if self.current.is_none() => Some(0.0),
            Phase::Idle { since_last_wave } => {
                Some((self.inter_wave_delay - since_last_wave).max(0.0))
            }
            _ => None,
        }
    }

    pub fn phase(&self) -> SpawnerPhase {
        match self.phase {
            Phase::Idle { .. } => SpawnerPhase::Idle,
            Phase::Spawning(_) => SpawnerPhase::Spawning,
            Phase::Exhausted => SpawnerPhase::Exhausted,
        }
    }

    /// One-based number of the wave most recently started; 0 before the first.
    pub fn wave_number(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    /// Units handed out so far across all waves.
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    /// Whether a spawn group is currently dispatching.
    pub fn group_in_flight(&self) -> bool {
        matches!(&self.phase, Phase::Spawning(progress) if progress.group.is_some())
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(Vec::new(), INTER_WAVE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(unit_type: &str, count: u32, interval: f32, time_offset: f32) -> SpawnEventDef {
        SpawnEventDef {
            unit_type: unit_type.into(),
            count,
            interval,
            time_offset,
        }
    }

    fn roster() -> BTreeMap<String, UnitTypeDef> {
        let mut units = BTreeMap::new();
        for name in ["grunt", "runner"] {
            units.insert(
                name.to_string(),
                UnitTypeDef {
                    name: name.into(),
                    health: 10.0,
                    speed: 10.0,
                    reward: 1,
                    size: [20.0, 20.0],
                },
            );
        }
        units
    }

    /// Step with `dt` until the spawner finishes, recording (step, unit_type).
    fn run(spawner: &mut Spawner, dt: f32, max_steps: usize) -> (Vec<(usize, String)>, Vec<GameEvent>) {
        let units = roster();
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        for step in 0..max_steps {
            let mut batch = Vec::new();
            spawner.advance(dt, &units, &mut batch, &mut events);
            spawned.extend(batch.into_iter().map(|t| (step, t)));
            if spawner.is_finished() {
                break;
            }
        }
        (spawned, events)
    }

    #[test]
    fn first_wave_starts_immediately() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new("w1", vec![event("grunt", 1, 0.0, 0.0)])],
            10.0,
        );
        assert_eq!(spawner.phase(), SpawnerPhase::Idle);
        assert_eq!(spawner.time_until_next_wave(), Some(0.0));

        let mut spawns = Vec::new();
        let mut events = Vec::new();
        spawner.advance(0.1, &roster(), &mut spawns, &mut events);
        assert_eq!(spawner.phase(), SpawnerPhase::Spawning);
        assert_eq!(spawner.wave_number(), 1);
        assert!(matches!(events[0], GameEvent::WaveStarted { index: 0, .. }));
        assert_eq!(spawner.time_until_next_wave(), None);
    }

    #[test]
    fn dispatches_exact_count_with_interval() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new("w1", vec![event("grunt", 3, 1.0, 0.0)])],
            10.0,
        );
        let (spawned, _) = run(&mut spawner, 0.5, 100);
        assert_eq!(spawned.len(), 3);
        // Group opens on step 0, first spawn on step 1, then every 2 steps.
        let steps: Vec<usize> = spawned.iter().map(|(s, _)| *s).collect();
        assert_eq!(steps, vec![1, 3, 5]);
        assert!(spawner.is_finished());
        assert_eq!(spawner.dispatched(), 3);
    }

    #[test]
    fn overlapping_events_wait_for_current_group() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new(
                "w1",
                vec![event("runner", 2, 0.0, 0.0), event("grunt", 2, 1.0, 0.0)],
            )],
            10.0,
        );
        let units = roster();
        let mut all = Vec::new();
        let mut events = Vec::new();
        let mut max_per_step = 0;
        while !spawner.is_finished() {
            let mut batch = Vec::new();
            spawner.advance(0.25, &units, &mut batch, &mut events);
            max_per_step = max_per_step.max(batch.len());
            all.extend(batch);
        }
        assert_eq!(all, vec!["runner", "runner", "grunt", "grunt"]);
        assert_eq!(max_per_step, 1, "two groups dispatched concurrently");
    }

    #[test]
    fn events_sorted_by_time_offset() {
        let wave = ScheduledWave::new(
            "w",
            vec![event("grunt", 1, 0.0, 5.0), event("runner", 1, 0.0, 1.0)],
        );
        assert_eq!(wave.events[0].unit_type, "runner");
        assert_eq!(wave.total_units(), 2);
    }

    #[test]
    fn later_event_respects_time_offset() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new(
                "w1",
                vec![event("grunt", 1, 0.0, 0.0), event("runner", 1, 0.0, 2.0)],
            )],
            10.0,
        );
        let (spawned, _) = run(&mut spawner, 0.5, 100);
        assert_eq!(spawned[0], (1, "grunt".to_string()));
        // Wave clock reaches 2.0 on step 3; the runner spawns a step later.
        assert_eq!(spawned[1], (4, "runner".to_string()));
    }

    #[test]
    fn inter_wave_delay_between_waves() {
        let mut spawner = Spawner::new(
            vec![
                ScheduledWave::new("w1", vec![event("grunt", 1, 0.0, 0.0)]),
                ScheduledWave::new("w2", vec![event("grunt", 1, 0.0, 0.0)]),
            ],
            2.0,
        );
        let units = roster();
        let mut spawns = Vec::new();
        let mut events = Vec::new();

        spawner.advance(0.5, &units, &mut spawns, &mut events);
        spawner.advance(0.5, &units, &mut spawns, &mut events);
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawner.phase(), SpawnerPhase::Idle);
        assert_eq!(spawner.wave_number(), 1);
        assert_eq!(spawner.time_until_next_wave(), Some(2.0));

        spawner.advance(1.5, &units, &mut spawns, &mut events);
        assert_eq!(spawner.phase(), SpawnerPhase::Idle);
        assert_eq!(spawner.time_until_next_wave(), Some(0.5));

        spawner.advance(0.5, &units, &mut spawns, &mut events);
        assert_eq!(spawner.phase(), SpawnerPhase::Spawning);
        assert_eq!(spawner.wave_number(), 2);
    }

    #[test]
    fn unknown_unit_type_skipped_with_diagnostic() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new(
                "w1",
                vec![event("ghost", 4, 0.5, 0.0), event("grunt", 2, 0.5, 0.0)],
            )],
            10.0,
        );
        let (spawned, events) = run(&mut spawner, 0.5, 100);
        assert_eq!(spawned.len(), 2);
        assert!(spawned.iter().all(|(_, t)| t == "grunt"));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Diagnostic(Diagnostic::UnknownUnitType { unit_type, .. }) if unit_type == "ghost"
        )));
        assert!(spawner.is_finished());
    }

    #[test]
    fn zero_count_event_does_not_stall() {
        let mut spawner = Spawner::new(
            vec![ScheduledWave::new("w1", vec![event("grunt", 0, 1.0, 0.0)])],
            10.0,
        );
        let (spawned, _) = run(&mut spawner, 0.5, 10);
        assert!(spawned.is_empty());
        assert!(spawner.is_finished());
    }

    #[test]
    fn empty_schedule_is_exhausted() {
        let spawner = Spawner::new(Vec::new(), 10.0);
        assert!(spawner.is_finished());
        assert_eq!(spawner.time_until_next_wave(), None);
    }
}
