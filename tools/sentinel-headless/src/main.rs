//! sentinel-headless: run a session without a renderer.
//!
//! A seeded bot places and upgrades defenders at a fixed cadence while the
//! session steps at a fixed dt. Useful for balance checks and for replaying
//! a seed to reproduce a run.
//!
//! Usage:
//!   sentinel-headless --seed 7
//!   sentinel-headless --catalog levels.json --level level2 --campaign --json

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use sentinel_core::commands::PlayerCommand;
use sentinel_core::components::DefenderStats;
use sentinel_core::constants::NOMINAL_DT;
use sentinel_core::defs::Catalog;
use sentinel_core::enums::SessionState;
use sentinel_core::error::CommandError;
use sentinel_core::state::SessionSnapshot;
use sentinel_sim::{Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "sentinel-headless")]
#[command(about = "Run a tower-defense session headless with a seeded bot")]
struct Args {
    /// Catalog JSON file. Uses the built-in catalog when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Level to start at. Defaults to the first level of the campaign.
    #[arg(long)]
    level: Option<String>,

    /// Bot RNG seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Fixed step in seconds
    #[arg(long, default_value_t = NOMINAL_DT)]
    dt: f32,

    /// Simulated seconds before giving up on a level
    #[arg(long, default_value = "600")]
    max_secs: f64,

    /// Seconds between bot decisions
    #[arg(long, default_value = "1.0")]
    decide_every: f32,

    /// Keep playing through the campaign after each victory
    #[arg(long)]
    campaign: bool,

    /// Print the final snapshot of each level as JSON
    #[arg(long)]
    json: bool,
}

/// Seeded player: builds on a random free slot when it can afford to, and
/// otherwise sometimes upgrades a random placed defender.
struct Bot {
    rng: ChaCha8Rng,
    interval: f32,
    until_next: f32,
}

impl Bot {
    fn new(seed: u64, interval: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            interval: interval.max(NOMINAL_DT),
            until_next: 0.0,
        }
    }

    fn update(&mut self, session: &Session, dt: f32) -> Vec<PlayerCommand> {
        self.until_next -= dt;
        if self.until_next > 0.0 || session.state() != SessionState::Active {
            return Vec::new();
        }
        self.until_next = self.interval;

        if let Some(commands) = self.try_build(session) {
            return commands;
        }
        if self.rng.gen_bool(0.5) {
            if let Some(commands) = self.try_upgrade(session) {
                return commands;
            }
        }
        Vec::new()
    }

    fn try_build(&mut self, session: &Session) -> Option<Vec<PlayerCommand>> {
        let slot = session.grid().free_slots().choose(&mut self.rng)?;
        let economy = session.economy();
        let defender_type = session
            .catalog()
            .defenders
            .iter()
            .filter(|(_, def)| economy.can_afford(def.cost))
            .map(|(id, _)| id.clone())
            .choose(&mut self.rng)?;
        debug!(%slot, %defender_type, "bot building");
        Some(vec![
            PlayerCommand::SelectBuildType { defender_type },
            PlayerCommand::PlaceDefender { slot },
        ])
    }

    fn try_upgrade(&mut self, session: &Session) -> Option<Vec<PlayerCommand>> {
        let economy = session.economy();
        let slot = session
            .grid()
            .occupied()
            .filter(|&(_, entity)| {
                session
                    .defenders()
                    .get::<&DefenderStats>(entity)
                    .ok()
                    .and_then(|stats| stats.upgrade.as_ref().map(|upgrade| upgrade.cost))
                    .is_some_and(|cost| cost > 0 && economy.can_afford(cost))
            })
            .map(|(slot, _)| slot)
            .choose(&mut self.rng)?;
        debug!(%slot, "bot upgrading");
        Some(vec![
            PlayerCommand::SelectPlacedDefender { slot },
            PlayerCommand::AttemptUpgrade,
            PlayerCommand::Deselect,
        ])
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if !(args.dt.is_finite() && args.dt > 0.0) {
        error!(dt = args.dt, "dt must be a positive number of seconds");
        process::exit(1);
    }

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "failed to load catalog");
            process::exit(1);
        }
    };

    let config = SessionConfig::default();
    let session = match &args.level {
        Some(level) => Session::with_level(catalog, config, level),
        None => Session::new(catalog, config),
    };
    let mut session = match session {
        Ok(session) => session,
        Err(err) => {
            error!(%err, "failed to start session");
            process::exit(1);
        }
    };

    let mut bot = Bot::new(args.seed, args.decide_every);
    let mut defeated = false;

    loop {
        let snapshot = run_level(&mut session, &mut bot, &args);
        report(&snapshot, args.json);

        match snapshot.state {
            SessionState::Victorious if args.campaign => match session.advance_level() {
                Ok(()) => continue,
                Err(CommandError::NoFurtherLevels(last)) => {
                    info!(level = %last, "campaign complete");
                    break;
                }
                Err(err) => {
                    error!(%err, "could not advance");
                    break;
                }
            },
            SessionState::Defeated => {
                defeated = true;
                break;
            }
            _ => break,
        }
    }

    if defeated {
        process::exit(2);
    }
}

/// Step one level until it ends or runs out of time.
fn run_level(session: &mut Session, bot: &mut Bot, args: &Args) -> SessionSnapshot {
    let level = session.level_id().to_string();
    info!(%level, seed = args.seed, dt = args.dt, "running level");

    loop {
        let commands = bot.update(session, args.dt);
        session.queue_commands(commands);
        let snapshot = session.tick(args.dt);

        if snapshot.state.is_terminal() {
            return snapshot;
        }
        if snapshot.time.elapsed_secs >= args.max_secs {
            info!(%level, secs = args.max_secs, "time limit reached");
            return snapshot;
        }
    }
}

fn report(snapshot: &SessionSnapshot, json: bool) {
    let stats = snapshot.stats;
    info!(
        level = %snapshot.level_id,
        state = ?snapshot.state,
        secs = %format!("{:.1}", snapshot.time.elapsed_secs),
        waves = %format!("{}/{}", snapshot.wave.current, snapshot.wave.total),
        objective = snapshot.objective.health,
        balance = snapshot.balance,
        defenders = snapshot.defenders.len(),
        spawned = stats.units_spawned,
        killed = stats.units_killed,
        leaked = stats.units_leaked,
        fired = stats.projectiles_fired,
        "level finished"
    );
    if json {
        match serde_json::to_string_pretty(snapshot) {
            Ok(text) => println!("{text}"),
            Err(err) => error!(%err, "failed to serialize snapshot"),
        }
    }
}
