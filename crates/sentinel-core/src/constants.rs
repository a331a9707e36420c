//! Simulation constants and tuning parameters.

/// Nominal host frame rate (Hz). The simulation is variable-step; this
/// is only the step the headless runner uses by default.
pub const NOMINAL_TICK_RATE: u32 = 60;

/// Seconds per nominal frame.
pub const NOMINAL_DT: f32 = 1.0 / NOMINAL_TICK_RATE as f32;

/// Largest step a single tick integrates. Longer host stalls are clamped.
pub const MAX_FRAME_DT: f32 = 0.1;

// --- Arena ---

/// Arena width in world units. Projectiles leaving the arena expire.
pub const ARENA_WIDTH: f32 = 1280.0;

/// Arena height in world units.
pub const ARENA_HEIGHT: f32 = 720.0;

// --- Economy ---

/// Starting balance when a level does not specify one.
pub const DEFAULT_STARTING_CURRENCY: u32 = 200;

/// Currency credited per whole elapsed second of active play.
pub const PASSIVE_INCOME_RATE: u32 = 2;

// --- Objective ---

/// Objective health when a level does not specify one.
pub const DEFAULT_OBJECTIVE_HEALTH: f32 = 10.0;

/// Damage dealt to the objective by each unit that completes the path.
pub const OBJECTIVE_DAMAGE_PER_UNIT: f32 = 1.0;

// --- Waves ---

/// Pause between the end of one wave's dispatch and the start of the next (seconds).
pub const INTER_WAVE_DELAY: f32 = 10.0;

// --- Units ---

/// Collision footprint `[width, height]` for unit types that omit one.
pub const DEFAULT_UNIT_SIZE: [f32; 2] = [20.0, 20.0];

// --- Defenders ---

/// Projectile travel speed (units/s) when a defender type omits one.
pub const DEFAULT_PROJECTILE_SPEED: f32 = 300.0;

/// Projectile diameter when a defender type omits one.
pub const DEFAULT_PROJECTILE_SIZE: f32 = 5.0;

/// Projectile damage when a defender type omits one.
pub const DEFAULT_PROJECTILE_DAMAGE: f32 = 10.0;

/// Speed multiplier applied by a slow pulse when a defender type omits one.
pub const DEFAULT_SLOW_FACTOR: f32 = 0.5;

/// Duration of a slow effect (seconds) when a defender type omits one.
pub const DEFAULT_SLOW_DURATION: f32 = 2.0;

/// Seconds a projectile lives before expiring unspent.
pub const PROJECTILE_LIFETIME: f32 = 5.0;

/// Side length of a square placement platform, used for hit-testing.
pub const PLATFORM_SIZE: f32 = 50.0;
