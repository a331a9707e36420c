//! Headless simulation for the Sentinel defense game.
//!
//! Owns the defender ECS world and the unit/projectile pools, runs the
//! per-tick systems in a fixed order, and produces `SessionSnapshot`s for
//! whatever presentation layer sits on top.

pub mod economy;
pub mod level;
pub mod objective;
pub mod path;
pub mod placement;
pub mod pool;
pub mod projectile;
pub mod session;
pub mod spawner;
pub mod systems;
pub mod unit;

pub use sentinel_core as core;
pub use session::{Session, SessionConfig};
