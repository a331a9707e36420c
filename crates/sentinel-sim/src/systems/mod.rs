//! Per-tick systems.
//!
//! Systems are plain functions over the session's collections. They do not
//! own state; the session passes in exactly what each one touches, in the
//! order fixed by [`Session::tick`](crate::session::Session::tick).

pub mod combat;
pub mod defenders;
pub mod movement;
pub mod snapshot;
pub mod spawning;
