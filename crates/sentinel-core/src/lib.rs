//! Core types and definitions for the Sentinel defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, events, snapshot views, data definitions,
//! errors and constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod defs;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
