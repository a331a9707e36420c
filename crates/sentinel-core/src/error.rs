//! Error types for definition loading and command handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::enums::SessionState;
use crate::types::SlotId;

/// Fatal problems with level, wave, unit or defender definitions.
///
/// Any of these prevents a session from starting; a session is never built
/// from partially valid data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog defines no levels")]
    NoLevels,
    #[error("unknown level `{0}`")]
    UnknownLevel(String),
    #[error("level `{level}` references unknown path `{path}`")]
    UnknownPath { level: String, path: String },
    #[error("level `{level}` references unknown platform set `{platforms}`")]
    UnknownPlatforms { level: String, platforms: String },
    #[error("level `{level}` references unknown wave `{wave}`")]
    UnknownWave { level: String, wave: String },
    #[error("level `{0}` has an empty wave sequence")]
    EmptyWaveSequence(String),
    #[error("path `{path}` needs at least 2 waypoints, has {len}")]
    PathTooShort { path: String, len: usize },
    #[error("defender type `{defender}` upgrades to unknown type `{target}`")]
    UnknownUpgradeTarget { defender: String, target: String },
    #[error("{what}: {reason}")]
    Invalid { what: String, reason: String },
}

/// Reasons a player command was refused. Refusals never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("session is {0:?}, not active")]
    NotActive(SessionState),
    #[error("no defender type selected")]
    NoBuildTypeSelected,
    #[error("unknown defender type `{0}`")]
    UnknownDefenderType(String),
    #[error("slot {0} is occupied or does not exist")]
    SlotUnavailable(SlotId),
    #[error("no defender on slot {0}")]
    NoDefenderAt(SlotId),
    #[error("no placed defender selected")]
    NothingSelected,
    #[error("defender type `{0}` has no upgrade")]
    NoUpgrade(String),
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("cannot go from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
    #[error("no level after `{0}`")]
    NoFurtherLevels(String),
}
