//! Tournament status and game-type model

use serde::{Deserialize, Serialize};

/// Minimum participants for a tournament to be viable at start time.
/// Below this, a tournament that reaches its start time is cancelled;
/// at or above it, the contract (or an admin) starts it.
pub const MIN_PLAYERS: u32 = 2;

/// Tournament lifecycle state as encoded by the contract (0..=3)
///
/// The chain is the authoritative source; the keeper never mutates this
/// locally, it only requests transitions via write calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    Registration,
    InProgress,
    Completed,
    Canceled,
}

impl TournamentStatus {
    /// Decode the on-chain status byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TournamentStatus::Registration),
            1 => Some(TournamentStatus::InProgress),
            2 => Some(TournamentStatus::Completed),
            3 => Some(TournamentStatus::Canceled),
            _ => None,
        }
    }

    /// A terminal tournament never needs another action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Canceled)
    }
}

/// Game type, parsed from the free-form on-chain string
///
/// Open set: unrecognized names land in `Other` and score like `Default`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    Default,
    FreeToPlay,
    PayToWin,
    Other(String),
}

impl GameType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Default" => GameType::Default,
            "Free to play" => GameType::FreeToPlay,
            "P2W" => GameType::PayToWin,
            other => GameType::Other(other.to_string()),
        }
    }
}
