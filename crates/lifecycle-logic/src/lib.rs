//! Lifecycle logic for the tournament keeper
//!
//! Pure decision and arithmetic layer, kept free of chain types and I/O:
//! - status / game-type model for on-chain tournaments
//! - the lifecycle classifier (which action a tournament needs right now)
//! - deterministic score generation for simulated gameplay
//! - prize-split percentages for post-finalize reporting

mod random;
mod status;
mod classify;
mod scoring;
mod payout;

pub use random::ScoreRng;
pub use status::{GameType, TournamentStatus, MIN_PLAYERS};
pub use classify::{classify, Action};
pub use scoring::{generate_score, BASE_SCORE_MIN, BASE_SCORE_SPAN, FREE_TO_PLAY_CAP};
pub use payout::{prize_breakdown, winner_percents, PrizeShare};
