//! Keeper error taxonomy
//!
//! Only two failures are allowed to abort a whole reconciliation pass: a
//! failed tournament listing (`ChainRead`) and bad startup configuration
//! (`Config`). Everything else is scoped to one tournament and surfaces as
//! a logged, counted error. Benign precondition races are not errors at
//! all; they are the `Skipped` executor outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeeperError {
    /// RPC or ABI failure on a read call
    #[error("chain read failed: {0}")]
    ChainRead(String),

    /// A submitted transaction reverted, was dropped, or failed to confirm
    #[error("chain write failed: {0}")]
    ChainWrite(String),

    /// Missing or invalid startup configuration; fatal, the scheduler
    /// never starts
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KeeperError>;
