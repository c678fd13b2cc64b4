//! Startup configuration
//!
//! Everything is externally supplied, either as a CLI flag or the matching
//! environment variable. Validation runs once at startup; any problem is a
//! fatal `Config` error that prevents the scheduler and server from
//! starting.

use clap::Parser;
use ethers::signers::LocalWallet;
use ethers::types::Address;

use crate::error::{KeeperError, Result};

/// Default reconciliation interval: 5 minutes
pub const DEFAULT_INTERVAL_MS: u64 = 5 * 60 * 1000;

#[derive(Parser, Debug, Clone)]
#[command(name = "tournament-keeper", version, about = "Tournament lifecycle keeper and admin API")]
pub struct KeeperConfig {
    /// JSON-RPC endpoint of the target chain
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Hex-encoded signing key for the keeper account
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Chain id used for transaction signing (31337 = local hardhat)
    #[arg(long, env = "CHAIN_ID", default_value_t = 31337)]
    pub chain_id: u64,

    /// Address of the deployed tournament platform contract
    #[arg(long, env = "CONTRACT_ADDRESS")]
    pub contract_address: String,

    /// Reconciliation interval in milliseconds
    #[arg(long, env = "SCHEDULER_INTERVAL_MS", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Shared secret for the admin HTTP endpoints
    #[arg(long, env = "ADMIN_KEY", hide_env_values = true)]
    pub admin_key: String,

    /// Bind address for the admin HTTP server
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3001")]
    pub bind_addr: String,
}

impl KeeperConfig {
    /// Check the fields the chain client does not already parse.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(KeeperError::Config("RPC_URL must not be empty".into()));
        }
        if self.admin_key.trim().is_empty() {
            return Err(KeeperError::Config("ADMIN_KEY must not be empty".into()));
        }
        if self.interval_ms == 0 {
            return Err(KeeperError::Config(
                "SCHEDULER_INTERVAL_MS must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Parse the configured contract address.
    pub fn parsed_contract_address(&self) -> Result<Address> {
        self.contract_address.parse().map_err(|_| {
            KeeperError::Config(format!(
                "invalid contract address: {}",
                self.contract_address
            ))
        })
    }

    /// Parse the signing key into a wallet bound to the configured chain.
    pub fn parsed_wallet(&self) -> Result<LocalWallet> {
        use ethers::signers::Signer;

        let key = self.private_key.trim_start_matches("0x");
        let wallet: LocalWallet = key
            .parse()
            .map_err(|_| KeeperError::Config("invalid signing key".into()))?;
        Ok(wallet.with_chain_id(self.chain_id))
    }
}
