//! Chain client
//!
//! Wraps the JSON-RPC connection and the keeper's signing wallet behind the
//! `TournamentChain` trait. All writes in the process funnel through the one
//! `EthersChain` value built at startup (one signing account, one nonce
//! sequence), which is why the reconciliation loop can stay strictly
//! sequential instead of juggling nonce contention.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{parse_abi, Detokenize, Tokenize};
use ethers::contract::{Contract, ContractCall, EthAbiType};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, TxHash, U256};
use ethers::utils::format_ether;

use lifecycle_logic::{classify, Action, GameType, TournamentStatus};

use crate::config::KeeperConfig;
use crate::error::{KeeperError, Result};

/// The slice of the tournament platform contract the keeper talks to.
/// Reads use `view` calls; writes are signed transactions awaited to a
/// receipt.
const TOURNAMENT_ABI: &[&str] = &[
    "function getAllTournaments() view returns ((uint256,string,uint256,uint256,uint256,uint256,uint256,address[],string,uint8,uint256)[])",
    "function getTournamentDetails(uint256) view returns ((uint256,string,uint256,uint256,uint256,uint256,uint256,address[],string,uint8,uint256))",
    "function submitScore(uint256,address,uint256)",
    "function finalizeTournament(uint256)",
    "function cancelTournament(uint256)",
    "function getTournamentWinners(uint256) view returns (address[])",
    "function getPlayerScore(uint256,address) view returns (uint256)",
];

/// Tournament struct exactly as the contract returns it
#[derive(Clone, Debug, EthAbiType)]
pub struct RawTournament {
    pub id: U256,
    pub name: String,
    pub entry_fee: U256,
    pub start_time: U256,
    pub end_time: U256,
    pub max_players: U256,
    pub current_players: U256,
    pub players: Vec<Address>,
    pub game_type: String,
    pub status: U256,
    pub total_prize_pool: U256,
}

/// Point-in-time view of one tournament
///
/// Fetched fresh each pass and never cached across ticks; every decision is
/// re-derived from a new snapshot plus the wall clock.
#[derive(Clone, Debug, PartialEq)]
pub struct TournamentSnapshot {
    pub id: u64,
    pub name: String,
    pub status: TournamentStatus,
    pub start_time: u64,
    pub end_time: u64,
    pub current_players: u32,
    pub max_players: u32,
    pub players: Vec<Address>,
    pub game_type: GameType,
    /// Entry fee in wei
    pub entry_fee: U256,
    /// Escrowed prize pool in wei; read-only to the keeper
    pub prize_pool: U256,
}

impl TournamentSnapshot {
    /// Which action this tournament needs at `now` (Unix seconds).
    pub fn classify(&self, now: u64) -> Action {
        classify(
            self.status,
            self.start_time,
            self.end_time,
            self.current_players,
            now,
        )
    }

    /// Prize pool in whole ether, for reporting only.
    pub fn prize_pool_display(&self) -> f64 {
        format_ether(self.prize_pool).parse().unwrap_or(0.0)
    }
}

impl TryFrom<RawTournament> for TournamentSnapshot {
    type Error = KeeperError;

    fn try_from(raw: RawTournament) -> Result<Self> {
        let status_byte = raw.status.low_u64() as u8;
        let status = TournamentStatus::from_u8(status_byte).ok_or_else(|| {
            KeeperError::ChainRead(format!(
                "tournament {}: unknown status byte {}",
                raw.id, status_byte
            ))
        })?;

        Ok(Self {
            id: raw.id.low_u64(),
            name: raw.name,
            status,
            start_time: raw.start_time.low_u64(),
            end_time: raw.end_time.low_u64(),
            current_players: raw.current_players.low_u64() as u32,
            max_players: raw.max_players.low_u64() as u32,
            players: raw.players,
            game_type: GameType::from_name(&raw.game_type),
            entry_fee: raw.entry_fee,
            prize_pool: raw.total_prize_pool,
        })
    }
}

/// Everything the keeper needs from the contract, abstracted for testing.
#[async_trait]
pub trait TournamentChain: Send + Sync {
    async fn fetch_all_tournaments(&self) -> Result<Vec<TournamentSnapshot>>;
    async fn fetch_tournament(&self, id: u64) -> Result<TournamentSnapshot>;
    async fn submit_score(&self, id: u64, player: Address, score: u64) -> Result<TxHash>;
    async fn finalize_tournament(&self, id: u64) -> Result<TxHash>;
    async fn cancel_tournament(&self, id: u64) -> Result<TxHash>;
    async fn tournament_winners(&self, id: u64) -> Result<Vec<Address>>;
    async fn player_score(&self, id: u64, player: Address) -> Result<u64>;
}

type ChainMiddleware = SignerMiddleware<Provider<Http>, LocalWallet>;

/// JSON-RPC implementation of [`TournamentChain`]
pub struct EthersChain {
    contract: Contract<ChainMiddleware>,
}

impl EthersChain {
    /// Build the provider, wallet and contract handle from validated
    /// configuration. Does not touch the network.
    pub fn connect(config: &KeeperConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|err| KeeperError::Config(format!("invalid RPC URL: {err}")))?;
        let wallet = config.parsed_wallet()?;
        let address = config.parsed_contract_address()?;
        let abi = parse_abi(TOURNAMENT_ABI)
            .map_err(|err| KeeperError::Config(format!("bad contract ABI: {err}")))?;

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self {
            contract: Contract::new(address, abi, client),
        })
    }

    fn read_call<D: Detokenize>(
        &self,
        name: &str,
        args: impl Tokenize,
    ) -> Result<ContractCall<ChainMiddleware, D>> {
        self.contract
            .method(name, args)
            .map_err(|err| KeeperError::ChainRead(format!("{name}: {err}")))
    }

    fn write_call(
        &self,
        name: &str,
        args: impl Tokenize,
    ) -> Result<ContractCall<ChainMiddleware, ()>> {
        self.contract
            .method(name, args)
            .map_err(|err| KeeperError::ChainWrite(format!("{name}: {err}")))
    }

    /// Submit a transaction and wait for its receipt.
    async fn send_write(&self, name: &str, call: ContractCall<ChainMiddleware, ()>) -> Result<TxHash> {
        let pending = call
            .send()
            .await
            .map_err(|err| KeeperError::ChainWrite(format!("{name}: {err}")))?;
        let receipt = pending
            .await
            .map_err(|err| KeeperError::ChainWrite(format!("{name}: {err}")))?
            .ok_or_else(|| {
                KeeperError::ChainWrite(format!("{name}: transaction dropped before confirmation"))
            })?;
        Ok(receipt.transaction_hash)
    }
}

#[async_trait]
impl TournamentChain for EthersChain {
    async fn fetch_all_tournaments(&self) -> Result<Vec<TournamentSnapshot>> {
        let raw: Vec<RawTournament> = self
            .read_call("getAllTournaments", ())?
            .call()
            .await
            .map_err(|err| KeeperError::ChainRead(format!("getAllTournaments: {err}")))?;

        raw.into_iter().map(TournamentSnapshot::try_from).collect()
    }

    async fn fetch_tournament(&self, id: u64) -> Result<TournamentSnapshot> {
        let raw: RawTournament = self
            .read_call("getTournamentDetails", U256::from(id))?
            .call()
            .await
            .map_err(|err| KeeperError::ChainRead(format!("getTournamentDetails: {err}")))?;

        raw.try_into()
    }

    async fn submit_score(&self, id: u64, player: Address, score: u64) -> Result<TxHash> {
        let call = self.write_call("submitScore", (U256::from(id), player, U256::from(score)))?;
        self.send_write("submitScore", call).await
    }

    async fn finalize_tournament(&self, id: u64) -> Result<TxHash> {
        let call = self.write_call("finalizeTournament", U256::from(id))?;
        self.send_write("finalizeTournament", call).await
    }

    async fn cancel_tournament(&self, id: u64) -> Result<TxHash> {
        let call = self.write_call("cancelTournament", U256::from(id))?;
        self.send_write("cancelTournament", call).await
    }

    async fn tournament_winners(&self, id: u64) -> Result<Vec<Address>> {
        self.read_call("getTournamentWinners", U256::from(id))?
            .call()
            .await
            .map_err(|err| KeeperError::ChainRead(format!("getTournamentWinners: {err}")))
    }

    async fn player_score(&self, id: u64, player: Address) -> Result<u64> {
        let score: U256 = self
            .read_call("getPlayerScore", (U256::from(id), player))?
            .call()
            .await
            .map_err(|err| KeeperError::ChainRead(format!("getPlayerScore: {err}")))?;
        Ok(score.low_u64())
    }
}
