use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use epoch_drops_common::EpochResponse;

pub const CONFIG: Item<BeaconConfig> = Item::new("config");
/// Registered oracles, ordered by address
pub const ORACLES: Map<&Addr, ()> = Map::new("oracles");
pub const EPOCHS: Map<u64, Epoch> = Map::new("epochs");
/// Height of the single epoch that has not been finalized yet
pub const OPEN_HEIGHT: Item<u64> = Item::new("open_height");
pub const COMMITS: Map<(u64, &Addr), Commit> = Map::new("commits");
pub const REVEALS: Map<(u64, &Addr), Reveal> = Map::new("reveals");

/// Upper bound on the registry size, which bounds every per-epoch loop.
pub const MAX_ORACLES: usize = 32;
/// Rows removed per table by a single cleanup sweep.
pub const PURGE_BATCH_LIMIT: u32 = 64;

/// One day.
pub const DEFAULT_EPOCH_DURATION: u64 = 86_400;

#[cw_serde]
pub struct BeaconConfig {
    pub admin: Addr,
    pub genesis_time: Timestamp,
    /// Epoch length in seconds
    pub epoch_duration: u64,
    pub enabled: bool,
}

#[cw_serde]
pub struct Epoch {
    pub height: u64,
    /// Registry content at the time the epoch was opened
    pub oracles: Vec<Addr>,
    /// sha256 over the ordered reveals, hex-encoded. Written once.
    pub seed: Option<String>,
    pub opened_at: Timestamp,
    pub finalized_at: Option<Timestamp>,
}

#[cw_serde]
pub struct Commit {
    /// sha256(reveal), hex-encoded
    pub commit: String,
    pub committed_at: Timestamp,
}

#[cw_serde]
pub struct Reveal {
    pub reveal: String,
    /// Substituted by a force reveal rather than submitted by the oracle
    pub forced: bool,
    pub revealed_at: Timestamp,
}

pub fn active_oracles(storage: &dyn Storage) -> StdResult<Vec<Addr>> {
    ORACLES
        .keys(storage, None, None, Order::Ascending)
        .collect()
}

impl Epoch {
    pub fn is_finalized(&self) -> bool {
        self.seed.is_some()
    }

    pub fn to_response(&self) -> EpochResponse {
        EpochResponse {
            height: self.height,
            oracles: self.oracles.clone(),
            seed: self.seed.clone(),
            finalized: self.is_finalized(),
        }
    }
}
