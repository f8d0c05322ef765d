use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use crate::policy::MintPolicy;

pub const CONFIG: Item<MinterConfig> = Item::new("config");
pub const SUPPLY: Item<Uint128> = Item::new("supply");
pub const BALANCES: Map<&Addr, Uint128> = Map::new("balances");
/// Work item id -> epoch height whose seed it was minted under
pub const MINTED_ITEMS: Map<u64, u64> = Map::new("minted_items");
pub const RECEIPTS: Map<u64, MintReceipt> = Map::new("receipts");
pub const NEXT_RECEIPT_ID: Item<u64> = Item::new("next_receipt_id");

#[cw_serde]
pub struct MinterConfig {
    pub admin: Addr,
    /// Epoch beacon contract providing finalized seeds
    pub beacon: Addr,
    /// Contract that destroys work items and submits them for minting
    pub work_source: Addr,
    pub symbol: String,
    pub policy: MintPolicy,
}

#[cw_serde]
pub struct AcceptedItem {
    pub id: u64,
    /// sha256(hex(seed) || id), hex-encoded
    pub digest: String,
    pub reward: Uint128,
}

#[cw_serde]
pub struct RejectedItem {
    pub id: u64,
    pub digest: String,
    pub reason: String,
}

/// Audit record of one mint batch. Anyone can recompute every digest from
/// the seed and the item ids.
#[cw_serde]
pub struct MintReceipt {
    pub id: u64,
    pub owner: Addr,
    pub amount: Uint128,
    pub epoch_height: u64,
    /// Hex-encoded seed of `epoch_height`
    pub seed: String,
    /// sha256(hex(seed) || accepted ids), hex-encoded
    pub batch_digest: String,
    pub accepted: Vec<AcceptedItem>,
    pub rejected: Vec<RejectedItem>,
    pub minted_at: Timestamp,
}
