use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use epoch_drops_common::WorkItem;

use crate::policy::MintPolicy;
use crate::state::{MintReceipt, MinterConfig};

#[cw_serde]
pub struct InstantiateMsg {
    pub beacon: String,
    pub work_source: String,
    pub symbol: String,
    /// Defaults to 4 leading hex zeros and the halving schedule
    pub policy: Option<MintPolicy>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Mint rewards for destroyed work items. Work source only.
    Mint {
        owner: String,
        items: Vec<WorkItem>,
    },
    /// Update configuration. Admin only.
    UpdateConfig {
        beacon: Option<String>,
        work_source: Option<String>,
        policy: Option<MintPolicy>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(MinterConfig)]
    Config {},
    #[returns(SupplyResponse)]
    Supply {},
    #[returns(Uint128)]
    Balance { address: String },
    #[returns(Option<MintReceipt>)]
    Receipt { id: u64 },
    #[returns(ReceiptsResponse)]
    Receipts {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Per-item reward at a given supply under the active schedule.
    #[returns(Uint128)]
    RewardFor { supply: Uint128 },
    /// Epoch height an item was minted under, if any.
    #[returns(Option<u64>)]
    ItemMinted { id: u64 },
}

#[cw_serde]
pub struct SupplyResponse {
    pub symbol: String,
    pub supply: Uint128,
    pub max_supply: Uint128,
}

#[cw_serde]
pub struct ReceiptsResponse {
    pub receipts: Vec<MintReceipt>,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Parameters for update_config.
pub struct UpdateConfigParams {
    pub beacon: Option<String>,
    pub work_source: Option<String>,
    pub policy: Option<MintPolicy>,
}
