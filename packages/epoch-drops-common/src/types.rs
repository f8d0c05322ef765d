use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};

/// The beacon queries other contracts rely on.
/// Serializes identically to the matching variants of the beacon's own `QueryMsg`.
#[cw_serde]
pub enum BeaconQueryMsg {
    Config {},
    Epoch { height: u64 },
}

#[cw_serde]
pub struct BeaconConfigResponse {
    pub admin: Addr,
    pub genesis_time: Timestamp,
    /// Epoch length in seconds
    pub epoch_duration: u64,
    pub enabled: bool,
}

/// Public view of an epoch record.
#[cw_serde]
pub struct EpochResponse {
    pub height: u64,
    /// Oracles eligible for this epoch, fixed when it was opened
    pub oracles: Vec<Addr>,
    /// Hex-encoded seed, set once the epoch is finalized
    pub seed: Option<String>,
    pub finalized: bool,
}

/// A unit of work submitted for minting.
#[cw_serde]
pub struct WorkItem {
    pub id: u64,
    pub created: Timestamp,
}
