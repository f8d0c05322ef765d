use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use epoch_drops_common::EpochResponse;

use crate::state::{BeaconConfig, Commit, Reveal};

#[cw_serde]
pub struct InstantiateMsg {
    /// Initial oracle registry; epoch 1 is opened with this snapshot
    pub oracles: Vec<String>,
    /// Epoch length in seconds (defaults to one day)
    pub epoch_duration: Option<u64>,
    /// Unix seconds; defaults to the instantiation block time
    pub genesis_time: Option<u64>,
    pub enabled: Option<bool>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Commit to a value for the current epoch. Oracles only.
    Commit {
        height: u64,
        /// sha256(reveal), hex-encoded
        commit: String,
    },
    /// Reveal the pre-image of an earlier commit. Oracles only.
    Reveal { height: u64, reveal: String },
    /// Substitute salted contributions for oracles that never revealed.
    /// Admin or any oracle of the epoch, once the epoch is no longer current.
    ForceReveal { height: u64, salt: String },
    /// Finalize the open epoch and open the next one. Anyone can call.
    Advance {},
    /// Remove leftover commit/reveal rows of a finalized epoch. Anyone can call.
    PurgeEpoch { height: u64, limit: Option<u32> },
    /// Admin only.
    AddOracle { oracle: String },
    /// Admin only.
    RemoveOracle { oracle: String },
    /// Admin only.
    Enable { enabled: bool },
    /// Admin only, while disabled.
    SetDuration { duration: u64 },
}

#[cw_serde]
pub struct OracleReveal {
    pub oracle: String,
    pub reveal: String,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BeaconConfig)]
    Config {},

    #[returns(u64)]
    CurrentHeight {},

    #[returns(Vec<Addr>)]
    Oracles {},

    #[returns(Vec<Addr>)]
    OracleSnapshot { height: u64 },

    #[returns(Option<EpochResponse>)]
    Epoch { height: u64 },

    #[returns(EpochResponse)]
    OpenEpoch {},

    #[returns(EpochsResponse)]
    Epochs {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(Option<Commit>)]
    Commit { height: u64, oracle: String },

    #[returns(Option<Reveal>)]
    Reveal { height: u64, oracle: String },

    /// Recompute the seed of an epoch from public reveals.
    #[returns(String)]
    ComputeHash {
        height: u64,
        reveals: Vec<OracleReveal>,
    },
}

#[cw_serde]
pub struct EpochsResponse {
    pub epochs: Vec<EpochResponse>,
}

#[cw_serde]
pub struct MigrateMsg {}
