use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("waiting for epoch {height} to be finalized by the oracles")]
    SeedNotReady { height: u64 },

    #[error("work item {item_id} was not created ({created}) before the start ({valid_before}) of the epoch after {height}")]
    TooRecent {
        item_id: u64,
        created: u64,
        valid_before: u64,
        height: u64,
    },

    #[error("hash {digest} for work item {item_id} does not meet difficulty {required} ({zeros})")]
    DifficultyNotMet {
        item_id: u64,
        digest: String,
        zeros: u16,
        required: u16,
    },

    #[error("work item {item_id} was already minted")]
    DuplicateItem { item_id: u64 },

    #[error("mint batch contains no work items")]
    EmptyBatch,

    #[error("invalid mint policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("beacon returned an unreadable seed for epoch {height}")]
    InvalidSeed { height: u64 },
}
