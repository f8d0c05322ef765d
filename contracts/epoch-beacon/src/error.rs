use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("epoch beacon is disabled")]
    Disabled,

    #[error("{oracle} is not a registered oracle")]
    UnknownOracle { oracle: String },

    #[error("wrong epoch height: expected {expected}, got {got}")]
    WrongHeight { expected: u64, got: u64 },

    #[error("oracle {oracle} already committed for epoch {height}")]
    DuplicateCommit { height: u64, oracle: String },

    #[error("oracle {oracle} has no commit for epoch {height}")]
    NoCommit { height: u64, oracle: String },

    #[error("reveal from {oracle} for epoch {height} does not match commit: expected {expected}, got {actual}")]
    HashMismatch {
        height: u64,
        oracle: String,
        expected: String,
        actual: String,
    },

    #[error("oracle {oracle} already revealed for epoch {height}")]
    DuplicateReveal { height: u64, oracle: String },

    #[error("epoch {height} is still current (current height {current})")]
    TooEarly { height: u64, current: u64 },

    #[error("epoch {height} is missing reveals from: {missing}")]
    IncompleteReveals { height: u64, missing: String },

    #[error("epoch {height} not found")]
    EpochNotFound { height: u64 },

    #[error("epoch {height} is already finalized")]
    EpochFinalized { height: u64 },

    #[error("epoch {height} is still open")]
    EpochOpen { height: u64 },

    #[error("epoch {height} has no missing reveals to force")]
    NothingToForce { height: u64 },

    #[error("reveals do not match the snapshot of epoch {height}: {reason}")]
    RevealSetMismatch { height: u64, reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid commit length: expected 32 bytes, got {got}")]
    InvalidCommitLength { got: usize },

    #[error("force reveal salt must not be empty")]
    EmptySalt,

    #[error("epoch duration must be greater than zero")]
    InvalidDuration,

    #[error("epoch duration can only change while the beacon is disabled")]
    DurationChangeWhileEnabled,

    #[error("oracle {oracle} is already registered")]
    OracleAlreadyRegistered { oracle: String },

    #[error("oracle {oracle} is not registered")]
    OracleNotRegistered { oracle: String },

    #[error("oracle registry is full ({max} oracles)")]
    TooManyOracles { max: usize },
}
