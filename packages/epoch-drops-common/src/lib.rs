pub mod epoch;
pub mod hashing;
pub mod types;

pub use epoch::{derive_height, epoch_start};
pub use hashing::{
    clz_binary, clz_hex, commitment, hash, hash_item, hash_items, hex_to_str, str_to_hash,
};
pub use types::{BeaconConfigResponse, BeaconQueryMsg, EpochResponse, WorkItem};
