use cosmwasm_std::Timestamp;

/// Height of the epoch that contains `now`.
///
/// `height = floor((now - genesis) / duration) + 1`. Times before genesis
/// belong to height 1, and a zero duration never rolls over.
pub fn derive_height(genesis: Timestamp, duration: u64, now: Timestamp) -> u64 {
    let elapsed = now.seconds().saturating_sub(genesis.seconds());
    elapsed.checked_div(duration).unwrap_or_default() + 1
}

/// Wall-clock time at which `height` opens: `genesis + (height - 1) * duration`.
pub fn epoch_start(genesis: Timestamp, duration: u64, height: u64) -> Timestamp {
    let offset = height.saturating_sub(1).saturating_mul(duration);
    Timestamp::from_seconds(genesis.seconds().saturating_add(offset))
}
