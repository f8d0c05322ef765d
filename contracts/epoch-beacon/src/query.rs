use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use epoch_drops_common::{derive_height, hex_to_str};

use crate::msg::{EpochsResponse, OracleReveal};
use crate::seed::{compute_hash, order_reveals};
use crate::state::{active_oracles, COMMITS, CONFIG, EPOCHS, OPEN_HEIGHT, REVEALS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_current_height(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let height = derive_height(config.genesis_time, config.epoch_duration, env.block.time);
    to_json_binary(&height)
}

pub fn query_oracles(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&active_oracles(deps.storage)?)
}

pub fn query_oracle_snapshot(deps: Deps, height: u64) -> StdResult<Binary> {
    let epoch = EPOCHS.load(deps.storage, height)?;
    to_json_binary(&epoch.oracles)
}

pub fn query_epoch(deps: Deps, height: u64) -> StdResult<Binary> {
    let epoch = EPOCHS.may_load(deps.storage, height)?;
    to_json_binary(&epoch.map(|e| e.to_response()))
}

pub fn query_open_epoch(deps: Deps) -> StdResult<Binary> {
    let height = OPEN_HEIGHT.load(deps.storage)?;
    let epoch = EPOCHS.load(deps.storage, height)?;
    to_json_binary(&epoch.to_response())
}

pub fn query_epochs(deps: Deps, start_after: Option<u64>, limit: Option<u32>) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let epochs = EPOCHS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, epoch)| epoch.to_response()))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&EpochsResponse { epochs })
}

pub fn query_commit(deps: Deps, height: u64, oracle: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&oracle)?;
    let commit = COMMITS.may_load(deps.storage, (height, &addr))?;
    to_json_binary(&commit)
}

pub fn query_reveal(deps: Deps, height: u64, oracle: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&oracle)?;
    let reveal = REVEALS.may_load(deps.storage, (height, &addr))?;
    to_json_binary(&reveal)
}

pub fn query_compute_hash(
    deps: Deps,
    height: u64,
    reveals: Vec<OracleReveal>,
) -> StdResult<Binary> {
    let epoch = EPOCHS.load(deps.storage, height)?;

    let mut pairs = Vec::with_capacity(reveals.len());
    for OracleReveal { oracle, reveal } in reveals {
        pairs.push((deps.api.addr_validate(&oracle)?, reveal));
    }

    let ordered = order_reveals(height, &epoch.oracles, pairs)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    to_json_binary(&hex_to_str(&compute_hash(&ordered)))
}
