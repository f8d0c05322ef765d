use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::ledger::{balance_of, current_supply};
use crate::msg::{ReceiptsResponse, SupplyResponse};
use crate::state::{CONFIG, MINTED_ITEMS, RECEIPTS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_supply(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&SupplyResponse {
        symbol: config.symbol,
        supply: current_supply(deps.storage)?,
        max_supply: config.policy.schedule.ceiling(),
    })
}

pub fn query_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    to_json_binary(&balance_of(deps.storage, &addr)?)
}

pub fn query_receipt(deps: Deps, id: u64) -> StdResult<Binary> {
    let receipt = RECEIPTS.may_load(deps.storage, id)?;
    to_json_binary(&receipt)
}

pub fn query_receipts(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let receipts: Vec<_> = RECEIPTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, receipt)| receipt)
        .collect();

    to_json_binary(&ReceiptsResponse { receipts })
}

pub fn query_reward_for(deps: Deps, supply: Uint128) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.policy.schedule.reward_for(supply))
}

pub fn query_item_minted(deps: Deps, id: u64) -> StdResult<Binary> {
    let height = MINTED_ITEMS.may_load(deps.storage, id)?;
    to_json_binary(&height)
}
