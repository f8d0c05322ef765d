//! Token bookkeeping the minter credits rewards into.

use cosmwasm_std::{Addr, StdError, StdResult, Storage, Uint128};

use crate::state::{BALANCES, SUPPLY};

pub fn current_supply(storage: &dyn Storage) -> StdResult<Uint128> {
    Ok(SUPPLY.may_load(storage)?.unwrap_or_default())
}

pub fn balance_of(storage: &dyn Storage, owner: &Addr) -> StdResult<Uint128> {
    Ok(BALANCES.may_load(storage, owner)?.unwrap_or_default())
}

/// Issue `amount` to `owner`, growing the supply by the same amount.
pub fn credit(storage: &mut dyn Storage, owner: &Addr, amount: Uint128) -> StdResult<Uint128> {
    let supply = current_supply(storage)?
        .checked_add(amount)
        .map_err(StdError::from)?;
    SUPPLY.save(storage, &supply)?;

    let balance = balance_of(storage, owner)?
        .checked_add(amount)
        .map_err(StdError::from)?;
    BALANCES.save(storage, owner, &balance)?;

    Ok(balance)
}
