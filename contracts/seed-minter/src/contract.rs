use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{MinterConfig, CONFIG, NEXT_RECEIPT_ID, SUPPLY};

const CONTRACT_NAME: &str = "crates.io:seed-minter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let policy = msg.policy.unwrap_or_default();
    policy.validate()?;

    let config = MinterConfig {
        admin: info.sender.clone(),
        beacon: deps.api.addr_validate(&msg.beacon)?,
        work_source: deps.api.addr_validate(&msg.work_source)?,
        symbol: msg.symbol,
        policy,
    };
    CONFIG.save(deps.storage, &config)?;
    SUPPLY.save(deps.storage, &Default::default())?;
    NEXT_RECEIPT_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "seed-minter")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("symbol", config.symbol))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Mint { owner, items } => execute::mint(deps, env, info, owner, items),
        ExecuteMsg::UpdateConfig {
            beacon,
            work_source,
            policy,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                beacon,
                work_source,
                policy,
            },
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Supply {} => query::query_supply(deps),
        QueryMsg::Balance { address } => query::query_balance(deps, address),
        QueryMsg::Receipt { id } => query::query_receipt(deps, id),
        QueryMsg::Receipts { start_after, limit } => {
            query::query_receipts(deps, start_after, limit)
        }
        QueryMsg::RewardFor { supply } => query::query_reward_for(deps, supply),
        QueryMsg::ItemMinted { id } => query::query_item_minted(deps, id),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
