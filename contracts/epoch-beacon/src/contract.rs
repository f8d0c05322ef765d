use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Timestamp,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{
    active_oracles, BeaconConfig, Epoch, CONFIG, DEFAULT_EPOCH_DURATION, EPOCHS, MAX_ORACLES,
    OPEN_HEIGHT, ORACLES,
};

const CONTRACT_NAME: &str = "crates.io:epoch-beacon";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let epoch_duration = msg.epoch_duration.unwrap_or(DEFAULT_EPOCH_DURATION);
    if epoch_duration == 0 {
        return Err(ContractError::InvalidDuration);
    }

    let config = BeaconConfig {
        admin: info.sender.clone(),
        genesis_time: msg
            .genesis_time
            .map(Timestamp::from_seconds)
            .unwrap_or(env.block.time),
        epoch_duration,
        enabled: msg.enabled.unwrap_or(false),
    };
    CONFIG.save(deps.storage, &config)?;

    // Register the initial oracles (duplicates collapse)
    for oracle in &msg.oracles {
        let addr = deps.api.addr_validate(oracle)?;
        ORACLES.save(deps.storage, &addr, &())?;
    }
    let oracles = active_oracles(deps.storage)?;
    if oracles.len() > MAX_ORACLES {
        return Err(ContractError::TooManyOracles { max: MAX_ORACLES });
    }

    // Genesis epoch
    let genesis_epoch = Epoch {
        height: 1,
        oracles,
        seed: None,
        opened_at: env.block.time,
        finalized_at: None,
    };
    EPOCHS.save(deps.storage, 1, &genesis_epoch)?;
    OPEN_HEIGHT.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "epoch-beacon")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("genesis_time", config.genesis_time.seconds().to_string())
        .add_attribute("epoch_duration", epoch_duration.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Commit { height, commit } => execute::commit(deps, env, info, height, commit),
        ExecuteMsg::Reveal { height, reveal } => execute::reveal(deps, env, info, height, reveal),
        ExecuteMsg::ForceReveal { height, salt } => {
            execute::force_reveal(deps, env, info, height, salt)
        }
        ExecuteMsg::Advance {} => execute::advance(deps, env, info),
        ExecuteMsg::PurgeEpoch { height, limit } => {
            execute::purge_epoch(deps, env, info, height, limit)
        }
        ExecuteMsg::AddOracle { oracle } => execute::add_oracle(deps, env, info, oracle),
        ExecuteMsg::RemoveOracle { oracle } => execute::remove_oracle(deps, env, info, oracle),
        ExecuteMsg::Enable { enabled } => execute::enable(deps, env, info, enabled),
        ExecuteMsg::SetDuration { duration } => execute::set_duration(deps, env, info, duration),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::CurrentHeight {} => query::query_current_height(deps, env),
        QueryMsg::Oracles {} => query::query_oracles(deps),
        QueryMsg::OracleSnapshot { height } => query::query_oracle_snapshot(deps, height),
        QueryMsg::Epoch { height } => query::query_epoch(deps, height),
        QueryMsg::OpenEpoch {} => query::query_open_epoch(deps),
        QueryMsg::Epochs { start_after, limit } => query::query_epochs(deps, start_after, limit),
        QueryMsg::Commit { height, oracle } => query::query_commit(deps, height, oracle),
        QueryMsg::Reveal { height, oracle } => query::query_reveal(deps, height, oracle),
        QueryMsg::ComputeHash { height, reveals } => {
            query::query_compute_hash(deps, height, reveals)
        }
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
