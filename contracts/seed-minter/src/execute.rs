use std::collections::HashSet;

use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, QueryRequest, Response, StdError, Uint128,
    WasmQuery,
};
use epoch_drops_common::{
    derive_height, epoch_start, hash_item, hash_items, hex_to_str, str_to_hash,
    BeaconConfigResponse, BeaconQueryMsg, EpochResponse, WorkItem,
};

use crate::error::ContractError;
use crate::ledger::{credit, current_supply};
use crate::msg::UpdateConfigParams;
use crate::state::{
    AcceptedItem, MintReceipt, RejectedItem, CONFIG, MINTED_ITEMS, NEXT_RECEIPT_ID, RECEIPTS,
};

/// Mint rewards for a batch of destroyed work items. Work source only.
///
/// 1. Only the seed of the epoch before the current one is usable, and only once finalized
/// 2. Every item must predate the current epoch, so nobody can create items after seeing the seed
/// 3. digest = sha256(hex(seed) || id) must meet the policy difficulty; failing items are
///    rejected individually
/// 4. Rewards follow the schedule against the running supply, item by item, in batch order
/// 5. The total is credited to the owner and a receipt is stored and emitted
pub fn mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    items: Vec<WorkItem>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.work_source {
        return Err(ContractError::Unauthorized {
            reason: "only the work source can submit mint batches".to_string(),
        });
    }
    if items.is_empty() {
        return Err(ContractError::EmptyBatch);
    }
    let owner = deps.api.addr_validate(&owner)?;

    // Height is derived from the beacon's clock configuration
    let beacon_config: BeaconConfigResponse =
        deps.querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: config.beacon.to_string(),
            msg: to_json_binary(&BeaconQueryMsg::Config {})?,
        }))?;
    let current_height = derive_height(
        beacon_config.genesis_time,
        beacon_config.epoch_duration,
        env.block.time,
    );
    let epoch_height = current_height.saturating_sub(1);
    if epoch_height == 0 {
        return Err(ContractError::SeedNotReady { height: 0 });
    }

    let epoch: Option<EpochResponse> = deps.querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.beacon.to_string(),
        msg: to_json_binary(&BeaconQueryMsg::Epoch {
            height: epoch_height,
        })?,
    }))?;
    let seed_hex = epoch
        .filter(|e| e.finalized)
        .and_then(|e| e.seed)
        .ok_or(ContractError::SeedNotReady {
            height: epoch_height,
        })?;
    let seed = str_to_hash(&seed_hex).ok_or(ContractError::InvalidSeed {
        height: epoch_height,
    })?;

    let valid_before = epoch_start(
        beacon_config.genesis_time,
        beacon_config.epoch_duration,
        current_height,
    );
    if let Some(item) = items.iter().find(|item| item.created >= valid_before) {
        return Err(ContractError::TooRecent {
            item_id: item.id,
            created: item.created.seconds(),
            valid_before: valid_before.seconds(),
            height: epoch_height,
        });
    }

    let policy = &config.policy;
    let mut running_supply = current_supply(deps.storage)?;
    let mut amount = Uint128::zero();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for item in &items {
        let digest = hash_item(&seed, item.id);
        let digest_hex = hex_to_str(&digest);

        if !seen.insert(item.id) || MINTED_ITEMS.has(deps.storage, item.id) {
            rejected.push(RejectedItem {
                id: item.id,
                digest: digest_hex,
                reason: ContractError::DuplicateItem { item_id: item.id }.to_string(),
            });
            continue;
        }

        let zeros = policy.leading_zeros(&digest);
        if zeros < policy.difficulty {
            let err = ContractError::DifficultyNotMet {
                item_id: item.id,
                digest: digest_hex.clone(),
                zeros,
                required: policy.difficulty,
            };
            rejected.push(RejectedItem {
                id: item.id,
                digest: digest_hex,
                reason: err.to_string(),
            });
            continue;
        }

        // Later items see the supply raised by earlier ones
        let reward = policy.schedule.reward_for(running_supply);
        amount = amount.checked_add(reward).map_err(StdError::from)?;
        running_supply = running_supply.checked_add(reward).map_err(StdError::from)?;

        MINTED_ITEMS.save(deps.storage, item.id, &epoch_height)?;
        accepted.push(AcceptedItem {
            id: item.id,
            digest: digest_hex,
            reward,
        });
    }

    if !amount.is_zero() {
        credit(deps.storage, &owner, amount)?;
    }

    let accepted_ids: Vec<u64> = accepted.iter().map(|a| a.id).collect();
    let batch_digest = hex_to_str(&hash_items(&seed, &accepted_ids));

    let receipt_id = NEXT_RECEIPT_ID.may_load(deps.storage)?.unwrap_or_default();
    NEXT_RECEIPT_ID.save(deps.storage, &(receipt_id + 1))?;

    let receipt = MintReceipt {
        id: receipt_id,
        owner: owner.clone(),
        amount,
        epoch_height,
        seed: seed_hex.clone(),
        batch_digest: batch_digest.clone(),
        accepted,
        rejected,
        minted_at: env.block.time,
    };
    RECEIPTS.save(deps.storage, receipt_id, &receipt)?;

    let accepted_attr: Vec<String> = receipt
        .accepted
        .iter()
        .map(|a| format!("{}:{}", a.id, a.digest))
        .collect();

    let mut response = Response::new()
        .set_data(to_json_binary(&receipt)?)
        .add_attribute("action", "mint")
        .add_attribute("receipt_id", receipt_id.to_string())
        .add_attribute("owner", owner.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("epoch_drops_mint")
                .add_attribute("receipt_id", receipt_id.to_string())
                .add_attribute("owner", owner.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("symbol", config.symbol.clone())
                .add_attribute("epoch", epoch_height.to_string())
                .add_attribute("seed", seed_hex)
                .add_attribute("batch_digest", batch_digest)
                .add_attribute("accepted", accepted_attr.join(","))
                .add_attribute("rejected_count", receipt.rejected.len().to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );

    for item in &receipt.rejected {
        response = response.add_event(
            Event::new("epoch_drops_item_rejected")
                .add_attribute("receipt_id", receipt_id.to_string())
                .add_attribute("item_id", item.id.to_string())
                .add_attribute("digest", item.digest.clone())
                .add_attribute("reason", item.reason.clone()),
        );
    }

    Ok(response)
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        beacon,
        work_source,
        policy,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(beacon) = beacon {
        config.beacon = deps.api.addr_validate(&beacon)?;
    }
    if let Some(source) = work_source {
        config.work_source = deps.api.addr_validate(&source)?;
    }
    if let Some(policy) = policy {
        policy.validate()?;
        config.policy = policy;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("difficulty", config.policy.difficulty.to_string()))
}
