use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Order, Response, StdResult, Storage,
};
use epoch_drops_common::{commitment, derive_height, hex_to_str, str_to_hash};

use crate::error::ContractError;
use crate::seed::{compute_hash, forced_contribution};
use crate::state::{
    active_oracles, BeaconConfig, Commit, Epoch, Reveal, COMMITS, CONFIG, EPOCHS, MAX_ORACLES,
    OPEN_HEIGHT, ORACLES, PURGE_BATCH_LIMIT, REVEALS,
};

fn check_is_enabled(config: &BeaconConfig) -> Result<(), ContractError> {
    if !config.enabled {
        return Err(ContractError::Disabled);
    }
    Ok(())
}

fn check_is_admin(
    config: &BeaconConfig,
    info: &MessageInfo,
    action: &str,
) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only admin can {action}"),
        });
    }
    Ok(())
}

fn current_height(config: &BeaconConfig, env: &Env) -> u64 {
    derive_height(config.genesis_time, config.epoch_duration, env.block.time)
}

/// Reject writes addressed to an epoch whose seed is already fixed.
fn check_not_finalized(storage: &dyn Storage, height: u64) -> Result<(), ContractError> {
    match EPOCHS.may_load(storage, height)? {
        Some(epoch) if epoch.is_finalized() => Err(ContractError::EpochFinalized { height }),
        _ => Ok(()),
    }
}

/// Commit to a value for the current epoch. Registered oracles only.
pub fn commit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    height: u64,
    commit_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_enabled(&config)?;

    if !ORACLES.has(deps.storage, &info.sender) {
        return Err(ContractError::UnknownOracle {
            oracle: info.sender.to_string(),
        });
    }

    let current = current_height(&config, &env);
    if height != current {
        return Err(ContractError::WrongHeight {
            expected: current,
            got: height,
        });
    }
    check_not_finalized(deps.storage, height)?;

    if COMMITS.has(deps.storage, (height, &info.sender)) {
        return Err(ContractError::DuplicateCommit {
            height,
            oracle: info.sender.to_string(),
        });
    }

    let bytes = hex::decode(&commit_hex).map_err(|_| ContractError::InvalidHex {
        field: "commit".to_string(),
    })?;
    let digest = str_to_hash(&commit_hex).ok_or(ContractError::InvalidCommitLength {
        got: bytes.len(),
    })?;
    // Stored lowercase so reveals compare against a canonical form
    let commit = hex_to_str(&digest);

    COMMITS.save(
        deps.storage,
        (height, &info.sender),
        &Commit {
            commit: commit.clone(),
            committed_at: env.block.time,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "commit")
        .add_attribute("height", height.to_string())
        .add_attribute("oracle", info.sender.to_string())
        .add_event(
            Event::new("epoch_commit")
                .add_attribute("height", height.to_string())
                .add_attribute("oracle", info.sender.to_string())
                .add_attribute("commit", commit)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Reveal the pre-image of an earlier commit.
pub fn reveal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    height: u64,
    reveal: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_enabled(&config)?;
    check_not_finalized(deps.storage, height)?;

    let stored = COMMITS
        .may_load(deps.storage, (height, &info.sender))?
        .ok_or_else(|| ContractError::NoCommit {
            height,
            oracle: info.sender.to_string(),
        })?;

    if REVEALS.has(deps.storage, (height, &info.sender)) {
        return Err(ContractError::DuplicateReveal {
            height,
            oracle: info.sender.to_string(),
        });
    }

    let actual = hex_to_str(&commitment(&reveal));
    if actual != stored.commit {
        return Err(ContractError::HashMismatch {
            height,
            oracle: info.sender.to_string(),
            expected: stored.commit,
            actual,
        });
    }

    REVEALS.save(
        deps.storage,
        (height, &info.sender),
        &Reveal {
            reveal: reveal.clone(),
            forced: false,
            revealed_at: env.block.time,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "reveal")
        .add_attribute("height", height.to_string())
        .add_attribute("oracle", info.sender.to_string())
        .add_event(
            Event::new("epoch_reveal")
                .add_attribute("height", height.to_string())
                .add_attribute("oracle", info.sender.to_string())
                .add_attribute("reveal", reveal)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Substitute salted contributions for every snapshot oracle that has not
/// revealed, once the epoch's window has passed.
///
/// The substituted values are public the moment the salt is, so each forced
/// oracle stops contributing unpredictability to the seed. The caller picks
/// the salt, so an oracle that is itself missing a reveal may not call this.
pub fn force_reveal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    height: u64,
    salt: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_enabled(&config)?;

    if salt.is_empty() {
        return Err(ContractError::EmptySalt);
    }

    let epoch = EPOCHS
        .may_load(deps.storage, height)?
        .ok_or(ContractError::EpochNotFound { height })?;
    if epoch.is_finalized() {
        return Err(ContractError::EpochFinalized { height });
    }

    let mut missing = Vec::new();
    for oracle in &epoch.oracles {
        if !REVEALS.has(deps.storage, (height, oracle)) {
            missing.push(oracle.clone());
        }
    }

    if info.sender != config.admin {
        if !epoch.oracles.contains(&info.sender) {
            return Err(ContractError::Unauthorized {
                reason: "only admin or an epoch oracle can force reveals".to_string(),
            });
        }
        // A straggler choosing the salt would choose its own contribution
        if missing.contains(&info.sender) {
            return Err(ContractError::Unauthorized {
                reason: format!(
                    "{} has not revealed for epoch {height} and cannot force reveals",
                    info.sender
                ),
            });
        }
    }

    let current = current_height(&config, &env);
    if height >= current {
        return Err(ContractError::TooEarly { height, current });
    }

    let mut forced = Vec::new();
    for oracle in &missing {
        REVEALS.save(
            deps.storage,
            (height, oracle),
            &Reveal {
                reveal: forced_contribution(&salt, oracle),
                forced: true,
                revealed_at: env.block.time,
            },
        )?;
        forced.push(oracle.to_string());
    }

    if forced.is_empty() {
        return Err(ContractError::NothingToForce { height });
    }

    Ok(Response::new()
        .add_attribute("action", "force_reveal")
        .add_attribute("height", height.to_string())
        .add_attribute("forced_count", forced.len().to_string())
        .add_event(
            Event::new("epoch_forced_reveal")
                .add_attribute("height", height.to_string())
                .add_attribute("salt", salt)
                .add_attribute("oracles", forced.join(","))
                .add_attribute("called_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Finalize the open epoch and open the next one.
///
/// 1. The derived height must have moved past the open epoch
/// 2. Every snapshot oracle must have a reveal (direct or forced)
/// 3. seed = sha256(reveals in snapshot order), written once
/// 4. A bounded batch of the epoch's commit/reveal rows is purged
/// 5. The next epoch opens with a fresh registry snapshot
pub fn advance(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_enabled(&config)?;

    let height = OPEN_HEIGHT.load(deps.storage)?;
    let mut epoch = EPOCHS
        .may_load(deps.storage, height)?
        .ok_or(ContractError::EpochNotFound { height })?;
    if epoch.is_finalized() {
        return Err(ContractError::EpochFinalized { height });
    }

    let current = current_height(&config, &env);
    if current <= height {
        return Err(ContractError::TooEarly { height, current });
    }

    let mut reveals = Vec::with_capacity(epoch.oracles.len());
    let mut missing = Vec::new();
    let mut forced_count = 0u32;
    for oracle in &epoch.oracles {
        match REVEALS.may_load(deps.storage, (height, oracle))? {
            Some(reveal) => {
                if reveal.forced {
                    forced_count += 1;
                }
                reveals.push(reveal.reveal);
            }
            None => missing.push(oracle.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ContractError::IncompleteReveals {
            height,
            missing: missing.join(","),
        });
    }

    let seed = hex_to_str(&compute_hash(&reveals));
    epoch.seed = Some(seed.clone());
    epoch.finalized_at = Some(env.block.time);
    EPOCHS.save(deps.storage, height, &epoch)?;

    let purged = purge_epoch_rows(deps.storage, height, PURGE_BATCH_LIMIT)?;

    let next = Epoch {
        height: height + 1,
        oracles: active_oracles(deps.storage)?,
        seed: None,
        opened_at: env.block.time,
        finalized_at: None,
    };
    EPOCHS.save(deps.storage, next.height, &next)?;
    OPEN_HEIGHT.save(deps.storage, &next.height)?;

    let next_oracles: Vec<String> = next.oracles.iter().map(Addr::to_string).collect();

    Ok(Response::new()
        .set_data(to_json_binary(&next.to_response())?)
        .add_attribute("action", "advance")
        .add_attribute("finalized_height", height.to_string())
        .add_attribute("seed", seed.clone())
        .add_attribute("new_height", next.height.to_string())
        .add_event(
            Event::new("epoch_finalized")
                .add_attribute("height", height.to_string())
                .add_attribute("seed", seed)
                .add_attribute("reveals", reveals.len().to_string())
                .add_attribute("forced", forced_count.to_string())
                .add_attribute("purged_rows", purged.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        )
        .add_event(
            Event::new("epoch_opened")
                .add_attribute("height", next.height.to_string())
                .add_attribute("oracles", next_oracles.join(","))
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Remove up to `limit` commit rows and `limit` reveal rows of `height`.
fn purge_epoch_rows(storage: &mut dyn Storage, height: u64, limit: u32) -> StdResult<u32> {
    let commits: Vec<Addr> = COMMITS
        .prefix(height)
        .keys(storage, None, None, Order::Ascending)
        .take(limit as usize)
        .collect::<StdResult<_>>()?;
    for oracle in &commits {
        COMMITS.remove(storage, (height, oracle));
    }

    let reveals: Vec<Addr> = REVEALS
        .prefix(height)
        .keys(storage, None, None, Order::Ascending)
        .take(limit as usize)
        .collect::<StdResult<_>>()?;
    for oracle in &reveals {
        REVEALS.remove(storage, (height, oracle));
    }

    Ok((commits.len() + reveals.len()) as u32)
}

/// Sweep commit/reveal rows left behind for a finalized epoch, e.g. from
/// oracles added to the registry after the epoch was opened.
pub fn purge_epoch(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    height: u64,
    limit: Option<u32>,
) -> Result<Response, ContractError> {
    let epoch = EPOCHS
        .may_load(deps.storage, height)?
        .ok_or(ContractError::EpochNotFound { height })?;
    if !epoch.is_finalized() {
        return Err(ContractError::EpochOpen { height });
    }

    let limit = limit.unwrap_or(PURGE_BATCH_LIMIT).min(PURGE_BATCH_LIMIT);
    let purged = purge_epoch_rows(deps.storage, height, limit)?;

    Ok(Response::new()
        .add_attribute("action", "purge_epoch")
        .add_attribute("height", height.to_string())
        .add_attribute("purged_rows", purged.to_string())
        .add_event(
            Event::new("epoch_purged")
                .add_attribute("height", height.to_string())
                .add_attribute("purged_rows", purged.to_string()),
        ))
}

/// Register an oracle. Admin only. Takes effect from the next opened epoch.
pub fn add_oracle(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    oracle: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_admin(&config, &info, "add oracles")?;

    let addr = deps.api.addr_validate(&oracle)?;
    if ORACLES.has(deps.storage, &addr) {
        return Err(ContractError::OracleAlreadyRegistered { oracle });
    }
    if active_oracles(deps.storage)?.len() >= MAX_ORACLES {
        return Err(ContractError::TooManyOracles { max: MAX_ORACLES });
    }
    ORACLES.save(deps.storage, &addr, &())?;

    Ok(Response::new()
        .add_attribute("action", "add_oracle")
        .add_event(Event::new("oracle_added").add_attribute("oracle", addr.to_string())))
}

/// Deregister an oracle. Admin only. Snapshots of opened epochs keep it.
pub fn remove_oracle(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    oracle: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_is_admin(&config, &info, "remove oracles")?;

    let addr = deps.api.addr_validate(&oracle)?;
    if !ORACLES.has(deps.storage, &addr) {
        return Err(ContractError::OracleNotRegistered { oracle });
    }
    ORACLES.remove(deps.storage, &addr);

    Ok(Response::new()
        .add_attribute("action", "remove_oracle")
        .add_event(Event::new("oracle_removed").add_attribute("oracle", addr.to_string())))
}

/// Turn the beacon on or off. Admin only.
pub fn enable(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    enabled: bool,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    check_is_admin(&config, &info, "enable the beacon")?;

    config.enabled = enabled;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "enable")
        .add_event(Event::new("beacon_enabled").add_attribute("enabled", enabled.to_string())))
}

/// Change the epoch length. Admin only, and only while disabled since every
/// height derivation depends on it.
pub fn set_duration(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    duration: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    check_is_admin(&config, &info, "set the epoch duration")?;

    if duration == 0 {
        return Err(ContractError::InvalidDuration);
    }
    if config.enabled {
        return Err(ContractError::DurationChangeWhileEnabled);
    }

    config.epoch_duration = duration;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_duration")
        .add_event(
            Event::new("beacon_duration_set").add_attribute("duration", duration.to_string()),
        ))
}
