//! Integration tests for the epoch beacon and the seed-gated minter.
//!
//! Each contract is driven through its `instantiate` / `execute` / `query`
//! entry points with `cosmwasm_std::testing` mocks. The minter reads the
//! beacon through `MockQuerier::update_wasm`, which forwards its smart
//! queries to a real beacon instance.
//!
//! Run:
//! ```bash
//! cargo test -p epoch-drops-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    from_json, Addr, ContractResult, Env, MemoryStorage, OwnedDeps, SystemError, SystemResult,
    Timestamp, Uint128, WasmQuery,
};
use epoch_drops_common::{hash_item, hash_items, str_to_hash, EpochResponse, WorkItem};
use seed_minter::policy::{DifficultyMeasure, MintPolicy, RewardSchedule, RewardTier};
use seed_minter::state::MintReceipt;
use sha2::{Digest, Sha256};

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

const DAY: u64 = 86_400;

// ─── Helpers ───

/// An env ten seconds into `height`.
fn env_at(height: u64) -> Env {
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds((height - 1) * DAY + 10);
    env
}

fn height_start(height: u64) -> Timestamp {
    mock_env().block.time.plus_seconds((height - 1) * DAY)
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn preimage(oracle: &str, height: u64) -> String {
    format!("{oracle}-secret-{height}")
}

fn easy_policy() -> MintPolicy {
    MintPolicy {
        difficulty: 1,
        measure: DifficultyMeasure::HexDigits,
        schedule: RewardSchedule::halving(),
    }
}

// ─── Beacon helpers ───

struct Oracle {
    name: &'static str,
    addr: Addr,
}

fn setup_beacon(deps: &mut TestDeps, names: &[&'static str]) -> Vec<Oracle> {
    let admin = deps.api.addr_make("admin");
    let oracles: Vec<Oracle> = names
        .iter()
        .map(|&name| Oracle {
            name,
            addr: deps.api.addr_make(name),
        })
        .collect();

    let msg = epoch_beacon::msg::InstantiateMsg {
        oracles: oracles.iter().map(|o| o.addr.to_string()).collect(),
        epoch_duration: Some(DAY),
        genesis_time: None,
        enabled: Some(true),
    };
    epoch_beacon::contract::instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
        .unwrap();
    oracles
}

fn beacon_exec(
    deps: &mut TestDeps,
    env: Env,
    sender: &Addr,
    msg: epoch_beacon::msg::ExecuteMsg,
) -> Result<cosmwasm_std::Response, epoch_beacon::error::ContractError> {
    epoch_beacon::contract::execute(deps.as_mut(), env, message_info(sender, &[]), msg)
}

fn commit(deps: &mut TestDeps, height: u64, oracle: &Oracle) {
    beacon_exec(
        deps,
        env_at(height),
        &oracle.addr,
        epoch_beacon::msg::ExecuteMsg::Commit {
            height,
            commit: sha256_hex(preimage(oracle.name, height).as_bytes()),
        },
    )
    .unwrap();
}

fn reveal(deps: &mut TestDeps, height: u64, oracle: &Oracle) {
    beacon_exec(
        deps,
        env_at(height),
        &oracle.addr,
        epoch_beacon::msg::ExecuteMsg::Reveal {
            height,
            reveal: preimage(oracle.name, height),
        },
    )
    .unwrap();
}

/// Finalize `height` once the clock has moved on to the next epoch.
fn advance(deps: &mut TestDeps, height: u64) -> EpochResponse {
    let anyone = deps.api.addr_make("keeper");
    let res = beacon_exec(
        deps,
        env_at(height + 1),
        &anyone,
        epoch_beacon::msg::ExecuteMsg::Advance {},
    )
    .unwrap();
    from_json(res.data.unwrap()).unwrap()
}

/// Every oracle commits and reveals in heights `1..=last`, each epoch finalized on time.
fn run_honest_epochs(deps: &mut TestDeps, oracles: &[Oracle], last: u64) {
    for height in 1..=last {
        for oracle in oracles {
            commit(deps, height, oracle);
        }
        for oracle in oracles {
            reveal(deps, height, oracle);
        }
        let next = advance(deps, height);
        assert_eq!(next.height, height + 1);
    }
}

fn beacon_epoch(deps: &TestDeps, height: u64) -> EpochResponse {
    let res = epoch_beacon::contract::query(
        deps.as_ref(),
        mock_env(),
        epoch_beacon::msg::QueryMsg::Epoch { height },
    )
    .unwrap();
    let epoch: Option<EpochResponse> = from_json(res).unwrap();
    epoch.unwrap()
}

// ─── Minter helpers ───

/// Instantiate a minter whose beacon queries are answered by `beacon`.
fn setup_minter(beacon: TestDeps, policy: MintPolicy) -> TestDeps {
    let mut deps = mock_dependencies();

    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            // The minter's query shape must parse as the beacon's own QueryMsg
            let parsed: epoch_beacon::msg::QueryMsg = match from_json(msg) {
                Ok(parsed) => parsed,
                Err(e) => {
                    return SystemResult::Err(SystemError::InvalidRequest {
                        error: e.to_string(),
                        request: msg.clone(),
                    })
                }
            };
            match epoch_beacon::contract::query(beacon.as_ref(), mock_env(), parsed) {
                Ok(bin) => SystemResult::Ok(ContractResult::Ok(bin)),
                Err(e) => SystemResult::Ok(ContractResult::Err(e.to_string())),
            }
        }
        _ => SystemResult::Err(SystemError::UnsupportedRequest {
            kind: "only smart queries supported".to_string(),
        }),
    });

    let msg = seed_minter::msg::InstantiateMsg {
        beacon: deps.api.addr_make("beacon").to_string(),
        work_source: deps.api.addr_make("drops").to_string(),
        symbol: "SCRAP".to_string(),
        policy: Some(policy),
    };
    let admin = deps.api.addr_make("admin");
    seed_minter::contract::instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
        .unwrap();
    deps
}

fn mint(
    deps: &mut TestDeps,
    env: Env,
    items: Vec<WorkItem>,
) -> Result<MintReceipt, seed_minter::error::ContractError> {
    let drops = deps.api.addr_make("drops");
    let owner = deps.api.addr_make("owner");
    let res = seed_minter::contract::execute(
        deps.as_mut(),
        env,
        message_info(&drops, &[]),
        seed_minter::msg::ExecuteMsg::Mint {
            owner: owner.to_string(),
            items,
        },
    )?;
    Ok(from_json(res.data.unwrap()).unwrap())
}

fn passing_ids(seed: &[u8; 32], policy: &MintPolicy, count: usize) -> Vec<u64> {
    (1u64..)
        .filter(|id| policy.leading_zeros(&hash_item(seed, *id)) >= policy.difficulty)
        .take(count)
        .collect()
}

fn work_items(ids: &[u64], created: Timestamp) -> Vec<WorkItem> {
    ids.iter().map(|id| WorkItem { id: *id, created }).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_seed_is_hash_of_reveals_in_registry_order() {
    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b"]);
    run_honest_epochs(&mut beacon, &oracles, 5);

    let epoch = beacon_epoch(&beacon, 5);
    assert!(epoch.finalized);

    // Snapshot order is ascending by address
    let mut sorted: Vec<&Oracle> = oracles.iter().collect();
    sorted.sort_by(|a, b| a.addr.cmp(&b.addr));
    assert_eq!(
        epoch.oracles,
        sorted.iter().map(|o| o.addr.clone()).collect::<Vec<_>>()
    );

    let joined: String = sorted.iter().map(|o| preimage(o.name, 5)).collect();
    assert_eq!(epoch.seed, Some(sha256_hex(joined.as_bytes())));

    // Epoch 6 is open and has no seed yet
    let open = beacon_epoch(&beacon, 6);
    assert!(!open.finalized);
    assert_eq!(open.seed, None);
}

#[test]
fn test_minter_consumes_previous_epoch_seed() {
    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b"]);
    run_honest_epochs(&mut beacon, &oracles, 5);
    let seed_hex = beacon_epoch(&beacon, 5).seed.unwrap();
    let seed = str_to_hash(&seed_hex).unwrap();

    let mut minter = setup_minter(beacon, easy_policy());
    let ids = passing_ids(&seed, &easy_policy(), 3);

    let receipt = mint(&mut minter, env_at(6), work_items(&ids, height_start(3))).unwrap();

    assert_eq!(receipt.epoch_height, 5);
    assert_eq!(receipt.seed, seed_hex);
    assert_eq!(receipt.amount, Uint128::new(24));
    for item in &receipt.accepted {
        assert_eq!(item.digest, hex::encode(hash_item(&seed, item.id)));
    }
    assert_eq!(receipt.batch_digest, hex::encode(hash_items(&seed, &ids)));

    let balance: Uint128 = from_json(
        seed_minter::contract::query(
            minter.as_ref(),
            mock_env(),
            seed_minter::msg::QueryMsg::Balance {
                address: minter.api.addr_make("owner").to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(balance, Uint128::new(24));
}

#[test]
fn test_item_created_after_epoch_start_is_too_recent() {
    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b"]);
    run_honest_epochs(&mut beacon, &oracles, 5);
    let seed = str_to_hash(&beacon_epoch(&beacon, 5).seed.unwrap()).unwrap();

    let mut minter = setup_minter(beacon, easy_policy());
    let ids = passing_ids(&seed, &easy_policy(), 2);

    // Created once height 6 had begun, so the seed of 5 may already have been known
    let mut items = work_items(&ids[..1], height_start(5));
    items.push(WorkItem {
        id: ids[1],
        created: env_at(6).block.time,
    });

    let err = mint(&mut minter, env_at(6), items).unwrap_err();
    assert!(matches!(
        err,
        seed_minter::error::ContractError::TooRecent {
            height: 5,
            ..
        }
    ));
}

#[test]
fn test_unfinalized_epoch_blocks_minting() {
    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b"]);
    run_honest_epochs(&mut beacon, &oracles, 4);

    // Epoch 5 gets commits and reveals but nobody advances it
    for oracle in &oracles {
        commit(&mut beacon, 5, oracle);
        reveal(&mut beacon, 5, oracle);
    }

    let mut minter = setup_minter(beacon, easy_policy());
    let err = mint(&mut minter, env_at(6), work_items(&[1, 2], height_start(2))).unwrap_err();
    assert!(matches!(
        err,
        seed_minter::error::ContractError::SeedNotReady { height: 5 }
    ));
}

#[test]
fn test_forced_epoch_still_feeds_minter() {
    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b"]);
    run_honest_epochs(&mut beacon, &oracles, 4);

    // oracle_b commits at height 5 but withholds its reveal
    for oracle in &oracles {
        commit(&mut beacon, 5, oracle);
    }
    reveal(&mut beacon, 5, &oracles[0]);

    let keeper = beacon.api.addr_make("keeper");
    let err = beacon_exec(
        &mut beacon,
        env_at(6),
        &keeper,
        epoch_beacon::msg::ExecuteMsg::Advance {},
    )
    .unwrap_err();
    assert!(matches!(
        err,
        epoch_beacon::error::ContractError::IncompleteReveals { height: 5, .. }
    ));

    let admin = beacon.api.addr_make("admin");
    beacon_exec(
        &mut beacon,
        env_at(6),
        &admin,
        epoch_beacon::msg::ExecuteMsg::ForceReveal {
            height: 5,
            salt: "liveness".to_string(),
        },
    )
    .unwrap();
    advance(&mut beacon, 5);

    let epoch = beacon_epoch(&beacon, 5);
    let mut sorted: Vec<&Oracle> = oracles.iter().collect();
    sorted.sort_by(|a, b| a.addr.cmp(&b.addr));
    let honest: String = sorted.iter().map(|o| preimage(o.name, 5)).collect();
    let seed_hex = epoch.seed.unwrap();
    assert_ne!(seed_hex, sha256_hex(honest.as_bytes()));

    let seed = str_to_hash(&seed_hex).unwrap();
    let mut minter = setup_minter(beacon, easy_policy());
    let ids = passing_ids(&seed, &easy_policy(), 1);

    let receipt = mint(&mut minter, env_at(6), work_items(&ids, height_start(1))).unwrap();
    assert_eq!(receipt.seed, seed_hex);
    assert_eq!(receipt.accepted.len(), 1);
}

#[test]
fn test_running_supply_crosses_tier_within_batch() {
    let policy = MintPolicy {
        difficulty: 1,
        measure: DifficultyMeasure::HexDigits,
        schedule: RewardSchedule::Tiered {
            tiers: vec![
                RewardTier {
                    supply_below: Uint128::new(10),
                    reward: Uint128::new(8),
                },
                RewardTier {
                    supply_below: Uint128::new(20),
                    reward: Uint128::new(4),
                },
            ],
        },
    };

    let mut beacon = mock_dependencies();
    let oracles = setup_beacon(&mut beacon, &["oracle_a", "oracle_b", "oracle_c"]);
    run_honest_epochs(&mut beacon, &oracles, 5);
    let seed = str_to_hash(&beacon_epoch(&beacon, 5).seed.unwrap()).unwrap();

    let mut minter = setup_minter(beacon, policy.clone());
    let ids = passing_ids(&seed, &policy, 4);

    let receipt = mint(&mut minter, env_at(6), work_items(&ids, height_start(4))).unwrap();

    // 0 -> 8 -> 16 -> 20: the third item sees supply 16 and the fourth hits the ceiling
    let rewards: Vec<u128> = receipt.accepted.iter().map(|a| a.reward.u128()).collect();
    assert_eq!(rewards, vec![8, 8, 4, 0]);
    assert_eq!(receipt.amount, Uint128::new(20));

    let supply: seed_minter::msg::SupplyResponse = from_json(
        seed_minter::contract::query(
            minter.as_ref(),
            mock_env(),
            seed_minter::msg::QueryMsg::Supply {},
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(supply.supply, Uint128::new(20));
    assert_eq!(supply.max_supply, Uint128::new(20));
}

#[test]
fn test_beacon_query_wire_format_is_shared() {
    // The minter only knows the common query enum; the beacon must accept it verbatim
    let shared = serde_json::to_value(epoch_drops_common::BeaconQueryMsg::Epoch { height: 5 })
        .unwrap();
    assert_eq!(shared, serde_json::json!({ "epoch": { "height": 5 } }));

    let own = serde_json::to_value(epoch_beacon::msg::QueryMsg::Epoch { height: 5 }).unwrap();
    assert_eq!(shared, own);

    let shared_config =
        serde_json::to_value(epoch_drops_common::BeaconQueryMsg::Config {}).unwrap();
    let own_config = serde_json::to_value(epoch_beacon::msg::QueryMsg::Config {}).unwrap();
    assert_eq!(shared_config, own_config);
}
