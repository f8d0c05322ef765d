use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use epoch_drops_common::{clz_binary, clz_hex, hex_to_str};

use crate::error::ContractError;

const MILLION: u128 = 1_000_000;

/// How leading zeros of a work digest are counted.
///
/// The two measures only agree on whole nibbles: a digest starting `0x1f`
/// has three leading zero bits but no leading zero hex digit.
#[cw_serde]
pub enum DifficultyMeasure {
    /// Leading `'0'` characters of the hex rendering (4-bit steps)
    HexDigits,
    /// Leading zero bits of the raw digest
    Bits,
}

impl DifficultyMeasure {
    fn max(&self) -> u16 {
        match self {
            DifficultyMeasure::HexDigits => 64,
            DifficultyMeasure::Bits => 256,
        }
    }
}

/// One step of the tiered schedule: `reward` per item while supply is below `supply_below`.
#[cw_serde]
pub struct RewardTier {
    pub supply_below: Uint128,
    pub reward: Uint128,
}

#[cw_serde]
pub enum RewardSchedule {
    /// Steps ordered by ceiling; supply at or past the last ceiling earns nothing.
    Tiered { tiers: Vec<RewardTier> },
    /// Same reward for every item until `max_supply` is reached.
    Flat {
        reward: Uint128,
        max_supply: Uint128,
    },
}

impl RewardSchedule {
    /// 8 / 4 / 2 / 1 per item, halving at 100M, 300M and 600M, ending at 1000M.
    pub fn halving() -> Self {
        let tier = |supply_below: u128, reward: u128| RewardTier {
            supply_below: Uint128::new(supply_below * MILLION),
            reward: Uint128::new(reward),
        };
        RewardSchedule::Tiered {
            tiers: vec![tier(100, 8), tier(300, 4), tier(600, 2), tier(1000, 1)],
        }
    }

    /// Reward for one item minted when total supply is `supply`.
    pub fn reward_for(&self, supply: Uint128) -> Uint128 {
        match self {
            RewardSchedule::Tiered { tiers } => tiers
                .iter()
                .find(|tier| supply < tier.supply_below)
                .map(|tier| tier.reward)
                .unwrap_or_default(),
            RewardSchedule::Flat { reward, max_supply } => {
                if supply < *max_supply {
                    *reward
                } else {
                    Uint128::zero()
                }
            }
        }
    }

    /// Supply at which rewards drop to zero.
    pub fn ceiling(&self) -> Uint128 {
        match self {
            RewardSchedule::Tiered { tiers } => tiers
                .last()
                .map(|tier| tier.supply_below)
                .unwrap_or_default(),
            RewardSchedule::Flat { max_supply, .. } => *max_supply,
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        match self {
            RewardSchedule::Tiered { tiers } => {
                if tiers.is_empty() {
                    return Err(ContractError::InvalidPolicy {
                        reason: "tiered schedule needs at least one tier".to_string(),
                    });
                }
                for pair in tiers.windows(2) {
                    if pair[1].supply_below <= pair[0].supply_below {
                        return Err(ContractError::InvalidPolicy {
                            reason: format!(
                                "tier ceilings must increase ({} then {})",
                                pair[0].supply_below, pair[1].supply_below
                            ),
                        });
                    }
                    if pair[1].reward > pair[0].reward {
                        return Err(ContractError::InvalidPolicy {
                            reason: format!(
                                "tier rewards must not increase ({} then {})",
                                pair[0].reward, pair[1].reward
                            ),
                        });
                    }
                }
                Ok(())
            }
            RewardSchedule::Flat { max_supply, .. } => {
                if max_supply.is_zero() {
                    return Err(ContractError::InvalidPolicy {
                        reason: "max supply must be positive".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// Deployment parameters of the mint validator.
#[cw_serde]
pub struct MintPolicy {
    /// Minimum leading zeros, in units of `measure`
    pub difficulty: u16,
    pub measure: DifficultyMeasure,
    pub schedule: RewardSchedule,
}

impl Default for MintPolicy {
    fn default() -> Self {
        MintPolicy {
            difficulty: 4,
            measure: DifficultyMeasure::HexDigits,
            schedule: RewardSchedule::halving(),
        }
    }
}

impl MintPolicy {
    pub fn leading_zeros(&self, digest: &[u8; 32]) -> u16 {
        match self.measure {
            DifficultyMeasure::HexDigits => clz_hex(&hex_to_str(digest)),
            DifficultyMeasure::Bits => clz_binary(digest),
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        if self.difficulty > self.measure.max() {
            return Err(ContractError::InvalidPolicy {
                reason: format!(
                    "difficulty {} exceeds the digest length ({})",
                    self.difficulty,
                    self.measure.max()
                ),
            });
        }
        self.schedule.validate()
    }
}
