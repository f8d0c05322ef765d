use std::collections::BTreeMap;

use cosmwasm_std::Addr;
use epoch_drops_common::{commitment, hex_to_str};
use sha2::{Digest, Sha256};

use crate::error::ContractError;

/// Derive an epoch seed from its reveals.
///
/// `seed = sha256( reveal_0 || reveal_1 || ... )` where the reveals are
/// already in snapshot order. Anyone holding the public reveals can recompute it.
pub fn compute_hash<S: AsRef<str>>(reveals: &[S]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for reveal in reveals {
        hasher.update(reveal.as_ref().as_bytes());
    }
    hasher.finalize().into()
}

/// Put `(oracle, reveal)` pairs into the order of `snapshot`.
///
/// Exactly one reveal per snapshot oracle is required, so the result does not
/// depend on the order the pairs were supplied in.
pub fn order_reveals(
    height: u64,
    snapshot: &[Addr],
    reveals: Vec<(Addr, String)>,
) -> Result<Vec<String>, ContractError> {
    let mut by_oracle = BTreeMap::new();
    for (oracle, reveal) in reveals {
        if !snapshot.contains(&oracle) {
            return Err(ContractError::RevealSetMismatch {
                height,
                reason: format!("{oracle} is not in the snapshot"),
            });
        }
        if by_oracle.insert(oracle.clone(), reveal).is_some() {
            return Err(ContractError::RevealSetMismatch {
                height,
                reason: format!("duplicate reveal for {oracle}"),
            });
        }
    }

    snapshot
        .iter()
        .map(|oracle| {
            by_oracle
                .remove(oracle)
                .ok_or_else(|| ContractError::RevealSetMismatch {
                    height,
                    reason: format!("missing reveal for {oracle}"),
                })
        })
        .collect()
}

/// Contribution substituted for an oracle that did not reveal in time:
/// `hex(sha256(salt || oracle))`. It is public as soon as the salt is.
pub fn forced_contribution(salt: &str, oracle: &Addr) -> String {
    hex_to_str(&commitment(&format!("{salt}{oracle}")))
}
