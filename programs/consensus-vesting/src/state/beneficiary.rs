use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_POOLS, MAX_TRANCHES};
use crate::error::{VestingError, VestingResult};
use crate::state::ClaimLedger;
use crate::utils::schedule::{self, Tranche, UnlockedSlot};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub tranches: Vec<Tranche>,
}

impl Pool {
    pub const SIZE: usize = (4 + MAX_NAME_LEN) + 4 + MAX_TRANCHES * Tranche::SIZE;
}

/// A vesting beneficiary: its named allocation pools and their claim flags.
///
/// PDA: `["beneficiary", controller, identity]`, one per identity.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Beneficiary {
    pub identity: Pubkey,
    pub bump: u8,
    pub pools: Vec<Pool>,
    pub claims: ClaimLedger,
}

impl Beneficiary {
    pub const SIZE: usize = 32 + 1 + 4 + MAX_POOLS * Pool::SIZE + ClaimLedger::SIZE;

    pub fn new(identity: Pubkey, pools: Vec<Pool>) -> Self {
        Self {
            identity,
            bump: 0,
            pools,
            claims: ClaimLedger::default(),
        }
    }

    pub fn pool(&self, name: &str) -> VestingResult<&Pool> {
        self.pools
            .iter()
            .find(|p| p.name == name)
            .ok_or(VestingError::UnknownPool)
    }

    pub fn total_allocation(&self) -> VestingResult<u64> {
        self.pools.iter().try_fold(0u64, |acc, p| {
            acc.checked_add(schedule::total_amount(&p.tranches)?)
                .ok_or(VestingError::MathOverflow)
        })
    }

    /// Unlocked, unclaimed slots of `pool` at `now`.
    pub fn claimable(&self, pool: &str, now: i64) -> VestingResult<Vec<UnlockedSlot>> {
        let tranches = &self.pool(pool)?.tranches;
        Ok(schedule::unlockable(tranches, now, |slot| {
            self.claims.is_claimed(pool, slot)
        }))
    }
}

/// Instruction input for one pool, as produced by the offline import step.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolInput {
    pub name: String,
    pub release_times: Vec<i64>,
    pub amounts: Vec<u64>,
}

/// Validate raw pool inputs into a beneficiary record.
pub fn beneficiary_from_inputs(
    identity: Pubkey,
    inputs: &[PoolInput],
) -> VestingResult<Beneficiary> {
    if inputs.is_empty() || inputs.len() > MAX_POOLS {
        return Err(VestingError::MalformedSchedule);
    }
    let mut pools: Vec<Pool> = Vec::with_capacity(inputs.len());
    for input in inputs {
        validate_name(&input.name)?;
        if pools.iter().any(|p| p.name == input.name) {
            return Err(VestingError::MalformedSchedule);
        }
        pools.push(Pool {
            name: input.name.clone(),
            tranches: schedule::tranches_from_parts(&input.release_times, &input.amounts)?,
        });
    }
    Ok(Beneficiary::new(identity, pools))
}

pub fn validate_name(name: &str) -> VestingResult<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(VestingError::MalformedSchedule);
    }
    Ok(())
}
