use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_POOLS};
use crate::error::{VestingError, VestingResult};
use crate::utils::schedule::Tranche;

/// Claim flags of one pool: bit `i` is set once slot `i` was claimed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimEntry {
    pub pool: String,
    pub claimed_slots: u64,
    pub claimed_amount: u64,
}

impl ClaimEntry {
    pub const SIZE: usize = (4 + MAX_NAME_LEN) + 8 + 8;

    fn is_set(&self, slot: usize) -> bool {
        slot < 64 && self.claimed_slots & (1u64 << slot) != 0
    }
}

/// Which slots of one beneficiary have been claimed. The only authority
/// consulted before a transfer is instructed; it never moves funds itself.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimLedger {
    entries: Vec<ClaimEntry>,
}

impl ClaimLedger {
    pub const SIZE: usize = 4 + MAX_POOLS * ClaimEntry::SIZE;

    fn entry(&self, pool: &str) -> Option<&ClaimEntry> {
        self.entries.iter().find(|e| e.pool == pool)
    }

    pub fn is_claimed(&self, pool: &str, slot: usize) -> bool {
        self.entry(pool).map_or(false, |e| e.is_set(slot))
    }

    pub fn claimed_amount(&self, pool: &str) -> u64 {
        self.entry(pool).map_or(0, |e| e.claimed_amount)
    }

    /// Mark `slot` claimed and return its amount.
    pub fn record_claim(
        &mut self,
        pool: &str,
        slot: usize,
        tranches: &[Tranche],
        now: i64,
    ) -> VestingResult<u64> {
        let tranche = tranches.get(slot).ok_or(VestingError::SlotOutOfRange)?;
        if self.is_claimed(pool, slot) {
            return Err(VestingError::AlreadyClaimed);
        }
        if now < tranche.release_ts {
            return Err(VestingError::NotYetUnlocked);
        }

        let idx = match self.entries.iter().position(|e| e.pool == pool) {
            Some(idx) => idx,
            None => {
                if self.entries.len() >= MAX_POOLS {
                    return Err(VestingError::CapacityExceeded);
                }
                self.entries.push(ClaimEntry {
                    pool: pool.to_string(),
                    claimed_slots: 0,
                    claimed_amount: 0,
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        let claimed_amount = entry
            .claimed_amount
            .checked_add(tranche.amount)
            .ok_or(VestingError::MathOverflow)?;
        entry.claimed_slots |= 1u64 << slot;
        entry.claimed_amount = claimed_amount;
        Ok(tranche.amount)
    }
}
