use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_PARTICIPANTS};
use crate::error::{VestingError, VestingResult};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    Open,
    /// Disbursed to every participant. Terminal.
    Released,
    /// Closed without disbursement. Terminal.
    Rejected,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Participant {
    pub participant: Pubkey,
    pub amount: u64,
}

impl Participant {
    pub const SIZE: usize = 32 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    pub name: String,
    pub participants: Vec<Participant>,
    pub status: CampaignStatus,
}

impl Campaign {
    pub const SIZE: usize = (4 + MAX_NAME_LEN) + 4 + MAX_PARTICIPANTS * Participant::SIZE + 1;

    pub fn is_open(&self) -> bool {
        self.status == CampaignStatus::Open
    }

    pub fn total(&self) -> VestingResult<u64> {
        self.participants.iter().try_fold(0u64, |acc, p| {
            acc.checked_add(p.amount).ok_or(VestingError::MathOverflow)
        })
    }

    /// Participant list after upserting `updates`, without mutating `self`.
    pub fn merged(&self, updates: &[Participant]) -> VestingResult<Vec<Participant>> {
        let mut merged = self.participants.clone();
        for update in updates {
            match merged.iter_mut().find(|p| p.participant == update.participant) {
                Some(existing) => existing.amount = update.amount,
                None => merged.push(*update),
            }
        }
        if merged.len() > MAX_PARTICIPANTS {
            return Err(VestingError::CapacityExceeded);
        }
        Ok(merged)
    }
}

/// Zip the parallel participant/amount arrays of a campaign call.
pub fn participants_from_parts(
    participants: &[Pubkey],
    amounts: &[u64],
) -> VestingResult<Vec<Participant>> {
    if participants.len() != amounts.len() {
        return Err(VestingError::MalformedSchedule);
    }
    Ok(participants
        .iter()
        .zip(amounts)
        .map(|(&participant, &amount)| Participant {
            participant,
            amount,
        })
        .collect())
}
