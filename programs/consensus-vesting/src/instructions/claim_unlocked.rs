use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::claim::Claim;
use crate::instructions::settle::keep_parked;

/// Claim every unlocked slot of the signer across all of its pools.
pub fn claim_unlocked(ctx: Context<Claim>) -> Result<()> {
    require!(!ctx.accounts.controller.is_paused(), VestingError::SystemPaused);
    let beneficiary = ctx.accounts.beneficiary.key();
    require_keys_eq!(ctx.accounts.record.identity, beneficiary, VestingError::NotAuthorized);

    let mut ledger = ctx.accounts.ledger();
    let now = Clock::get()?.unix_timestamp;
    let controller_key = ctx.accounts.controller.key();
    let controller = &mut ctx.accounts.controller;
    let record = &mut ctx.accounts.record;
    let mark = controller.unsettled.len();
    let disbursed_before = controller.disbursed;

    let result = controller.claim_unlocked(&mut ledger, record, now);
    let amount = match keep_parked(result, controller_key, controller, mark)? {
        Some(amount) => amount,
        // Part of the batch may have gone through before the failure.
        None => controller
            .disbursed
            .checked_sub(disbursed_before)
            .ok_or(VestingError::MathOverflow)?,
    };
    if amount == 0 {
        msg!("nothing paid to {}", beneficiary);
        return Ok(());
    }

    emit!(UnlockedClaimed {
        controller: controller_key,
        beneficiary,
        amount,
        claimed_at: now,
    });
    Ok(())
}

#[event]
pub struct UnlockedClaimed {
    pub controller: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub claimed_at: i64,
}
