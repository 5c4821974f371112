use anchor_lang::prelude::*;

use crate::constants::INVESTOR_POOL;
use crate::error::VestingError;
use crate::instructions::add_beneficiary::BeneficiaryAdded;
use crate::instructions::allocate::Register;

/// Split `amount` over the controller's default schedule.
pub fn add_investor(ctx: Context<Register>, identity: Pubkey, amount: u64) -> Result<()> {
    require!(identity != Pubkey::default(), VestingError::InvalidPubkey);
    require!(
        !ctx.accounts.controller.default_schedule.is_empty(),
        VestingError::MalformedSchedule
    );

    let ledger = ctx.accounts.ledger();
    let admin = ctx.accounts.admin.key();
    let controller_key = ctx.accounts.controller.key();

    let mut record = ctx
        .accounts
        .controller
        .add_investor(&ledger, admin, identity, amount)?;
    record.bump = ctx.bumps.record;
    msg!(
        "investor {} vests {} over {} {} tranches",
        identity,
        amount,
        record.pools.first().map_or(0, |p| p.tranches.len()),
        INVESTOR_POOL
    );
    ctx.accounts.record.set_inner(record);

    emit!(BeneficiaryAdded {
        controller: controller_key,
        beneficiary: identity,
        pools: 1,
        total: amount,
    });
    Ok(())
}
