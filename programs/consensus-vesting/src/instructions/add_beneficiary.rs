use anchor_lang::prelude::*;

use crate::constants::MAX_POOLS;
use crate::error::VestingError;
use crate::instructions::allocate::Register;
use crate::state::PoolInput;

pub fn add_beneficiary(ctx: Context<Register>, identity: Pubkey, pools: Vec<PoolInput>) -> Result<()> {
    require!(identity != Pubkey::default(), VestingError::InvalidPubkey);
    require!(
        !pools.is_empty() && pools.len() <= MAX_POOLS,
        VestingError::MalformedSchedule
    );

    let ledger = ctx.accounts.ledger();
    let admin = ctx.accounts.admin.key();
    let controller_key = ctx.accounts.controller.key();

    let mut record = ctx
        .accounts
        .controller
        .add_beneficiary(&ledger, admin, identity, &pools)?;
    record.bump = ctx.bumps.record;
    let total = record.total_allocation()?;
    ctx.accounts.record.set_inner(record);

    emit!(BeneficiaryAdded {
        controller: controller_key,
        beneficiary: identity,
        pools: pools.len() as u8,
        total,
    });
    Ok(())
}

#[event]
pub struct BeneficiaryAdded {
    pub controller: Pubkey,
    pub beneficiary: Pubkey,
    pub pools: u8,
    pub total: u64,
}
