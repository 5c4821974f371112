use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::allocate::Allocate;

pub fn create_campaign(
    ctx: Context<Allocate>,
    name: String,
    participants: Vec<Pubkey>,
    amounts: Vec<u64>,
) -> Result<()> {
    require!(
        !participants.is_empty() && participants.len() == amounts.len(),
        VestingError::MalformedSchedule
    );
    let ledger = ctx.accounts.ledger();
    let admin = ctx.accounts.admin.key();
    let controller = &mut ctx.accounts.controller;

    let total = controller.create_campaign(&ledger, admin, &name, &participants, &amounts)?;

    emit!(CampaignCreated {
        controller: controller.key(),
        name,
        participants: participants.len() as u8,
        total,
    });
    Ok(())
}

#[event]
pub struct CampaignCreated {
    pub controller: Pubkey,
    pub name: String,
    pub participants: u8,
    pub total: u64,
}
