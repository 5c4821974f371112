use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::allocate::Allocate;

/// Upsert participants of an open campaign.
pub fn update_campaign(
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

    let total = controller.update_campaign(&ledger, admin, &name, &participants, &amounts)?;

    emit!(CampaignUpdated {
        controller: controller.key(),
        name,
        updated: participants.len() as u8,
        total,
    });
    Ok(())
}

#[event]
pub struct CampaignUpdated {
    pub controller: Pubkey,
    pub name: String,
    pub updated: u8,
    pub total: u64,
}
