use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::market::{report_mint, MarketCall};

pub fn approve_mint(ctx: Context<MarketCall>) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    let marketplace_key = ctx.accounts.marketplace.key();
    let marketplace = &mut ctx.accounts.marketplace;
    let to = marketplace
        .pending_mint()
        .map(|m| m.to)
        .ok_or(VestingError::NoActivePending)?;

    let outcome = marketplace.approve_mint(caller)?;
    report_mint(marketplace_key, caller, to, outcome);
    Ok(())
}
