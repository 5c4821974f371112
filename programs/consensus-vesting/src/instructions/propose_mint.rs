use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::market::{report_mint, MarketCall};

/// Open a consensus mint of `uri` to `to`, or approve it if it is the pending one.
/// The token is minted once every minter has approved.
pub fn propose_mint(ctx: Context<MarketCall>, to: Pubkey, uri: String) -> Result<()> {
    require!(to != Pubkey::default(), VestingError::InvalidPubkey);
    let caller = ctx.accounts.caller.key();
    let marketplace_key = ctx.accounts.marketplace.key();
    let marketplace = &mut ctx.accounts.marketplace;

    let outcome = marketplace.propose_mint(caller, to, &uri)?;
    report_mint(marketplace_key, caller, to, outcome);
    Ok(())
}
