use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::market::MarketCall;

pub fn add_minter(ctx: Context<MarketCall>, minter: Pubkey) -> Result<()> {
    require!(minter != Pubkey::default(), VestingError::InvalidPubkey);
    let caller = ctx.accounts.caller.key();
    require_keys_eq!(caller, ctx.accounts.marketplace.owner, VestingError::NotAuthorized);
    ctx.accounts.marketplace.add_minter(caller, minter)?;
    msg!("minter {} added", minter);
    Ok(())
}
