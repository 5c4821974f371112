use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::market::{MarketCall, NftEvent, NftEventKind};

pub fn safe_mint(ctx: Context<MarketCall>, to: Pubkey, uri: String) -> Result<()> {
    require!(to != Pubkey::default(), VestingError::InvalidPubkey);
    let caller = ctx.accounts.caller.key();
    let marketplace = &mut ctx.accounts.marketplace;
    let token_id = marketplace.safe_mint(caller, to, &uri)?;

    emit!(NftEvent {
        marketplace: marketplace.key(),
        kind: NftEventKind::Minted,
        token_id,
        from: caller,
        to,
        price: 0,
    });
    Ok(())
}
