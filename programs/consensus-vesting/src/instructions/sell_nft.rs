use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::market::{MarketCall, NftEvent, NftEventKind};

/// List an owned token at a fixed price.
pub fn sell_nft(ctx: Context<MarketCall>, token_id: u64, price: u64) -> Result<()> {
    require!(price > 0, VestingError::InvalidPrice);
    let caller = ctx.accounts.caller.key();
    let marketplace = &mut ctx.accounts.marketplace;
    marketplace.sell(caller, token_id, price)?;

    emit!(NftEvent {
        marketplace: marketplace.key(),
        kind: NftEventKind::Listed,
        token_id,
        from: caller,
        to: caller,
        price,
    });
    Ok(())
}
