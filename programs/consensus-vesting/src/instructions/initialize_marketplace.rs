use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::MARKETPLACE_SEED;
use crate::state::Marketplace;

pub fn initialize_marketplace(ctx: Context<InitializeMarketplace>) -> Result<()> {
    let marketplace = Marketplace::new(
        ctx.accounts.owner.key(),
        ctx.accounts.mint.key(),
        ctx.bumps.marketplace,
    );
    ctx.accounts.marketplace.set_inner(marketplace);
    msg!("marketplace for {} owned by {}", ctx.accounts.mint.key(), ctx.accounts.owner.key());
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeMarketplace<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + Marketplace::SIZE,
        seeds = [MARKETPLACE_SEED, mint.key().as_ref()],
        bump
    )]
    pub marketplace: Box<Account<'info, Marketplace>>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}
