use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::MARKETPLACE_SEED;
use crate::error::VestingError;
use crate::instructions::market::{NftEvent, NftEventKind};
use crate::ledger::TokenLedger;
use crate::state::Marketplace;

/// Buy a listed token, paying the seller in the marketplace mint.
pub fn purchase_nft(ctx: Context<PurchaseNft>, token_id: u64) -> Result<()> {
    let buyer = ctx.accounts.buyer.key();
    let seller = ctx.accounts.marketplace.owner_of(token_id)?;
    require_keys_eq!(ctx.accounts.seller_tokens.owner, seller, VestingError::InvalidTokenAccount);
    require_keys_neq!(buyer, seller, VestingError::NotAuthorized);
    let mut ledger = TokenLedger::from_payer(
        ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.buyer_tokens,
        ctx.accounts.buyer.to_account_info(),
    )
    .with_destination(&ctx.accounts.seller_tokens);

    let marketplace = &mut ctx.accounts.marketplace;
    let (seller, price) = marketplace.purchase(&mut ledger, buyer, token_id)?;

    emit!(NftEvent {
        marketplace: marketplace.key(),
        kind: NftEventKind::Sold,
        token_id,
        from: seller,
        to: buyer,
        price,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct PurchaseNft<'info> {
    #[account(
        mut,
        seeds = [MARKETPLACE_SEED, marketplace.mint.as_ref()],
        bump = marketplace.bump
    )]
    pub marketplace: Box<Account<'info, Marketplace>>,

    #[account(
        mut,
        constraint = buyer_tokens.mint == marketplace.mint @ VestingError::InvalidTokenMint,
        constraint = buyer_tokens.owner == buyer.key() @ VestingError::InvalidTokenAccount,
    )]
    pub buyer_tokens: Account<'info, TokenAccount>,

    /// Must belong to the current owner of the token.
    #[account(
        mut,
        constraint = seller_tokens.mint == marketplace.mint @ VestingError::InvalidTokenMint,
    )]
    pub seller_tokens: Account<'info, TokenAccount>,

    pub buyer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
