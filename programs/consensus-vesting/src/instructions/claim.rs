use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{BENEFICIARY_SEED, CONTROLLER_SEED, MAX_TRANCHES};
use crate::error::VestingError;
use crate::instructions::settle::keep_parked;
use crate::ledger::TokenLedger;
use crate::state::{Beneficiary, VestingController};

pub fn claim(ctx: Context<Claim>, pool: String, slot: u8) -> Result<()> {
    require!(!ctx.accounts.controller.is_paused(), VestingError::SystemPaused);
    require!((slot as usize) < MAX_TRANCHES, VestingError::SlotOutOfRange);
    let beneficiary = ctx.accounts.beneficiary.key();
    require_keys_eq!(ctx.accounts.record.identity, beneficiary, VestingError::NotAuthorized);

    let mut ledger = ctx.accounts.ledger();
    let now = Clock::get()?.unix_timestamp;
    let controller_key = ctx.accounts.controller.key();
    let controller = &mut ctx.accounts.controller;
    let record = &mut ctx.accounts.record;
    let mark = controller.unsettled.len();

    let result = controller.claim(&mut ledger, record, &pool, slot as usize, now);
    match keep_parked(result, controller_key, controller, mark)? {
        Some(amount) => emit!(TokensClaimed {
            controller: controller_key,
            beneficiary,
            pool,
            slot,
            amount,
            claimed_at: now,
        }),
        None => msg!("slot {} of {} recorded; transfer parked", slot, pool),
    }
    Ok(())
}

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Box<Account<'info, VestingController>>,

    #[account(
        mut,
        seeds = [BENEFICIARY_SEED, controller.key().as_ref(), beneficiary.key().as_ref()],
        bump = record.bump
    )]
    pub record: Box<Account<'info, Beneficiary>>,

    #[account(
        mut,
        address = controller.vault @ VestingError::InvalidTokenAccount,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = beneficiary_tokens.mint == controller.mint @ VestingError::InvalidTokenMint,
        constraint = beneficiary_tokens.owner == beneficiary.key() @ VestingError::InvalidTokenAccount,
    )]
    pub beneficiary_tokens: Account<'info, TokenAccount>,

    pub beneficiary: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Claim<'info> {
    pub fn ledger(&self) -> TokenLedger<'info> {
        TokenLedger::for_controller(
            self.token_program.to_account_info(),
            &self.vault,
            &self.controller,
        )
        .with_destination(&self.beneficiary_tokens)
    }
}

#[event]
pub struct TokensClaimed {
    pub controller: Pubkey,
    pub beneficiary: Pubkey,
    pub pool: String,
    pub slot: u8,
    pub amount: u64,
    pub claimed_at: i64,
}
