use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{BENEFICIARY_SEED, CONTROLLER_SEED};
use crate::error::VestingError;
use crate::ledger::TokenLedger;
use crate::state::{Beneficiary, VestingController};

/// Admin call that promises vault funds without moving them.
#[derive(Accounts)]
pub struct Allocate<'info> {
    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Box<Account<'info, VestingController>>,

    #[account(
        address = controller.vault @ VestingError::InvalidTokenAccount,
        constraint = vault.mint == controller.mint @ VestingError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Allocate<'info> {
    /// Read-only view of the vault, used for the funding check.
    pub fn ledger(&self) -> TokenLedger<'info> {
        TokenLedger::for_controller(
            self.token_program.to_account_info(),
            &self.vault,
            &self.controller,
        )
    }
}

/// Allocation that creates the beneficiary record of `identity`.
/// The record PDA can only be created once, so re-registering fails.
#[derive(Accounts)]
#[instruction(identity: Pubkey)]
pub struct Register<'info> {
    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Box<Account<'info, VestingController>>,

    #[account(
        init,
        payer = admin,
        space = 8 + Beneficiary::SIZE,
        seeds = [BENEFICIARY_SEED, controller.key().as_ref(), identity.as_ref()],
        bump
    )]
    pub record: Box<Account<'info, Beneficiary>>,

    #[account(
        address = controller.vault @ VestingError::InvalidTokenAccount,
        constraint = vault.mint == controller.mint @ VestingError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> Register<'info> {
    pub fn ledger(&self) -> TokenLedger<'info> {
        TokenLedger::for_controller(
            self.token_program.to_account_info(),
            &self.vault,
            &self.controller,
        )
    }
}
