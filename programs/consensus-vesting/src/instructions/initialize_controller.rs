use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{CONTROLLER_SEED, VAULT_SEED};
use crate::state::{ControllerConfig, VestingController};

pub fn initialize_controller(
    ctx: Context<InitializeController>,
    config: ControllerConfig,
) -> Result<()> {
    let controller = VestingController::new(
        ctx.accounts.mint.key(),
        ctx.accounts.vault.key(),
        ctx.bumps.controller,
        ctx.accounts.admin.key(),
        &config,
    )?;
    ctx.accounts.controller.set_inner(controller);

    emit!(ControllerInitialized {
        controller: ctx.accounts.controller.key(),
        mint: ctx.accounts.mint.key(),
        vault: ctx.accounts.vault.key(),
        admin: ctx.accounts.admin.key(),
        default_steps: ctx.accounts.controller.default_schedule.len() as u8,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeController<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + VestingController::SIZE,
        seeds = [CONTROLLER_SEED, mint.key().as_ref()],
        bump
    )]
    pub controller: Box<Account<'info, VestingController>>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = controller,
        seeds = [VAULT_SEED, controller.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct ControllerInitialized {
    pub controller: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub default_steps: u8,
}
