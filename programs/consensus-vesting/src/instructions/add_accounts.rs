use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{CONTROLLER_SEED, MAX_ACCOUNTS_BATCH};
use crate::error::VestingError;
use crate::instructions::records::{create_record, record_address};
use crate::ledger::TokenLedger;
use crate::state::VestingController;

/// Community allocation: each account gets a single tranche at `release_ts`.
///
/// Remaining accounts: the uninitialized record PDA of every identity, in order.
pub fn add_accounts<'info>(
    accounts: &mut AddAccounts<'info>,
    remaining: &[AccountInfo<'info>],
    identities: Vec<Pubkey>,
    amounts: Vec<u64>,
    release_ts: i64,
) -> Result<()> {
    require!(
        identities.len() <= MAX_ACCOUNTS_BATCH,
        VestingError::CapacityExceeded
    );
    require!(
        remaining.len() == identities.len(),
        VestingError::InvalidBeneficiaryAccount
    );
    require!(
        identities.iter().all(|id| *id != Pubkey::default()),
        VestingError::InvalidPubkey
    );

    let ledger = TokenLedger::for_controller(
        accounts.token_program.to_account_info(),
        &accounts.vault,
        &accounts.controller,
    );
    let admin = accounts.admin.key();
    let controller_key = accounts.controller.key();

    let records = accounts
        .controller
        .add_accounts(&ledger, admin, &identities, &amounts, release_ts)?;

    let mut total: u64 = 0;
    for (mut record, info) in records.into_iter().zip(remaining) {
        let (address, bump) = record_address(&controller_key, &record.identity);
        require_keys_eq!(info.key(), address, VestingError::InvalidBeneficiaryAccount);
        record.bump = bump;
        total = total
            .checked_add(record.total_allocation()?)
            .ok_or(VestingError::MathOverflow)?;
        create_record(
            info,
            &record,
            &controller_key,
            accounts.admin.to_account_info(),
            accounts.system_program.to_account_info(),
        )?;
    }

    emit!(CommunityAccountsAdded {
        controller: controller_key,
        count: identities.len() as u8,
        total,
        release_ts,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct AddAccounts<'info> {
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

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct CommunityAccountsAdded {
    pub controller: Pubkey,
    pub count: u8,
    pub total: u64,
    pub release_ts: i64,
}
