use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::CONTROLLER_SEED;
use crate::error::{VestingError, VestingResult};
use crate::instructions::settle::report_parked;
use crate::ledger::TokenLedger;
use crate::state::{Action, GateReport, GateStatus, VestingController};

/// Admin call on a controller that may pay out of the vault.
///
/// Remaining accounts: recipient token accounts of the controller mint, one per
/// wallet that the call may pay (campaign participants, settlement recipient).
#[derive(Accounts)]
pub struct Governed<'info> {
    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Box<Account<'info, VestingController>>,

    #[account(
        mut,
        address = controller.vault @ VestingError::InvalidTokenAccount,
        constraint = vault.mint == controller.mint @ VestingError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Governed<'info> {
    pub fn ledger(&self, remaining: &[AccountInfo<'info>]) -> Result<TokenLedger<'info>> {
        let ledger = TokenLedger::for_controller(
            self.token_program.to_account_info(),
            &self.vault,
            &self.controller,
        )
        .with_destinations(remaining, &self.controller.mint)?;
        Ok(ledger)
    }
}

/// Run one consensus-gated operation and report its outcome as events.
///
/// A committed release whose transfers partly failed still succeeds: the
/// failures are parked on the controller and reported as `TransferParked`.
pub(crate) fn run_gated<'info, F>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
    op: F,
) -> Result<()>
where
    F: FnOnce(&mut VestingController, &mut TokenLedger<'info>, Pubkey) -> VestingResult<GateReport>,
{
    let mut ledger = accounts.ledger(remaining)?;
    let admin = accounts.admin.key();
    let controller_key = accounts.controller.key();
    let controller: &mut VestingController = &mut accounts.controller;
    let opened = controller.pending_action().is_none();
    let mark = controller.unsettled.len();

    let report = op(&mut *controller, &mut ledger, admin)?;
    let fingerprint = report.action.fingerprint();

    match report.status {
        GateStatus::Pending {
            approvals,
            required,
        } => {
            if opened {
                emit!(ActionProposed {
                    controller: controller_key,
                    proposer: admin,
                    action: report.action.clone(),
                    fingerprint,
                    required: required as u8,
                });
            } else {
                emit!(ActionApproved {
                    controller: controller_key,
                    approver: admin,
                    fingerprint,
                    approvals: approvals as u8,
                    required: required as u8,
                });
            }
        }
        GateStatus::Committed => {
            msg!("consensus reached: {:?}", report.action);
            emit!(ActionCommitted {
                controller: controller_key,
                committer: admin,
                action: report.action.clone(),
                fingerprint,
            });
            if let Action::Release { campaign, commit } = &report.action {
                emit!(CampaignReleased {
                    controller: controller_key,
                    name: campaign.clone(),
                    commit: *commit,
                    disbursed: report.disbursed,
                    parked: report.parked as u8,
                });
            }
            report_parked(controller_key, controller, mark);
        }
    }
    Ok(())
}

#[event]
pub struct ActionProposed {
    pub controller: Pubkey,
    pub proposer: Pubkey,
    pub action: Action,
    pub fingerprint: [u8; 32],
    pub required: u8,
}

#[event]
pub struct ActionApproved {
    pub controller: Pubkey,
    pub approver: Pubkey,
    pub fingerprint: [u8; 32],
    pub approvals: u8,
    pub required: u8,
}

#[event]
pub struct ActionCommitted {
    pub controller: Pubkey,
    pub committer: Pubkey,
    pub action: Action,
    pub fingerprint: [u8; 32],
}

#[event]
pub struct CampaignReleased {
    pub controller: Pubkey,
    pub name: String,
    /// `false` when the campaign was rejected.
    pub commit: bool,
    pub disbursed: u64,
    /// Transfers left for `settle`.
    pub parked: u8,
}
