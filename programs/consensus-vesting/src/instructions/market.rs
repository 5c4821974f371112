use anchor_lang::prelude::*;

use crate::constants::MARKETPLACE_SEED;
use crate::state::{GateOutcome, Marketplace};

/// Signed call against a marketplace that moves no tokens.
#[derive(Accounts)]
pub struct MarketCall<'info> {
    #[account(
        mut,
        seeds = [MARKETPLACE_SEED, marketplace.mint.as_ref()],
        bump = marketplace.bump
    )]
    pub marketplace: Box<Account<'info, Marketplace>>,

    pub caller: Signer<'info>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NftEventKind {
    Minted,
    Listed,
    Sold,
}

#[event]
pub struct NftEvent {
    pub marketplace: Pubkey,
    pub kind: NftEventKind,
    pub token_id: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub price: u64,
}

#[event]
pub struct MintApproved {
    pub marketplace: Pubkey,
    pub approver: Pubkey,
    pub to: Pubkey,
    pub approvals: u8,
    pub required: u8,
}

/// Emit the outcome of a consensus mint vote.
pub(crate) fn report_mint(
    marketplace_key: Pubkey,
    caller: Pubkey,
    to: Pubkey,
    outcome: GateOutcome<u64>,
) {
    match outcome {
        GateOutcome::Pending {
            approvals,
            required,
        } => emit!(MintApproved {
            marketplace: marketplace_key,
            approver: caller,
            to,
            approvals: approvals as u8,
            required: required as u8,
        }),
        GateOutcome::Committed(token_id) => {
            msg!("every minter approved; token {} minted", token_id);
            emit!(NftEvent {
                marketplace: marketplace_key,
                kind: NftEventKind::Minted,
                token_id,
                from: caller,
                to,
                price: 0,
            });
        }
    }
}
