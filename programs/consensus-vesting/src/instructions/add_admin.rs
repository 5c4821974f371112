use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::governed::{run_gated, Governed};

/// Admin additions go through consensus like every other governance change.
pub fn add_admin<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
    new_admin: Pubkey,
) -> Result<()> {
    require!(new_admin != Pubkey::default(), VestingError::InvalidPubkey);
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.add_admin(ledger, admin, new_admin)
    })
}
