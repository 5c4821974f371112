use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::governed::{run_gated, Governed};

pub fn revoke_admin_role<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
    target: Pubkey,
) -> Result<()> {
    require!(
        accounts.controller.is_admin(&accounts.admin.key()),
        VestingError::NotAuthorized
    );
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.revoke_admin_role(ledger, admin, target)
    })
}
