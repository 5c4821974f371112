use anchor_lang::prelude::*;

use crate::instructions::governed::{run_gated, Governed};

/// Approve whatever action is pending. A campaign release commits here once the
/// last approval lands, so the participants' token accounts must be attached.
pub fn admin_accept<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
) -> Result<()> {
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.admin_accept(ledger, admin)
    })
}
