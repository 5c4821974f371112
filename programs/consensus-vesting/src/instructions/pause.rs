use anchor_lang::prelude::*;

use crate::instructions::governed::{run_gated, Governed};

/// Propose (or approve) pausing all claims.
pub fn pause<'info>(accounts: &mut Governed<'info>, remaining: &[AccountInfo<'info>]) -> Result<()> {
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.pause(ledger, admin)
    })
}
