use anchor_lang::prelude::*;

use crate::instructions::governed::{run_gated, Governed};

/// Propose releasing (`commit = true`) or rejecting a campaign.
pub fn release<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
    name: String,
    commit: bool,
) -> Result<()> {
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.release(ledger, admin, &name, commit)
    })
}
