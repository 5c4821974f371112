use anchor_lang::prelude::*;

use crate::instructions::governed::{run_gated, Governed};

pub fn unpause<'info>(accounts: &mut Governed<'info>, remaining: &[AccountInfo<'info>]) -> Result<()> {
    run_gated(accounts, remaining, |controller, ledger, admin| {
        controller.unpause(ledger, admin)
    })
}
