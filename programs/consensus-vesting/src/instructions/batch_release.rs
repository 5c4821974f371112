use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::instructions::governed::Governed;
use crate::instructions::records::{batch_pairs, load_record, require_distinct, store_record};
use crate::instructions::settle::report_parked;

/// Admin push of every unlocked slot of up to `MAX_BATCH_RELEASE` beneficiaries.
///
/// Remaining accounts: `(record, token account)` pairs, one per beneficiary.
/// A beneficiary whose transfer fails is parked for `settle`; the rest are paid.
pub fn batch_release<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
) -> Result<()> {
    require!(!accounts.controller.is_paused(), VestingError::SystemPaused);
    let pairs = batch_pairs(remaining.len())?;
    let record_infos: Vec<&AccountInfo<'info>> = remaining.iter().step_by(2).collect();
    let token_infos: Vec<AccountInfo<'info>> = remaining.iter().skip(1).step_by(2).cloned().collect();
    let keys: Vec<Pubkey> = record_infos.iter().map(|info| info.key()).collect();
    require_distinct(&keys)?;

    let controller_key = accounts.controller.key();
    let mut records = record_infos
        .iter()
        .map(|info| load_record(info, &controller_key))
        .collect::<Result<Vec<_>>>()?;

    let mut ledger = accounts.ledger(&token_infos)?;
    let admin = accounts.admin.key();
    let now = Clock::get()?.unix_timestamp;
    let mark = accounts.controller.unsettled.len();

    let payout = accounts
        .controller
        .release_unlocked(&mut ledger, admin, &mut records, now)?;
    for (record, info) in records.iter().zip(&record_infos) {
        store_record(info, record)?;
    }
    report_parked(controller_key, &accounts.controller, mark);

    emit!(BatchReleased {
        controller: controller_key,
        admin,
        beneficiaries: pairs as u8,
        paid: payout.paid,
        parked: payout.parked as u8,
        released_at: now,
    });
    Ok(())
}

#[event]
pub struct BatchReleased {
    pub controller: Pubkey,
    pub admin: Pubkey,
    pub beneficiaries: u8,
    pub paid: u64,
    pub parked: u8,
    pub released_at: i64,
}
