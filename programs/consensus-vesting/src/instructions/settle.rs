use anchor_lang::prelude::*;

use crate::error::{VestingError, VestingResult};
use crate::instructions::governed::Governed;
use crate::state::{SettlementOrigin, VestingController};

/// Retry a parked transfer. The recipient's token account goes in the remaining accounts.
pub fn settle<'info>(
    accounts: &mut Governed<'info>,
    remaining: &[AccountInfo<'info>],
    index: u8,
) -> Result<()> {
    require!(
        accounts.controller.is_admin(&accounts.admin.key()),
        VestingError::NotAuthorized
    );
    require!(
        (index as usize) < accounts.controller.unsettled.len(),
        VestingError::UnknownSettlement
    );
    require!(!remaining.is_empty(), VestingError::InvalidTokenAccount);

    let mut ledger = accounts.ledger(remaining)?;
    let admin = accounts.admin.key();
    let controller_key = accounts.controller.key();

    let entry = accounts
        .controller
        .settle(&mut ledger, admin, index as usize)?;

    let campaign = match &entry.origin {
        SettlementOrigin::Campaign { name } => Some(name.clone()),
        SettlementOrigin::Claim { .. } => None,
    };
    emit!(ClaimSettled {
        controller: controller_key,
        recipient: entry.recipient,
        amount: entry.amount,
        campaign,
    });
    Ok(())
}

/// Report every transfer parked since `mark`. Returns how many there were.
pub(crate) fn report_parked(
    controller_key: Pubkey,
    controller: &VestingController,
    mark: usize,
) -> usize {
    let parked = controller.unsettled.get(mark..).unwrap_or(&[]);
    for entry in parked {
        msg!(
            "PARKED: {} owed {} ({:?}); settle manually",
            entry.recipient,
            entry.amount,
            entry.origin
        );
        emit!(TransferParked {
            controller: controller_key,
            recipient: entry.recipient,
            amount: entry.amount,
            origin: entry.origin.clone(),
        });
    }
    parked.len()
}

/// A `TransferFailed` raised after claim state was recorded is a committed
/// outcome: its entries are parked, so the call must succeed for them (and the
/// claim flags) to persist. Returns `None` in that case. Any other error is
/// returned as is.
pub(crate) fn keep_parked<T>(
    result: VestingResult<T>,
    controller_key: Pubkey,
    controller: &VestingController,
    mark: usize,
) -> Result<Option<T>> {
    match result {
        Ok(value) => {
            report_parked(controller_key, controller, mark);
            Ok(Some(value))
        }
        Err(VestingError::TransferFailed) if controller.unsettled.len() > mark => {
            report_parked(controller_key, controller, mark);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[event]
pub struct ClaimSettled {
    pub controller: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub campaign: Option<String>,
}

#[event]
pub struct TransferParked {
    pub controller: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub origin: SettlementOrigin,
}
