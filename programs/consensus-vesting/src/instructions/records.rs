//! Beneficiary records passed as remaining accounts, for calls that touch a
//! variable number of them (`add_accounts`, `batch_release`).

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, CreateAccount};

use crate::constants::{BENEFICIARY_SEED, MAX_BATCH_RELEASE};
use crate::error::VestingError;
use crate::state::Beneficiary;

pub fn record_address(controller: &Pubkey, identity: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[BENEFICIARY_SEED, controller.as_ref(), identity.as_ref()],
        &crate::ID,
    )
}

/// Create the record PDA at `info` and write `record` into it. `record.bump`
/// must be the canonical bump of its address.
pub fn create_record<'info>(
    info: &AccountInfo<'info>,
    record: &Beneficiary,
    controller: &Pubkey,
    payer: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
) -> Result<()> {
    require!(info.data_is_empty(), VestingError::DuplicateBeneficiary);
    let space = 8 + Beneficiary::SIZE;
    let lamports = Rent::get()?.minimum_balance(space);
    let bump = [record.bump];
    let seeds: &[&[u8]] = &[
        BENEFICIARY_SEED,
        controller.as_ref(),
        record.identity.as_ref(),
        &bump,
    ];
    system_program::create_account(
        CpiContext::new_with_signer(
            system_program,
            CreateAccount {
                from: payer,
                to: info.clone(),
            },
            &[seeds],
        ),
        lamports,
        space as u64,
        &crate::ID,
    )?;
    store_record(info, record)
}

/// Deserialize a record owned by this program and check it sits at its PDA.
pub fn load_record(info: &AccountInfo, controller: &Pubkey) -> Result<Beneficiary> {
    require_keys_eq!(*info.owner, crate::ID, VestingError::InvalidBeneficiaryAccount);
    require!(info.is_writable, VestingError::InvalidBeneficiaryAccount);
    let record = {
        let data = info.try_borrow_data()?;
        Beneficiary::try_deserialize(&mut &data[..])?
    };
    let expected = Pubkey::create_program_address(
        &[
            BENEFICIARY_SEED,
            controller.as_ref(),
            record.identity.as_ref(),
            &[record.bump],
        ],
        &crate::ID,
    )
    .map_err(|_| VestingError::InvalidBeneficiaryAccount)?;
    require_keys_eq!(info.key(), expected, VestingError::InvalidBeneficiaryAccount);
    Ok(record)
}

pub fn store_record(info: &AccountInfo, record: &Beneficiary) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}

/// Number of (record, token account) pairs in a `batch_release` call.
pub fn batch_pairs(remaining: usize) -> Result<usize> {
    require!(
        remaining > 0 && remaining % 2 == 0,
        VestingError::InvalidBeneficiaryAccount
    );
    require!(remaining / 2 <= MAX_BATCH_RELEASE, VestingError::CapacityExceeded);
    Ok(remaining / 2)
}

/// The same record twice in one batch would be paid twice.
pub fn require_distinct(keys: &[Pubkey]) -> Result<()> {
    for (i, key) in keys.iter().enumerate() {
        require!(!keys[..i].contains(key), VestingError::DuplicateBeneficiary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn batch_layout_is_pairs_within_the_cap() {
        assert_eq!(batch_pairs(2).unwrap(), 1);
        assert_eq!(batch_pairs(2 * MAX_BATCH_RELEASE).unwrap(), MAX_BATCH_RELEASE);
        assert_eq!(
            batch_pairs(0).unwrap_err(),
            anchor_lang::error::Error::from(VestingError::InvalidBeneficiaryAccount)
        );
        assert_eq!(
            batch_pairs(3).unwrap_err(),
            anchor_lang::error::Error::from(VestingError::InvalidBeneficiaryAccount)
        );
        assert_eq!(
            batch_pairs(2 * MAX_BATCH_RELEASE + 2).unwrap_err(),
            anchor_lang::error::Error::from(VestingError::CapacityExceeded)
        );
    }

    #[test]
    fn repeated_record_is_rejected() {
        assert!(require_distinct(&[key(1), key(2), key(3)]).is_ok());
        assert_eq!(
            require_distinct(&[key(1), key(2), key(1)]).unwrap_err(),
            anchor_lang::error::Error::from(VestingError::DuplicateBeneficiary)
        );
    }

    #[test]
    fn record_address_is_per_controller_and_identity() {
        let (a, _) = record_address(&key(1), &key(10));
        let (b, _) = record_address(&key(1), &key(11));
        let (c, _) = record_address(&key(2), &key(10));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(record_address(&key(1), &key(10)).0, a);
    }

    #[test]
    fn record_round_trips_through_account_data() {
        let (address, bump) = record_address(&key(1), &key(10));
        let mut record = Beneficiary::new(key(10), Vec::new());
        record.bump = bump;

        let mut lamports = 0u64;
        let mut data = vec![0u8; 8 + Beneficiary::SIZE];
        let owner = crate::ID;
        let info = AccountInfo::new(
            &address,
            false,
            true,
            &mut lamports,
            &mut data,
            &owner,
            false,
            0,
        );
        store_record(&info, &record).unwrap();
        assert_eq!(load_record(&info, &key(1)).unwrap(), record);
        assert_eq!(
            load_record(&info, &key(2)).unwrap_err(),
            anchor_lang::error::Error::from(VestingError::InvalidBeneficiaryAccount)
        );
    }
}
