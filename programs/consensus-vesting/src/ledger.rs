//! Fungible asset ledger seen from the core: a funding source that can pay out
//! to identities. On-chain this is the SPL token program reached through CPI.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::CONTROLLER_SEED;
use crate::error::{VestingError, VestingResult};
use crate::state::VestingController;

pub trait AssetLedger {
    /// Move `amount` from the ledger's funding source to `to`.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> VestingResult<()>;

    /// Balance held by `identity`; unknown identities hold nothing.
    fn balance_of(&self, identity: &Pubkey) -> u64;
}

struct Destination<'info> {
    owner: Pubkey,
    amount: u64,
    info: AccountInfo<'info>,
}

/// PDA authority of a controller vault: seeds `["controller", mint, bump]`.
struct PdaSigner {
    mint: Pubkey,
    bump: u8,
}

/// `AssetLedger` over SPL token accounts.
///
/// The funding source is either the controller vault (signed by the controller
/// PDA) or a payer's token account (signed by the payer). Destinations are
/// token accounts keyed by their owner wallet.
pub struct TokenLedger<'info> {
    token_program: AccountInfo<'info>,
    source: AccountInfo<'info>,
    source_identity: Pubkey,
    source_balance: u64,
    authority: AccountInfo<'info>,
    pda_signer: Option<PdaSigner>,
    destinations: Vec<Destination<'info>>,
}

impl<'info> TokenLedger<'info> {
    /// Pay out of a controller vault. The vault's balance is reported under the vault address.
    pub fn from_vault(
        token_program: AccountInfo<'info>,
        vault: &Account<'info, TokenAccount>,
        controller: AccountInfo<'info>,
        mint: Pubkey,
        bump: u8,
    ) -> Self {
        Self {
            token_program,
            source: vault.to_account_info(),
            source_identity: vault.key(),
            source_balance: vault.amount,
            authority: controller,
            pda_signer: Some(PdaSigner { mint, bump }),
            destinations: Vec::new(),
        }
    }

    /// Pay out of the vault of `controller`, signed by the controller PDA.
    pub fn for_controller(
        token_program: AccountInfo<'info>,
        vault: &Account<'info, TokenAccount>,
        controller: &Account<'info, VestingController>,
    ) -> Self {
        Self::from_vault(
            token_program,
            vault,
            controller.to_account_info(),
            controller.mint,
            controller.bump,
        )
    }

    /// Pay out of `payer_tokens`, signed by `payer`. The balance is reported under the payer wallet.
    pub fn from_payer(
        token_program: AccountInfo<'info>,
        payer_tokens: &Account<'info, TokenAccount>,
        payer: AccountInfo<'info>,
    ) -> Self {
        Self {
            token_program,
            source: payer_tokens.to_account_info(),
            source_identity: payer.key(),
            source_balance: payer_tokens.amount,
            authority: payer,
            pda_signer: None,
            destinations: Vec::new(),
        }
    }

    pub fn with_destination(mut self, tokens: &Account<'info, TokenAccount>) -> Self {
        self.destinations.push(Destination {
            owner: tokens.owner,
            amount: tokens.amount,
            info: tokens.to_account_info(),
        });
        self
    }

    /// Add token accounts passed as remaining accounts. Each must be an SPL
    /// token account of `mint`; validated by unpacking.
    pub fn with_destinations(
        mut self,
        infos: &[AccountInfo<'info>],
        mint: &Pubkey,
    ) -> VestingResult<Self> {
        for info in infos {
            if *info.owner != token::ID {
                return Err(VestingError::InvalidTokenAccount);
            }
            let parsed = {
                let data = info
                    .try_borrow_data()
                    .map_err(|_| VestingError::InvalidTokenAccount)?;
                TokenAccount::try_deserialize(&mut &data[..])
                    .map_err(|_| VestingError::InvalidTokenAccount)?
            };
            if parsed.mint != *mint {
                return Err(VestingError::InvalidTokenMint);
            }
            self.destinations.push(Destination {
                owner: parsed.owner,
                amount: parsed.amount,
                info: info.clone(),
            });
        }
        Ok(self)
    }

    fn cpi_transfer(&self, to: AccountInfo<'info>, amount: u64) -> Result<()> {
        let accounts = Transfer {
            from: self.source.clone(),
            to,
            authority: self.authority.clone(),
        };
        match &self.pda_signer {
            Some(signer) => {
                let bump = [signer.bump];
                let seeds: &[&[u8]] = &[CONTROLLER_SEED, signer.mint.as_ref(), &bump];
                let signer_seeds: &[&[&[u8]]] = &[seeds];
                token::transfer(
                    CpiContext::new_with_signer(self.token_program.clone(), accounts, signer_seeds),
                    amount,
                )
            }
            None => token::transfer(
                CpiContext::new(self.token_program.clone(), accounts),
                amount,
            ),
        }
    }
}

impl<'info> AssetLedger for TokenLedger<'info> {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> VestingResult<()> {
        if amount > self.source_balance {
            msg!("transfer of {} to {} exceeds source balance {}", amount, to, self.source_balance);
            return Err(VestingError::TransferFailed);
        }
        let idx = match self.destinations.iter().position(|d| d.owner == *to) {
            Some(idx) => idx,
            None => {
                msg!("no token account supplied for {}", to);
                return Err(VestingError::TransferFailed);
            }
        };
        let info = self.destinations[idx].info.clone();
        self.cpi_transfer(info, amount).map_err(|e| {
            msg!("token transfer to {} failed: {:?}", to, e);
            VestingError::TransferFailed
        })?;

        self.source_balance -= amount;
        let dest = &mut self.destinations[idx];
        dest.amount = dest.amount.saturating_add(amount);
        Ok(())
    }

    fn balance_of(&self, identity: &Pubkey) -> u64 {
        if *identity == self.source_identity {
            return self.source_balance;
        }
        self.destinations
            .iter()
            .find(|d| d.owner == *identity)
            .map_or(0, |d| d.amount)
    }
}
