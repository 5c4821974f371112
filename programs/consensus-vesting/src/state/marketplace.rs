use anchor_lang::prelude::*;

use crate::constants::{MAX_MINTERS, MAX_TOKENS, MAX_URI_LEN};
use crate::error::{VestingError, VestingResult};
use crate::ledger::AssetLedger;
use crate::state::{AdminSet, ConsensusGate, GateOutcome, Threshold};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NftToken {
    pub id: u64,
    pub owner: Pubkey,
    pub uri: String,
    /// Asking price in the marketplace mint; meaningful only while listed.
    pub price: u64,
    pub listed: bool,
}

impl NftToken {
    pub const SIZE: usize = 8 + 32 + (4 + MAX_URI_LEN) + 8 + 1;
}

/// A mint awaiting approval from every minter.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintAction {
    pub to: Pubkey,
    pub uri: String,
}

impl MintAction {
    pub const MAX_SIZE: usize = 32 + 4 + MAX_URI_LEN;
}

/// NFT registry with a fixed-price store, settled in the vesting token.
#[account]
pub struct Marketplace {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub bump: u8,
    pub minters: AdminSet,
    /// Consensus mints: committed once every current minter approved.
    pub mint_gate: ConsensusGate<MintAction>,
    pub next_token_id: u64,
    pub tokens: Vec<NftToken>,
}

impl Marketplace {
    pub const SIZE: usize = 32 + 32 + 1 +
        AdminSet::space(MAX_MINTERS) +                                  // minters
        1 + MintAction::MAX_SIZE + AdminSet::space(MAX_MINTERS) +       // mint_gate
        8 + 4 + MAX_TOKENS * NftToken::SIZE;

    pub fn new(owner: Pubkey, mint: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            mint,
            bump,
            minters: AdminSet::default(),
            mint_gate: ConsensusGate::default(),
            next_token_id: 0,
            tokens: Vec::new(),
        }
    }

    fn token(&self, id: u64) -> VestingResult<&NftToken> {
        self.tokens
            .iter()
            .find(|t| t.id == id)
            .ok_or(VestingError::UnknownToken)
    }

    fn token_mut(&mut self, id: u64) -> VestingResult<&mut NftToken> {
        self.tokens
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(VestingError::UnknownToken)
    }

    pub fn add_minter(&mut self, caller: Pubkey, minter: Pubkey) -> VestingResult<()> {
        if caller != self.owner {
            return Err(VestingError::NotAuthorized);
        }
        if !self.minters.insert(minter, MAX_MINTERS)? {
            return Err(VestingError::DuplicateMinter);
        }
        Ok(())
    }

    pub fn safe_mint(&mut self, caller: Pubkey, to: Pubkey, uri: &str) -> VestingResult<u64> {
        if caller != self.owner && !self.minters.contains(&caller) {
            return Err(VestingError::NotAuthorized);
        }
        self.mint_to(to, uri)
    }

    /// Propose minting `uri` to `to`, or approve it if it is the pending mint.
    /// Returns the new token id once every minter has approved.
    pub fn propose_mint(
        &mut self,
        caller: Pubkey,
        to: Pubkey,
        uri: &str,
    ) -> VestingResult<GateOutcome<u64>> {
        self.minters.require(&caller)?;
        validate_uri(uri)?;
        let action = MintAction {
            to,
            uri: uri.to_string(),
        };
        let outcome = self
            .mint_gate
            .propose(&self.minters, Threshold::Unanimous, action, caller)?;
        self.finish_mint(outcome)
    }

    /// Approve the pending mint.
    pub fn approve_mint(&mut self, caller: Pubkey) -> VestingResult<GateOutcome<u64>> {
        let outcome = self
            .mint_gate
            .approve(&self.minters, Threshold::Unanimous, caller)?;
        self.finish_mint(outcome)
    }

    fn finish_mint(&mut self, outcome: GateOutcome<MintAction>) -> VestingResult<GateOutcome<u64>> {
        match outcome {
            GateOutcome::Pending {
                approvals,
                required,
            } => Ok(GateOutcome::Pending {
                approvals,
                required,
            }),
            GateOutcome::Committed(action) => {
                Ok(GateOutcome::Committed(self.mint_to(action.to, &action.uri)?))
            }
        }
    }

    fn mint_to(&mut self, to: Pubkey, uri: &str) -> VestingResult<u64> {
        validate_uri(uri)?;
        if self.tokens.len() >= MAX_TOKENS {
            return Err(VestingError::CapacityExceeded);
        }
        let id = self.next_token_id;
        self.next_token_id = id.checked_add(1).ok_or(VestingError::MathOverflow)?;
        self.tokens.push(NftToken {
            id,
            owner: to,
            uri: uri.to_string(),
            price: 0,
            listed: false,
        });
        Ok(id)
    }

    /// List `token_id` at `price`.
    pub fn sell(&mut self, caller: Pubkey, token_id: u64, price: u64) -> VestingResult<()> {
        let token = self.token_mut(token_id)?;
        if token.owner != caller {
            return Err(VestingError::NotTokenOwner);
        }
        if price == 0 {
            return Err(VestingError::InvalidPrice);
        }
        if token.listed {
            return Err(VestingError::AlreadyListed);
        }
        token.price = price;
        token.listed = true;
        Ok(())
    }

    /// Buy a listed token. `ledger` pays out of the buyer's funds.
    /// Returns `(seller, price)`.
    pub fn purchase<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        buyer: Pubkey,
        token_id: u64,
    ) -> VestingResult<(Pubkey, u64)> {
        let (seller, price) = {
            let token = self.token(token_id)?;
            if !token.listed {
                return Err(VestingError::NotListed);
            }
            (token.owner, token.price)
        };
        if ledger.balance_of(&buyer) < price {
            return Err(VestingError::InsufficientFunds);
        }
        ledger.transfer(&seller, price)?;

        let token = self.token_mut(token_id)?;
        token.owner = buyer;
        token.listed = false;
        token.price = 0;
        Ok((seller, price))
    }

    /// Tokens currently listed for sale.
    pub fn public_store(&self) -> Vec<&NftToken> {
        self.tokens.iter().filter(|t| t.listed).collect()
    }

    pub fn pending_mint(&self) -> Option<&MintAction> {
        self.mint_gate.pending().map(|p| &p.action)
    }

    pub fn tokens_of(&self, owner: &Pubkey) -> Vec<u64> {
        self.tokens
            .iter()
            .filter(|t| t.owner == *owner)
            .map(|t| t.id)
            .collect()
    }

    pub fn owner_of(&self, token_id: u64) -> VestingResult<Pubkey> {
        Ok(self.token(token_id)?.owner)
    }

    pub fn token_uri(&self, token_id: u64) -> VestingResult<&str> {
        Ok(&self.token(token_id)?.uri)
    }

    pub fn price_of(&self, token_id: u64) -> VestingResult<u64> {
        let token = self.token(token_id)?;
        if !token.listed {
            return Err(VestingError::NotListed);
        }
        Ok(token.price)
    }
}

fn validate_uri(uri: &str) -> VestingResult<()> {
    if uri.is_empty() || uri.len() > MAX_URI_LEN {
        return Err(VestingError::InvalidUri);
    }
    Ok(())
}
