use anchor_lang::prelude::*;

use crate::error::{VestingError, VestingResult};

/// Set of distinct identities holding a role (controller admins, marketplace minters).
///
/// Insertion order is kept so serialized state stays deterministic.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminSet {
    members: Vec<Pubkey>,
}

impl AdminSet {
    pub const fn space(capacity: usize) -> usize {
        4 + capacity * 32
    }

    pub fn with_member(member: Pubkey) -> Self {
        Self {
            members: vec![member],
        }
    }

    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.members.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add `identity`; returns `false` if it was already present.
    pub fn insert(&mut self, identity: Pubkey, capacity: usize) -> VestingResult<bool> {
        if self.contains(&identity) {
            return Ok(false);
        }
        if self.members.len() >= capacity {
            return Err(VestingError::AdminSetFull);
        }
        self.members.push(identity);
        Ok(true)
    }

    /// Remove `identity`. The set never drops below one member.
    pub fn remove(&mut self, identity: &Pubkey) -> VestingResult<()> {
        let idx = self
            .members
            .iter()
            .position(|m| m == identity)
            .ok_or(VestingError::UnknownAdmin)?;
        if self.members.len() == 1 {
            return Err(VestingError::CannotRemoveLastAdmin);
        }
        self.members.remove(idx);
        Ok(())
    }

    pub fn require(&self, identity: &Pubkey) -> VestingResult<()> {
        if self.contains(identity) {
            Ok(())
        } else {
            Err(VestingError::NotAuthorized)
        }
    }
}
