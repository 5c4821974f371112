use anchor_lang::prelude::*;

use crate::constants::{MAX_ADMINS, MAX_NAME_LEN};
use crate::error::{VestingError, VestingResult};
use crate::state::AdminSet;

/// How many current admins must approve before a pending action commits.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Threshold {
    /// Every member of the current admin set.
    #[default]
    Unanimous,
    /// At least `n` current admins, capped at the admin set size.
    AtLeast(u8),
}

impl Threshold {
    pub const SIZE: usize = 1 + 1;

    pub fn validate(self) -> VestingResult<()> {
        match self {
            Threshold::AtLeast(0) => Err(VestingError::InvalidThreshold),
            Threshold::AtLeast(n) if n as usize > MAX_ADMINS => Err(VestingError::InvalidThreshold),
            _ => Ok(()),
        }
    }

    pub fn required(self, admins: &AdminSet) -> usize {
        match self {
            Threshold::Unanimous => admins.len(),
            Threshold::AtLeast(n) => (n as usize).min(admins.len()),
        }
    }
}

/// Administrative operations that only take effect after consensus.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Pause,
    Unpause,
    AddAdmin { admin: Pubkey },
    RevokeAdmin { admin: Pubkey },
    Release { campaign: String, commit: bool },
}

impl Action {
    // Largest variant: a pubkey, or a name plus the commit flag.
    pub const MAX_SIZE: usize = 1 + if 32 > 4 + MAX_NAME_LEN + 1 {
        32
    } else {
        4 + MAX_NAME_LEN + 1
    };

    /// Stable identifier used to correlate proposal, approval and commit events.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        match self {
            Action::Pause => {
                hasher.update(b"pause");
            }
            Action::Unpause => {
                hasher.update(b"unpause");
            }
            Action::AddAdmin { admin } => {
                hasher.update(b"add_admin");
                hasher.update(admin.as_ref());
            }
            Action::RevokeAdmin { admin } => {
                hasher.update(b"revoke_admin");
                hasher.update(admin.as_ref());
            }
            Action::Release { campaign, commit } => {
                hasher.update(b"release");
                hasher.update(campaign.as_bytes());
                hasher.update(&[*commit as u8]);
            }
        }
        *hasher.finalize().as_bytes()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingAction<A> {
    pub action: A,
    pub approvals: Vec<Pubkey>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome<A> {
    Pending { approvals: usize, required: usize },
    Committed(A),
}

/// Single-slot approval state machine: `NoPending` or `Pending(action, approvals)`.
///
/// The gate only tracks approvals. Applying a committed action is the caller's job.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConsensusGate<A> {
    pending: Option<PendingAction<A>>,
}

impl<A> Default for ConsensusGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A: Clone + PartialEq> ConsensusGate<A> {
    pub fn pending(&self) -> Option<&PendingAction<A>> {
        self.pending.as_ref()
    }

    /// Open `action` for approval, or approve it if it is already the pending one.
    pub fn propose(
        &mut self,
        admins: &AdminSet,
        threshold: Threshold,
        action: A,
        proposer: Pubkey,
    ) -> VestingResult<GateOutcome<A>> {
        admins.require(&proposer)?;
        match &self.pending {
            Some(p) if p.action == action => self.approve(admins, threshold, proposer),
            Some(_) => Err(VestingError::ActionInProgress),
            None => {
                self.pending = Some(PendingAction {
                    action,
                    approvals: vec![proposer],
                });
                Ok(self.try_commit(admins, threshold))
            }
        }
    }

    pub fn approve(
        &mut self,
        admins: &AdminSet,
        threshold: Threshold,
        approver: Pubkey,
    ) -> VestingResult<GateOutcome<A>> {
        admins.require(&approver)?;
        let pending = self.pending.as_mut().ok_or(VestingError::NoActivePending)?;
        if !pending.approvals.contains(&approver) {
            pending.approvals.push(approver);
        }
        Ok(self.try_commit(admins, threshold))
    }

    /// Approvals from identities still in `admins`.
    pub fn current_approvals(&self, admins: &AdminSet) -> usize {
        self.pending.as_ref().map_or(0, |p| {
            p.approvals.iter().filter(|a| admins.contains(a)).count()
        })
    }

    // Always evaluated against the admin set passed in now, never a snapshot.
    fn try_commit(&mut self, admins: &AdminSet, threshold: Threshold) -> GateOutcome<A> {
        let approvals = self.current_approvals(admins);
        let required = threshold.required(admins);
        if approvals >= required {
            if let Some(p) = self.pending.take() {
                return GateOutcome::Committed(p.action);
            }
        }
        GateOutcome::Pending {
            approvals,
            required,
        }
    }
}

/// Admin membership, consensus configuration and the pause flag of one controller.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GovernanceState {
    pub admins: AdminSet,
    pub threshold: Threshold,
    pub gate: ConsensusGate<Action>,
    pub paused: bool,
}

impl GovernanceState {
    pub const SIZE: usize = AdminSet::space(MAX_ADMINS) + // admins
        Threshold::SIZE +                                  // threshold
        1 + Action::MAX_SIZE + AdminSet::space(MAX_ADMINS) + // gate
        1; // paused

    pub fn new(admin: Pubkey, threshold: Threshold) -> VestingResult<Self> {
        threshold.validate()?;
        Ok(Self {
            admins: AdminSet::with_member(admin),
            threshold,
            gate: ConsensusGate::default(),
            paused: false,
        })
    }

    pub fn require_admin(&self, identity: &Pubkey) -> VestingResult<()> {
        self.admins.require(identity)
    }

    pub fn propose(&mut self, action: Action, proposer: Pubkey) -> VestingResult<GateOutcome<Action>> {
        self.gate
            .propose(&self.admins, self.threshold, action, proposer)
    }

    pub fn approve(&mut self, approver: Pubkey) -> VestingResult<GateOutcome<Action>> {
        self.gate.approve(&self.admins, self.threshold, approver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn admins(n: u8) -> AdminSet {
        let mut set = AdminSet::with_member(key(1));
        for i in 2..=n {
            set.insert(key(i), MAX_ADMINS).unwrap();
        }
        set
    }

    #[test]
    fn single_admin_commits_on_propose() {
        let set = admins(1);
        let mut gate = ConsensusGate::default();
        let out = gate
            .propose(&set, Threshold::Unanimous, Action::Pause, key(1))
            .unwrap();
        assert_eq!(out, GateOutcome::Committed(Action::Pause));
        assert!(gate.pending().is_none());
    }

    #[test]
    fn three_admins_commit_only_after_all_approve() {
        let set = admins(3);
        let mut gate = ConsensusGate::default();
        let out = gate
            .propose(&set, Threshold::Unanimous, Action::Pause, key(3))
            .unwrap();
        assert_eq!(out, GateOutcome::Pending { approvals: 1, required: 3 });

        // Repeat approval is a no-op, not an error.
        let out = gate.approve(&set, Threshold::Unanimous, key(3)).unwrap();
        assert_eq!(out, GateOutcome::Pending { approvals: 1, required: 3 });

        let out = gate.approve(&set, Threshold::Unanimous, key(1)).unwrap();
        assert_eq!(out, GateOutcome::Pending { approvals: 2, required: 3 });
        let out = gate.approve(&set, Threshold::Unanimous, key(2)).unwrap();
        assert_eq!(out, GateOutcome::Committed(Action::Pause));
        assert!(gate.pending().is_none());
    }

    #[test]
    fn reproposing_same_action_counts_as_approval() {
        let set = admins(2);
        let mut gate = ConsensusGate::default();
        gate.propose(&set, Threshold::Unanimous, Action::Unpause, key(1))
            .unwrap();
        let out = gate
            .propose(&set, Threshold::Unanimous, Action::Unpause, key(2))
            .unwrap();
        assert_eq!(out, GateOutcome::Committed(Action::Unpause));
    }

    #[test]
    fn different_action_while_pending_is_rejected() {
        let set = admins(2);
        let mut gate = ConsensusGate::default();
        gate.propose(&set, Threshold::Unanimous, Action::Pause, key(1))
            .unwrap();
        assert!(matches!(
            gate.propose(&set, Threshold::Unanimous, Action::Unpause, key(2)),
            Err(VestingError::ActionInProgress)
        ));
        assert_eq!(gate.pending().unwrap().action, Action::Pause);
    }

    #[test]
    fn outsiders_and_empty_gate_are_rejected() {
        let set = admins(2);
        let mut gate: ConsensusGate<Action> = ConsensusGate::default();
        assert!(matches!(
            gate.approve(&set, Threshold::Unanimous, key(1)),
            Err(VestingError::NoActivePending)
        ));
        assert!(matches!(
            gate.propose(&set, Threshold::Unanimous, Action::Pause, key(9)),
            Err(VestingError::NotAuthorized)
        ));
        gate.propose(&set, Threshold::Unanimous, Action::Pause, key(1))
            .unwrap();
        assert!(matches!(
            gate.approve(&set, Threshold::Unanimous, key(9)),
            Err(VestingError::NotAuthorized)
        ));
    }

    #[test]
    fn commit_check_uses_current_admin_set() {
        let mut set = admins(3);
        let mut gate = ConsensusGate::default();
        gate.propose(&set, Threshold::Unanimous, Action::Pause, key(1))
            .unwrap();
        gate.approve(&set, Threshold::Unanimous, key(3)).unwrap();

        // Key 3 leaves: its approval stops counting, key 2 is still required.
        set.remove(&key(3)).unwrap();
        assert_eq!(gate.current_approvals(&set), 1);
        let out = gate.approve(&set, Threshold::Unanimous, key(2)).unwrap();
        assert_eq!(out, GateOutcome::Committed(Action::Pause));
    }

    #[test]
    fn at_least_threshold_is_capped_by_set_size() {
        let set = admins(3);
        let mut gate = ConsensusGate::default();
        let out = gate
            .propose(&set, Threshold::AtLeast(2), Action::Pause, key(1))
            .unwrap();
        assert_eq!(out, GateOutcome::Pending { approvals: 1, required: 2 });
        let out = gate.approve(&set, Threshold::AtLeast(2), key(2)).unwrap();
        assert_eq!(out, GateOutcome::Committed(Action::Pause));

        assert_eq!(Threshold::AtLeast(5).required(&admins(2)), 2);
        assert!(matches!(
            Threshold::AtLeast(0).validate(),
            Err(VestingError::InvalidThreshold)
        ));
    }

    #[test]
    fn default_threshold_is_unanimous() {
        assert_eq!(Threshold::default(), Threshold::Unanimous);
        assert_eq!(Threshold::default().required(&admins(3)), 3);
    }

    #[test]
    fn fingerprint_distinguishes_actions() {
        let a = Action::RevokeAdmin { admin: key(1) };
        let b = Action::RevokeAdmin { admin: key(2) };
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(Action::Pause.fingerprint(), Action::Unpause.fingerprint());
    }
}
