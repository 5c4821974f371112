use anchor_lang::prelude::*;

use crate::constants::{
    COMMUNITY_POOL, INVESTOR_POOL, MAX_ACCOUNTS_BATCH, MAX_ADMINS, MAX_BATCH_RELEASE,
    MAX_CAMPAIGNS, MAX_DEFAULT_STEPS, MAX_NAME_LEN, MAX_UNSETTLED,
};
use crate::error::{VestingError, VestingResult};
use crate::ledger::AssetLedger;
use crate::state::{
    beneficiary_from_inputs, participants_from_parts, validate_name, Action, Beneficiary,
    Campaign, CampaignStatus, GateOutcome, GovernanceState, PendingAction, Pool, PoolInput,
    Threshold,
};
use crate::utils::schedule::{self, ReleaseStep, Tranche};
use crate::utils::time;

/// Default release schedule used by `add_investor`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum DefaultSchedule {
    Disabled,
    Steps(Vec<ReleaseStep>),
    /// Even monthly steps, the first one calendar month after `start_ts`.
    Monthly { start_ts: i64, months: u32 },
}

impl DefaultSchedule {
    fn resolve(&self) -> VestingResult<Vec<ReleaseStep>> {
        let steps = match self {
            DefaultSchedule::Disabled => Vec::new(),
            DefaultSchedule::Steps(steps) => steps.clone(),
            DefaultSchedule::Monthly { start_ts, months } => time::monthly_steps(*start_ts, *months)?,
        };
        schedule::validate_steps(&steps)?;
        Ok(steps)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    pub threshold: Threshold,
    pub default_schedule: DefaultSchedule,
}

/// Where an unsettled transfer came from.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum SettlementOrigin {
    Claim { pool: String, slot: u16 },
    Campaign { name: String },
}

/// A transfer that failed after the ledger already recorded it as paid out.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Unsettled {
    pub recipient: Pubkey,
    pub amount: u64,
    pub origin: SettlementOrigin,
}

impl Unsettled {
    pub const SIZE: usize = 32 + 8 + 1 + (4 + MAX_NAME_LEN) + 2;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateStatus {
    Pending { approvals: usize, required: usize },
    Committed,
}

/// Result of a proposal or approval, for event reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateReport {
    pub action: Action,
    pub status: GateStatus,
    /// Amount paid out by the commit (campaign release only).
    pub disbursed: u64,
    /// Transfers of the commit parked for manual settlement.
    pub parked: usize,
}

impl GateReport {
    pub fn committed(&self) -> bool {
        self.status == GateStatus::Committed
    }
}

/// Outcome of paying out every unlocked slot of one or more beneficiaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    pub paid: u64,
    pub parked: usize,
}

/// Controller PDA: governance, default schedule, campaigns and funding
/// bookkeeping of one mint. Funds sit in the vault token account, owned by
/// this PDA. Beneficiary schedules live in their own `Beneficiary` PDAs.
#[account]
pub struct VestingController {
    /// Token mint.
    pub mint: Pubkey,
    /// Vault token account holding the funded balance.
    pub vault: Pubkey,
    pub bump: u8,
    pub governance: GovernanceState,
    pub default_schedule: Vec<ReleaseStep>,
    pub beneficiary_count: u32,
    pub campaigns: Vec<Campaign>,
    pub unsettled: Vec<Unsettled>,
    /// Sum of every allocation made (beneficiaries and open/released campaigns).
    pub allocated: u64,
    /// Sum of every successful payout.
    pub disbursed: u64,
}

impl VestingController {
    pub const SIZE: usize =
        32 + // mint
        32 + // vault
        1 +  // bump
        GovernanceState::SIZE +
        4 + MAX_DEFAULT_STEPS * ReleaseStep::SIZE +
        4 +  // beneficiary_count
        4 + MAX_CAMPAIGNS * Campaign::SIZE +
        4 + MAX_UNSETTLED * Unsettled::SIZE +
        8 +  // allocated
        8;   // disbursed

    pub fn new(
        mint: Pubkey,
        vault: Pubkey,
        bump: u8,
        admin: Pubkey,
        config: &ControllerConfig,
    ) -> VestingResult<Self> {
        Ok(Self {
            mint,
            vault,
            bump,
            governance: GovernanceState::new(admin, config.threshold)?,
            default_schedule: config.default_schedule.resolve()?,
            beneficiary_count: 0,
            campaigns: Vec::new(),
            unsettled: Vec::new(),
            allocated: 0,
            disbursed: 0,
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn is_admin(&self, identity: &Pubkey) -> bool {
        self.governance.admins.contains(identity)
    }

    pub fn is_paused(&self) -> bool {
        self.governance.paused
    }

    pub fn pending_action(&self) -> Option<&PendingAction<Action>> {
        self.governance.gate.pending()
    }

    pub fn campaign(&self, name: &str) -> VestingResult<&Campaign> {
        self.campaigns
            .iter()
            .find(|c| c.name == name)
            .ok_or(VestingError::UnknownCampaign)
    }

    /// Allocated but not yet paid out.
    pub fn outstanding(&self) -> VestingResult<u64> {
        self.allocated
            .checked_sub(self.disbursed)
            .ok_or(VestingError::MathOverflow)
    }

    /// Vault balance not yet promised to anyone.
    pub fn total_can_use<L: AssetLedger>(&self, ledger: &L) -> VestingResult<u64> {
        Ok(ledger.balance_of(&self.vault).saturating_sub(self.outstanding()?))
    }

    // ---------------------------------------------------------------------
    // Allocation (admin-only, not consensus-gated)
    //
    // These return the new beneficiary records; storing them (one PDA per
    // identity, which also rejects re-registration) is up to the caller.
    // ---------------------------------------------------------------------

    pub fn add_beneficiary<L: AssetLedger>(
        &mut self,
        ledger: &L,
        caller: Pubkey,
        identity: Pubkey,
        pools: &[PoolInput],
    ) -> VestingResult<Beneficiary> {
        self.governance.require_admin(&caller)?;
        let beneficiary = beneficiary_from_inputs(identity, pools)?;
        let mut registered = self.register(ledger, vec![beneficiary])?;
        registered.pop().ok_or(VestingError::MalformedSchedule)
    }

    /// Allocate `amount` over the default schedule into the investor pool.
    pub fn add_investor<L: AssetLedger>(
        &mut self,
        ledger: &L,
        caller: Pubkey,
        identity: Pubkey,
        amount: u64,
    ) -> VestingResult<Beneficiary> {
        self.governance.require_admin(&caller)?;
        let tranches = schedule::split_by_rates(amount, &self.default_schedule)?;
        let beneficiary = Beneficiary::new(
            identity,
            vec![Pool {
                name: INVESTOR_POOL.to_string(),
                tranches,
            }],
        );
        let mut registered = self.register(ledger, vec![beneficiary])?;
        registered.pop().ok_or(VestingError::MalformedSchedule)
    }

    /// Community allocation: every identity gets one tranche released at `release_ts`.
    pub fn add_accounts<L: AssetLedger>(
        &mut self,
        ledger: &L,
        caller: Pubkey,
        identities: &[Pubkey],
        amounts: &[u64],
        release_ts: i64,
    ) -> VestingResult<Vec<Beneficiary>> {
        self.governance.require_admin(&caller)?;
        if identities.is_empty() || identities.len() != amounts.len() {
            return Err(VestingError::MalformedSchedule);
        }
        if identities.len() > MAX_ACCOUNTS_BATCH {
            return Err(VestingError::CapacityExceeded);
        }
        let batch = identities
            .iter()
            .zip(amounts)
            .map(|(&identity, &amount)| {
                Beneficiary::new(
                    identity,
                    vec![Pool {
                        name: COMMUNITY_POOL.to_string(),
                        tranches: vec![Tranche { release_ts, amount }],
                    }],
                )
            })
            .collect();
        self.register(ledger, batch)
    }

    // All-or-nothing: every check runs before the funding is reserved.
    fn register<L: AssetLedger>(
        &mut self,
        ledger: &L,
        batch: Vec<Beneficiary>,
    ) -> VestingResult<Vec<Beneficiary>> {
        for (i, b) in batch.iter().enumerate() {
            if batch[..i].iter().any(|e| e.identity == b.identity) {
                return Err(VestingError::DuplicateBeneficiary);
            }
        }
        let mut total: u64 = 0;
        for b in &batch {
            total = total
                .checked_add(b.total_allocation()?)
                .ok_or(VestingError::MathOverflow)?;
        }
        let count = u32::try_from(batch.len())
            .ok()
            .and_then(|n| self.beneficiary_count.checked_add(n))
            .ok_or(VestingError::MathOverflow)?;
        self.allocated = self.reserve(ledger, total)?;
        self.beneficiary_count = count;
        Ok(batch)
    }

    /// New `allocated` after promising `amount` more, if the vault covers it.
    fn reserve<L: AssetLedger>(&self, ledger: &L, amount: u64) -> VestingResult<u64> {
        let needed = self
            .outstanding()?
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        if needed > ledger.balance_of(&self.vault) {
            return Err(VestingError::ExceedsFundedBalance);
        }
        self.allocated
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)
    }

    // ---------------------------------------------------------------------
    // Claims
    // ---------------------------------------------------------------------

    /// Claim one slot of `beneficiary` and pay it out to its identity.
    pub fn claim<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        beneficiary: &mut Beneficiary,
        pool: &str,
        slot: usize,
        now: i64,
    ) -> VestingResult<u64> {
        if self.governance.paused {
            return Err(VestingError::SystemPaused);
        }
        let tranches = beneficiary.pool(pool)?.tranches.clone();
        if slot >= tranches.len() {
            return Err(VestingError::SlotOutOfRange);
        }
        if !beneficiary.claimable(pool, now)?.iter().any(|u| u.slot == slot) {
            return Err(if beneficiary.claims.is_claimed(pool, slot) {
                VestingError::AlreadyClaimed
            } else {
                VestingError::NotYetUnlocked
            });
        }
        self.require_settlement_room(1)?;

        let amount = beneficiary.claims.record_claim(pool, slot, &tranches, now)?;
        let origin = SettlementOrigin::Claim {
            pool: pool.to_string(),
            slot: slot as u16,
        };
        if !self.pay(ledger, beneficiary.identity, amount, origin)? {
            return Err(VestingError::TransferFailed);
        }
        Ok(amount)
    }

    /// Claim every unlocked slot across all pools of `beneficiary`.
    pub fn claim_unlocked<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        beneficiary: &mut Beneficiary,
        now: i64,
    ) -> VestingResult<u64> {
        if self.governance.paused {
            return Err(VestingError::SystemPaused);
        }
        let payout = self.pay_unlocked(ledger, beneficiary, now)?;
        if payout.parked > 0 {
            return Err(VestingError::TransferFailed);
        }
        Ok(payout.paid)
    }

    /// Admin push of every unlocked slot of each record. Failed transfers are
    /// parked and reported in the payout rather than failing the batch.
    pub fn release_unlocked<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        beneficiaries: &mut [Beneficiary],
        now: i64,
    ) -> VestingResult<Payout> {
        self.governance.require_admin(&caller)?;
        if self.governance.paused {
            return Err(VestingError::SystemPaused);
        }
        if beneficiaries.len() > MAX_BATCH_RELEASE {
            return Err(VestingError::CapacityExceeded);
        }
        let mut due = 0;
        for b in beneficiaries.iter() {
            for pool in &b.pools {
                due += b.claimable(&pool.name, now)?.len();
            }
        }
        self.require_settlement_room(due)?;

        let mut total = Payout::default();
        for b in beneficiaries.iter_mut() {
            let payout = self.pay_unlocked(ledger, b, now)?;
            total.paid = total
                .paid
                .checked_add(payout.paid)
                .ok_or(VestingError::MathOverflow)?;
            total.parked += payout.parked;
        }
        Ok(total)
    }

    fn pay_unlocked<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        beneficiary: &mut Beneficiary,
        now: i64,
    ) -> VestingResult<Payout> {
        let pools = beneficiary.pools.clone();
        let mut due = Vec::new();
        for pool in &pools {
            for unlocked in beneficiary.claimable(&pool.name, now)? {
                due.push((pool, unlocked.slot));
            }
        }
        self.require_settlement_room(due.len())?;

        let mut payout = Payout::default();
        for (pool, slot) in due {
            let amount = beneficiary
                .claims
                .record_claim(&pool.name, slot, &pool.tranches, now)?;
            let origin = SettlementOrigin::Claim {
                pool: pool.name.clone(),
                slot: slot as u16,
            };
            if self.pay(ledger, beneficiary.identity, amount, origin)? {
                payout.paid = payout
                    .paid
                    .checked_add(amount)
                    .ok_or(VestingError::MathOverflow)?;
            } else {
                payout.parked += 1;
            }
        }
        Ok(payout)
    }

    fn require_settlement_room(&self, count: usize) -> VestingResult<()> {
        if self.unsettled.len() + count > MAX_UNSETTLED {
            return Err(VestingError::CapacityExceeded);
        }
        Ok(())
    }

    // Claim state is already recorded when this runs. Returns `false` when the
    // transfer failed and was parked for manual settlement.
    fn pay<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        recipient: Pubkey,
        amount: u64,
        origin: SettlementOrigin,
    ) -> VestingResult<bool> {
        if ledger.transfer(&recipient, amount).is_ok() {
            self.disbursed = self
                .disbursed
                .checked_add(amount)
                .ok_or(VestingError::MathOverflow)?;
            return Ok(true);
        }
        msg!(
            "TRANSFER FAILED: {} owed {} from {:?}; manual settlement required",
            recipient,
            amount,
            origin
        );
        self.unsettled.push(Unsettled {
            recipient,
            amount,
            origin,
        });
        Ok(false)
    }

    /// Retry one parked transfer. Admin-only and explicit.
    pub fn settle<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        index: usize,
    ) -> VestingResult<Unsettled> {
        self.governance.require_admin(&caller)?;
        let entry = self
            .unsettled
            .get(index)
            .cloned()
            .ok_or(VestingError::UnknownSettlement)?;
        ledger
            .transfer(&entry.recipient, entry.amount)
            .map_err(|_| VestingError::TransferFailed)?;
        self.disbursed = self
            .disbursed
            .checked_add(entry.amount)
            .ok_or(VestingError::MathOverflow)?;
        self.unsettled.remove(index);
        Ok(entry)
    }

    // ---------------------------------------------------------------------
    // Campaigns
    // ---------------------------------------------------------------------

    pub fn create_campaign<L: AssetLedger>(
        &mut self,
        ledger: &L,
        caller: Pubkey,
        name: &str,
        participants: &[Pubkey],
        amounts: &[u64],
    ) -> VestingResult<u64> {
        self.governance.require_admin(&caller)?;
        validate_name(name)?;
        if self.campaigns.iter().any(|c| c.name == name) {
            return Err(VestingError::DuplicateCampaign);
        }
        if self.campaigns.len() >= MAX_CAMPAIGNS {
            return Err(VestingError::CapacityExceeded);
        }
        let mut campaign = Campaign {
            name: name.to_string(),
            participants: Vec::new(),
            status: CampaignStatus::Open,
        };
        campaign.participants = campaign.merged(&participants_from_parts(participants, amounts)?)?;
        let total = campaign.total()?;
        self.allocated = self.reserve(ledger, total)?;
        self.campaigns.push(campaign);
        Ok(total)
    }

    /// Upsert participants of an open campaign; returns the new campaign total.
    pub fn update_campaign<L: AssetLedger>(
        &mut self,
        ledger: &L,
        caller: Pubkey,
        name: &str,
        participants: &[Pubkey],
        amounts: &[u64],
    ) -> VestingResult<u64> {
        self.governance.require_admin(&caller)?;
        let idx = self
            .campaigns
            .iter()
            .position(|c| c.name == name)
            .ok_or(VestingError::UnknownCampaign)?;
        if !self.campaigns[idx].is_open() {
            return Err(VestingError::CampaignFinalized);
        }
        // Approvals already given cover the participant list as it was proposed.
        if let Some(Action::Release { campaign, .. }) = self.pending_action().map(|p| &p.action) {
            if campaign == name {
                return Err(VestingError::ActionInProgress);
            }
        }

        let updates = participants_from_parts(participants, amounts)?;
        let merged = self.campaigns[idx].merged(&updates)?;
        let old_total = self.campaigns[idx].total()?;
        let new_total = merged.iter().try_fold(0u64, |acc, p| {
            acc.checked_add(p.amount).ok_or(VestingError::MathOverflow)
        })?;
        self.allocated = if new_total >= old_total {
            self.reserve(ledger, new_total - old_total)?
        } else {
            self.allocated
                .checked_sub(old_total - new_total)
                .ok_or(VestingError::MathOverflow)?
        };
        self.campaigns[idx].participants = merged;
        Ok(new_total)
    }

    // ---------------------------------------------------------------------
    // Consensus-gated operations
    // ---------------------------------------------------------------------

    pub fn pause<L: AssetLedger>(&mut self, ledger: &mut L, caller: Pubkey) -> VestingResult<GateReport> {
        self.propose(ledger, caller, Action::Pause)
    }

    pub fn unpause<L: AssetLedger>(&mut self, ledger: &mut L, caller: Pubkey) -> VestingResult<GateReport> {
        self.propose(ledger, caller, Action::Unpause)
    }

    pub fn add_admin<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        admin: Pubkey,
    ) -> VestingResult<GateReport> {
        self.propose(ledger, caller, Action::AddAdmin { admin })
    }

    pub fn revoke_admin_role<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        admin: Pubkey,
    ) -> VestingResult<GateReport> {
        self.propose(ledger, caller, Action::RevokeAdmin { admin })
    }

    /// Release (`commit = true`) or reject (`commit = false`) a campaign.
    pub fn release<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        name: &str,
        commit: bool,
    ) -> VestingResult<GateReport> {
        let action = Action::Release {
            campaign: name.to_string(),
            commit,
        };
        self.propose(ledger, caller, action)
    }

    /// Propose `action`, or approve it when it is already the pending one.
    pub fn propose<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
        action: Action,
    ) -> VestingResult<GateReport> {
        self.governance.require_admin(&caller)?;
        if let Some(pending) = self.pending_action() {
            if pending.action != action {
                return Err(VestingError::ActionInProgress);
            }
        }
        self.check_action(ledger, &action)?;
        let outcome = self.governance.propose(action.clone(), caller)?;
        self.finish(ledger, action, outcome)
    }

    /// Approve the pending action.
    pub fn admin_accept<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        caller: Pubkey,
    ) -> VestingResult<GateReport> {
        self.governance.require_admin(&caller)?;
        let action = self
            .pending_action()
            .map(|p| p.action.clone())
            .ok_or(VestingError::NoActivePending)?;
        self.check_action(ledger, &action)?;
        let outcome = self.governance.approve(caller)?;
        self.finish(ledger, action, outcome)
    }

    // Effect preconditions, checked before any approval is recorded so a
    // commit can never half-apply.
    fn check_action<L: AssetLedger>(&self, ledger: &L, action: &Action) -> VestingResult<()> {
        let admins = &self.governance.admins;
        match action {
            Action::Pause if self.governance.paused => Err(VestingError::AlreadyPaused),
            Action::Unpause if !self.governance.paused => Err(VestingError::NotPaused),
            Action::Pause | Action::Unpause => Ok(()),
            Action::AddAdmin { admin } => {
                if admins.contains(admin) {
                    Err(VestingError::DuplicateAdmin)
                } else if admins.len() >= MAX_ADMINS {
                    Err(VestingError::AdminSetFull)
                } else {
                    Ok(())
                }
            }
            Action::RevokeAdmin { admin } => {
                if admins.len() == 1 {
                    Err(VestingError::CannotRemoveLastAdmin)
                } else if !admins.contains(admin) {
                    Err(VestingError::UnknownAdmin)
                } else {
                    Ok(())
                }
            }
            Action::Release { campaign, commit } => {
                let campaign = self.campaign(campaign)?;
                if !campaign.is_open() {
                    return Err(VestingError::CampaignFinalized);
                }
                if *commit {
                    if campaign.total()? > ledger.balance_of(&self.vault) {
                        return Err(VestingError::ExceedsFundedBalance);
                    }
                    self.require_settlement_room(campaign.participants.len())?;
                }
                Ok(())
            }
        }
    }

    fn finish<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        action: Action,
        outcome: GateOutcome<Action>,
    ) -> VestingResult<GateReport> {
        match outcome {
            GateOutcome::Pending {
                approvals,
                required,
            } => Ok(GateReport {
                action,
                status: GateStatus::Pending {
                    approvals,
                    required,
                },
                disbursed: 0,
                parked: 0,
            }),
            GateOutcome::Committed(action) => {
                let payout = self.apply(ledger, &action)?;
                Ok(GateReport {
                    action,
                    status: GateStatus::Committed,
                    disbursed: payout.paid,
                    parked: payout.parked,
                })
            }
        }
    }

    fn apply<L: AssetLedger>(&mut self, ledger: &mut L, action: &Action) -> VestingResult<Payout> {
        match action {
            Action::Pause => self.governance.paused = true,
            Action::Unpause => self.governance.paused = false,
            Action::AddAdmin { admin } => {
                self.governance.admins.insert(*admin, MAX_ADMINS)?;
            }
            Action::RevokeAdmin { admin } => self.governance.admins.remove(admin)?,
            Action::Release { campaign, commit } => {
                return self.close_campaign(ledger, campaign, *commit);
            }
        }
        Ok(Payout::default())
    }

    // A committed release pays every participant it can; failures are parked
    // and the campaign is final either way.
    fn close_campaign<L: AssetLedger>(
        &mut self,
        ledger: &mut L,
        name: &str,
        commit: bool,
    ) -> VestingResult<Payout> {
        let idx = self
            .campaigns
            .iter()
            .position(|c| c.name == name)
            .ok_or(VestingError::UnknownCampaign)?;
        let total = self.campaigns[idx].total()?;
        if !commit {
            self.campaigns[idx].status = CampaignStatus::Rejected;
            self.allocated = self
                .allocated
                .checked_sub(total)
                .ok_or(VestingError::MathOverflow)?;
            return Ok(Payout::default());
        }

        self.campaigns[idx].status = CampaignStatus::Released;
        let participants = self.campaigns[idx].participants.clone();
        let mut payout = Payout::default();
        for p in participants.iter().filter(|p| p.amount > 0) {
            let origin = SettlementOrigin::Campaign {
                name: name.to_string(),
            };
            if self.pay(ledger, p.participant, p.amount, origin)? {
                payout.paid = payout
                    .paid
                    .checked_add(p.amount)
                    .ok_or(VestingError::MathOverflow)?;
            } else {
                payout.parked += 1;
            }
        }
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::testing::MemoryLedger;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn vault() -> Pubkey {
        Pubkey::new_from_array([200; 32])
    }

    fn setup(funding: u64) -> (VestingController, MemoryLedger) {
        let config = ControllerConfig {
            threshold: Threshold::Unanimous,
            default_schedule: DefaultSchedule::Steps(vec![
                ReleaseStep { release_ts: 1_000, rate_bps: 2_000 },
                ReleaseStep { release_ts: 2_000, rate_bps: 2_000 },
                ReleaseStep { release_ts: 3_000, rate_bps: 3_000 },
                ReleaseStep { release_ts: 4_000, rate_bps: 3_000 },
            ]),
        };
        let controller = VestingController::new(key(99), vault(), 255, key(1), &config).unwrap();
        let mut ledger = MemoryLedger::new(vault());
        ledger.mint(vault(), funding);
        (controller, ledger)
    }

    fn seed_pool(times: &[i64], amounts: &[u64]) -> Vec<PoolInput> {
        vec![PoolInput {
            name: "seed".to_string(),
            release_times: times.to_vec(),
            amounts: amounts.to_vec(),
        }]
    }

    /// Admins {1, 2}: key 1 proposes, key 2 approves.
    fn with_two_admins(c: &mut VestingController, ledger: &mut MemoryLedger) {
        assert!(c.add_admin(ledger, key(1), key(2)).unwrap().committed());
    }

    #[test]
    fn two_tranche_claims_follow_the_clock() {
        let (mut c, mut ledger) = setup(300);
        let mut b = c
            .add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100, 200], &[100, 200]))
            .unwrap();
        assert!(b.claimable("seed", 99).unwrap().is_empty());

        assert_eq!(c.claim(&mut ledger, &mut b, "seed", 0, 150).unwrap(), 100);
        assert_eq!(ledger.balance_of(&key(10)), 100);
        assert!(b.claims.is_claimed("seed", 0));

        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 1, 150),
            Err(VestingError::NotYetUnlocked)
        ));
        assert_eq!(c.claim(&mut ledger, &mut b, "seed", 1, 250).unwrap(), 200);
        assert_eq!(ledger.balance_of(&key(10)), 300);

        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 0, 250),
            Err(VestingError::AlreadyClaimed)
        ));
        assert_eq!(c.outstanding().unwrap(), 0);
    }

    #[test]
    fn claimable_lists_unlocked_unclaimed_slots() {
        let (mut c, mut ledger) = setup(600);
        let mut b = c
            .add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100, 200, 300], &[100, 200, 300]))
            .unwrap();
        let slots: Vec<usize> = b.claimable("seed", 250).unwrap().iter().map(|u| u.slot).collect();
        assert_eq!(slots, vec![0, 1]);

        c.claim(&mut ledger, &mut b, "seed", 0, 250).unwrap();
        let open = b.claimable("seed", 250).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!((open[0].slot, open[0].amount), (1, 200));
        assert!(matches!(b.claimable("team", 250), Err(VestingError::UnknownPool)));
    }

    #[test]
    fn claim_errors_for_unknown_targets() {
        let (mut c, mut ledger) = setup(300);
        let mut b = c
            .add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100], &[100]))
            .unwrap();
        assert!(matches!(
            c.claim(&mut ledger, &mut b, "private", 0, 150),
            Err(VestingError::UnknownPool)
        ));
        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 3, 150),
            Err(VestingError::SlotOutOfRange)
        ));
    }

    #[test]
    fn allocation_is_bounded_by_funding() {
        let (mut c, ledger) = setup(250);
        assert!(matches!(
            c.add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100, 200], &[100, 200])),
            Err(VestingError::ExceedsFundedBalance)
        ));
        assert_eq!(c.beneficiary_count, 0);
        assert_eq!(c.allocated, 0);

        assert!(matches!(
            c.add_beneficiary(&ledger, key(10), key(10), &seed_pool(&[100], &[1])),
            Err(VestingError::NotAuthorized)
        ));
        c.add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100], &[200]))
            .unwrap();
        assert_eq!(c.beneficiary_count, 1);
        assert_eq!(c.total_can_use(&ledger).unwrap(), 50);
    }

    #[test]
    fn investor_allocation_uses_default_schedule() {
        let (mut c, mut ledger) = setup(1_000);
        let mut b = c.add_investor(&ledger, key(1), key(10), 100).unwrap();
        let amounts: Vec<u64> = b.pools[0].tranches.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![20, 20, 30, 30]);

        assert_eq!(c.claim_unlocked(&mut ledger, &mut b, 2_500).unwrap(), 40);
        assert_eq!(c.claim_unlocked(&mut ledger, &mut b, 2_500).unwrap(), 0);
        assert_eq!(c.claim_unlocked(&mut ledger, &mut b, 9_999).unwrap(), 60);
        assert_eq!(ledger.balance_of(&key(10)), 100);
    }

    #[test]
    fn community_accounts_are_all_or_nothing() {
        let (mut c, mut ledger) = setup(800);
        assert!(matches!(
            c.add_accounts(&ledger, key(1), &[key(10), key(11)], &[100], 500),
            Err(VestingError::MalformedSchedule)
        ));
        assert!(matches!(
            c.add_accounts(&ledger, key(1), &[key(10), key(10)], &[100, 100], 500),
            Err(VestingError::DuplicateBeneficiary)
        ));
        assert!(matches!(
            c.add_accounts(&ledger, key(1), &[key(10), key(11)], &[500, 500], 500),
            Err(VestingError::ExceedsFundedBalance)
        ));
        assert_eq!(c.beneficiary_count, 0);

        let ids: Vec<Pubkey> = (10..18).map(key).collect();
        let mut records = c.add_accounts(&ledger, key(1), &ids, &[100; 8], 500).unwrap();
        assert_eq!(c.beneficiary_count, 8);
        let first = &mut records[0];
        assert_eq!(c.claim(&mut ledger, first, COMMUNITY_POOL, 0, 500).unwrap(), 100);
        assert!(matches!(
            c.claim(&mut ledger, first, COMMUNITY_POOL, 0, 500),
            Err(VestingError::AlreadyClaimed)
        ));
    }

    #[test]
    fn pause_blocks_claims_until_unpaused() {
        let (mut c, mut ledger) = setup(300);
        let mut b = c
            .add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100], &[100]))
            .unwrap();
        with_two_admins(&mut c, &mut ledger);

        let report = c.pause(&mut ledger, key(1)).unwrap();
        assert_eq!(
            report.status,
            GateStatus::Pending { approvals: 1, required: 2 }
        );
        assert!(!c.is_paused());
        assert!(c.admin_accept(&mut ledger, key(2)).unwrap().committed());
        assert!(c.is_paused());

        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 0, 150),
            Err(VestingError::SystemPaused)
        ));
        assert!(matches!(
            c.release_unlocked(&mut ledger, key(1), std::slice::from_mut(&mut b), 150),
            Err(VestingError::SystemPaused)
        ));
        assert!(matches!(
            c.pause(&mut ledger, key(2)),
            Err(VestingError::AlreadyPaused)
        ));

        c.unpause(&mut ledger, key(2)).unwrap();
        assert!(c.unpause(&mut ledger, key(1)).unwrap().committed());
        assert_eq!(c.claim(&mut ledger, &mut b, "seed", 0, 150).unwrap(), 100);
    }

    #[test]
    fn second_distinct_action_waits_for_the_first() {
        let (mut c, mut ledger) = setup(0);
        with_two_admins(&mut c, &mut ledger);
        c.pause(&mut ledger, key(1)).unwrap();
        assert!(matches!(
            c.add_admin(&mut ledger, key(2), key(3)),
            Err(VestingError::ActionInProgress)
        ));
        // Re-proposing the pending action approves it.
        assert!(c.pause(&mut ledger, key(2)).unwrap().committed());
        assert!(c.pending_action().is_none());
        assert!(matches!(
            c.admin_accept(&mut ledger, key(1)),
            Err(VestingError::NoActivePending)
        ));
    }

    #[test]
    fn revoked_admin_loses_its_vote() {
        let (mut c, mut ledger) = setup(0);
        assert!(matches!(
            c.revoke_admin_role(&mut ledger, key(1), key(1)),
            Err(VestingError::CannotRemoveLastAdmin)
        ));

        with_two_admins(&mut c, &mut ledger);
        c.add_admin(&mut ledger, key(1), key(3)).unwrap();
        c.admin_accept(&mut ledger, key(2)).unwrap();
        assert_eq!(c.governance.admins.len(), 3);

        c.revoke_admin_role(&mut ledger, key(1), key(2)).unwrap();
        c.admin_accept(&mut ledger, key(1)).unwrap();
        c.admin_accept(&mut ledger, key(3)).unwrap();
        assert!(c.pending_action().is_some());
        assert!(c.admin_accept(&mut ledger, key(2)).unwrap().committed());
        assert!(!c.is_admin(&key(2)));

        c.pause(&mut ledger, key(1)).unwrap();
        assert!(matches!(
            c.admin_accept(&mut ledger, key(2)),
            Err(VestingError::NotAuthorized)
        ));
        assert!(c.admin_accept(&mut ledger, key(3)).unwrap().committed());
    }

    #[test]
    fn campaign_release_disburses_everything_once() {
        let (mut c, mut ledger) = setup(100);
        c.create_campaign(&ledger, key(1), "x", &[key(20), key(21)], &[10, 20])
            .unwrap();
        assert!(matches!(
            c.create_campaign(&ledger, key(1), "x", &[key(20)], &[1]),
            Err(VestingError::DuplicateCampaign)
        ));
        assert_eq!(
            c.update_campaign(&ledger, key(1), "x", &[key(22)], &[30]).unwrap(),
            60
        );

        let report = c.release(&mut ledger, key(1), "x", true).unwrap();
        assert!(report.committed());
        assert_eq!(report.disbursed, 60);
        assert_eq!(report.parked, 0);
        assert_eq!(ledger.total_transferred(), 60);
        assert_eq!(c.campaign("x").unwrap().status, CampaignStatus::Released);

        assert!(matches!(
            c.update_campaign(&ledger, key(1), "x", &[key(23)], &[1]),
            Err(VestingError::CampaignFinalized)
        ));
        assert!(matches!(
            c.release(&mut ledger, key(1), "x", true),
            Err(VestingError::CampaignFinalized)
        ));
        assert!(matches!(
            c.update_campaign(&ledger, key(1), "y", &[key(23)], &[1]),
            Err(VestingError::UnknownCampaign)
        ));
    }

    #[test]
    fn shrinking_a_campaign_returns_budget() {
        let (mut c, ledger) = setup(100);
        c.create_campaign(&ledger, key(1), "x", &[key(20), key(21)], &[40, 50])
            .unwrap();
        assert_eq!(c.total_can_use(&ledger).unwrap(), 10);
        assert_eq!(
            c.update_campaign(&ledger, key(1), "x", &[key(21)], &[5]).unwrap(),
            45
        );
        assert_eq!(c.allocated, 45);
        assert_eq!(c.total_can_use(&ledger).unwrap(), 55);
        assert!(matches!(
            c.update_campaign(&ledger, key(1), "x", &[key(22)], &[60]),
            Err(VestingError::ExceedsFundedBalance)
        ));
        assert_eq!(c.campaign("x").unwrap().total().unwrap(), 45);
    }

    #[test]
    fn pending_release_freezes_participants() {
        let (mut c, mut ledger) = setup(100);
        with_two_admins(&mut c, &mut ledger);
        c.create_campaign(&ledger, key(1), "x", &[key(20)], &[10]).unwrap();
        c.release(&mut ledger, key(1), "x", true).unwrap();
        assert!(matches!(
            c.update_campaign(&ledger, key(2), "x", &[key(21)], &[5]),
            Err(VestingError::ActionInProgress)
        ));
        let report = c.admin_accept(&mut ledger, key(2)).unwrap();
        assert_eq!(report.disbursed, 10);
    }

    #[test]
    fn rejected_campaign_returns_its_budget() {
        let (mut c, mut ledger) = setup(100);
        c.create_campaign(&ledger, key(1), "x", &[key(20)], &[80]).unwrap();
        assert_eq!(c.total_can_use(&ledger).unwrap(), 20);
        assert!(matches!(
            c.create_campaign(&ledger, key(1), "y", &[key(20)], &[30]),
            Err(VestingError::ExceedsFundedBalance)
        ));
        c.release(&mut ledger, key(1), "x", false).unwrap();
        assert_eq!(c.campaign("x").unwrap().status, CampaignStatus::Rejected);
        assert_eq!(ledger.total_transferred(), 0);
        assert_eq!(c.total_can_use(&ledger).unwrap(), 100);
    }

    #[test]
    fn release_with_one_failing_participant_parks_it_and_commits() {
        let (mut c, mut ledger) = setup(100);
        c.create_campaign(&ledger, key(1), "x", &[key(20), key(21), key(22)], &[10, 20, 30])
            .unwrap();
        ledger.fail_transfers_to(key(21));

        let report = c.release(&mut ledger, key(1), "x", true).unwrap();
        assert!(report.committed());
        assert_eq!((report.disbursed, report.parked), (40, 1));
        assert_eq!(c.campaign("x").unwrap().status, CampaignStatus::Released);
        assert_eq!(c.unsettled.len(), 1);
        assert_eq!(c.unsettled[0].recipient, key(21));
        assert_eq!(c.disbursed, 40);
        // The parked 20 is still owed, so it stays reserved.
        assert_eq!(c.total_can_use(&ledger).unwrap(), 40);

        ledger.heal(&key(21));
        c.settle(&mut ledger, key(1), 0).unwrap();
        assert_eq!(c.disbursed, 60);
        assert_eq!(c.outstanding().unwrap(), 0);
    }

    #[test]
    fn claim_unlocked_pays_what_it_can_and_parks_the_rest() {
        let (mut c, mut ledger) = setup(300);
        let pools = vec![
            PoolInput {
                name: "seed".to_string(),
                release_times: vec![100],
                amounts: vec![100],
            },
            PoolInput {
                name: "private".to_string(),
                release_times: vec![100],
                amounts: vec![50],
            },
        ];
        let mut b = c.add_beneficiary(&ledger, key(1), key(10), &pools).unwrap();
        // The vault loses funds outside the controller's bookkeeping.
        ledger.transfer(&key(50), 200).unwrap();

        assert!(matches!(
            c.claim_unlocked(&mut ledger, &mut b, 150),
            Err(VestingError::TransferFailed)
        ));
        assert_eq!(ledger.balance_of(&key(10)), 100);
        assert!(b.claims.is_claimed("seed", 0));
        assert!(b.claims.is_claimed("private", 0));
        assert_eq!(c.unsettled.len(), 1);
        assert_eq!(c.unsettled[0].amount, 50);
        assert_eq!(c.disbursed, 100);
        assert_eq!(c.outstanding().unwrap(), 50);
        assert_eq!(c.total_can_use(&ledger).unwrap(), 0);
        assert_eq!(c.claim_unlocked(&mut ledger, &mut b, 150).unwrap(), 0);

        ledger.mint(vault(), 50);
        c.settle(&mut ledger, key(1), 0).unwrap();
        assert_eq!(ledger.balance_of(&key(10)), 150);
        assert_eq!(c.disbursed, 150);
        assert!(c.unsettled.is_empty());
    }

    #[test]
    fn batch_release_pushes_unlocked_slots_to_every_record() {
        let (mut c, mut ledger) = setup(1_000);
        let mut records = vec![
            c.add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100, 200], &[100, 100]))
                .unwrap(),
            c.add_beneficiary(&ledger, key(1), key(11), &seed_pool(&[100], &[300]))
                .unwrap(),
            c.add_investor(&ledger, key(1), key(12), 100).unwrap(),
        ];
        ledger.fail_transfers_to(key(11));

        assert!(matches!(
            c.release_unlocked(&mut ledger, key(10), &mut records, 150),
            Err(VestingError::NotAuthorized)
        ));
        let payout = c.release_unlocked(&mut ledger, key(1), &mut records, 150).unwrap();
        assert_eq!(payout, Payout { paid: 100, parked: 1 });
        assert!(records[1].claims.is_claimed("seed", 0));
        assert_eq!(c.unsettled[0].recipient, key(11));

        let payout = c.release_unlocked(&mut ledger, key(1), &mut records, 5_000).unwrap();
        assert_eq!(payout, Payout { paid: 200, parked: 0 });
        assert_eq!(ledger.balance_of(&key(10)), 200);
        assert_eq!(ledger.balance_of(&key(12)), 100);
    }

    #[test]
    fn failed_transfer_keeps_claim_and_parks_settlement() {
        let (mut c, mut ledger) = setup(300);
        let mut b = c
            .add_beneficiary(&ledger, key(1), key(10), &seed_pool(&[100], &[100]))
            .unwrap();
        ledger.fail_transfers_to(key(10));

        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 0, 150),
            Err(VestingError::TransferFailed)
        ));
        assert!(b.claims.is_claimed("seed", 0));
        assert_eq!(c.unsettled.len(), 1);
        assert!(matches!(
            c.claim(&mut ledger, &mut b, "seed", 0, 150),
            Err(VestingError::AlreadyClaimed)
        ));

        assert!(matches!(
            c.settle(&mut ledger, key(1), 0),
            Err(VestingError::TransferFailed)
        ));
        ledger.heal(&key(10));
        assert!(matches!(
            c.settle(&mut ledger, key(10), 0),
            Err(VestingError::NotAuthorized)
        ));
        let settled = c.settle(&mut ledger, key(1), 0).unwrap();
        assert_eq!(settled.amount, 100);
        assert!(c.unsettled.is_empty());
        assert_eq!(ledger.balance_of(&key(10)), 100);
        assert!(matches!(
            c.settle(&mut ledger, key(1), 0),
            Err(VestingError::UnknownSettlement)
        ));
    }

    #[test]
    fn at_least_threshold_commits_early() {
        let config = ControllerConfig {
            threshold: Threshold::AtLeast(2),
            default_schedule: DefaultSchedule::Disabled,
        };
        let mut c = VestingController::new(key(99), vault(), 255, key(1), &config).unwrap();
        let mut ledger = MemoryLedger::new(vault());
        // A single admin still commits alone: the requirement is capped at the set size.
        assert!(c.add_admin(&mut ledger, key(1), key(2)).unwrap().committed());
        c.add_admin(&mut ledger, key(1), key(3)).unwrap();
        assert!(c.admin_accept(&mut ledger, key(2)).unwrap().committed());
        assert_eq!(c.governance.admins.len(), 3);

        c.pause(&mut ledger, key(3)).unwrap();
        assert!(c.admin_accept(&mut ledger, key(1)).unwrap().committed());
        assert!(matches!(
            c.add_investor(&ledger, key(1), key(10), 1),
            Err(VestingError::MalformedSchedule)
        ));
    }

    #[test]
    fn thirty_one_month_default_schedule() {
        let config = ControllerConfig {
            threshold: Threshold::Unanimous,
            default_schedule: DefaultSchedule::Monthly {
                start_ts: 1_625_097_600, // 2021-07-01
                months: 31,
            },
        };
        let mut c = VestingController::new(key(99), vault(), 255, key(1), &config).unwrap();
        assert_eq!(c.default_schedule.len(), 31);

        let mut ledger = MemoryLedger::new(vault());
        ledger.mint(vault(), 31_000);
        let b = c.add_investor(&ledger, key(1), key(10), 31_000).unwrap();
        assert_eq!(b.pools[0].tranches.len(), 31);
        assert_eq!(b.total_allocation().unwrap(), 31_000);

        let bad = ControllerConfig {
            threshold: Threshold::AtLeast(0),
            default_schedule: DefaultSchedule::Disabled,
        };
        assert!(matches!(
            VestingController::new(key(99), vault(), 255, key(1), &bad),
            Err(VestingError::InvalidThreshold)
        ));
    }

    #[test]
    fn controller_account_fits_a_single_allocation() {
        assert!(8 + VestingController::SIZE <= 10_240);
        assert!(8 + Beneficiary::SIZE <= 10_240);
    }
}
