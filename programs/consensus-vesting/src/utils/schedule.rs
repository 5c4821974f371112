//! Release schedule math. Pure functions of (tranches, now, claimed flags):
//! nothing here reads the clock.
//! - a slot is unlockable when release_ts <= now (inclusive) and it is unclaimed
//! - querying before the first release yields an empty set, not an error

use anchor_lang::prelude::*;

use crate::constants::{MAX_TRANCHES, RATE_DENOMINATOR};
use crate::error::{VestingError, VestingResult};

/// A single scheduled release point.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tranche {
    pub release_ts: i64,
    pub amount: u64,
}

impl Tranche {
    pub const SIZE: usize = 8 + 8;
}

/// A step of the default investor schedule: release time and share in basis points.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseStep {
    pub release_ts: i64,
    pub rate_bps: u16,
}

impl ReleaseStep {
    pub const SIZE: usize = 8 + 2;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnlockedSlot {
    pub slot: usize,
    pub amount: u64,
}

/// Slots with `release_ts <= now` that `is_claimed` does not report as claimed.
pub fn unlockable<F>(tranches: &[Tranche], now: i64, is_claimed: F) -> Vec<UnlockedSlot>
where
    F: Fn(usize) -> bool,
{
    tranches
        .iter()
        .enumerate()
        .take_while(|(_, t)| t.release_ts <= now)
        .filter(|(slot, _)| !is_claimed(*slot))
        .map(|(slot, t)| UnlockedSlot {
            slot,
            amount: t.amount,
        })
        .collect()
}

/// Cumulative amount released at `now`, claimed or not.
pub fn unlocked_total(tranches: &[Tranche], now: i64) -> VestingResult<u64> {
    let mut sum: u64 = 0;
    for t in tranches.iter().take_while(|t| t.release_ts <= now) {
        sum = sum.checked_add(t.amount).ok_or(VestingError::MathOverflow)?;
    }
    Ok(sum)
}

pub fn total_amount(tranches: &[Tranche]) -> VestingResult<u64> {
    unlocked_total(tranches, i64::MAX)
}

/// Build tranches from parallel arrays handed over by the import boundary.
pub fn tranches_from_parts(
    release_times: &[i64],
    amounts: &[u64],
) -> VestingResult<Vec<Tranche>> {
    if release_times.is_empty()
        || release_times.len() != amounts.len()
        || release_times.len() > MAX_TRANCHES
    {
        return Err(VestingError::MalformedSchedule);
    }
    if release_times.windows(2).any(|w| w[1] < w[0]) {
        return Err(VestingError::MalformedSchedule);
    }
    Ok(release_times
        .iter()
        .zip(amounts)
        .map(|(&release_ts, &amount)| Tranche { release_ts, amount })
        .collect())
}

/// Validate a default schedule: empty (disabled), or ordered with rates summing to the denominator.
pub fn validate_steps(steps: &[ReleaseStep]) -> VestingResult<()> {
    if steps.len() > MAX_TRANCHES {
        return Err(VestingError::MalformedSchedule);
    }
    if steps.is_empty() {
        return Ok(());
    }
    if steps.windows(2).any(|w| w[1].release_ts < w[0].release_ts) {
        return Err(VestingError::MalformedSchedule);
    }
    let total: u64 = steps.iter().map(|s| s.rate_bps as u64).sum();
    if total != RATE_DENOMINATOR {
        return Err(VestingError::MalformedSchedule);
    }
    Ok(())
}

/// Split `amount` across `steps` by rate; the rounding remainder lands on the last tranche.
pub fn split_by_rates(amount: u64, steps: &[ReleaseStep]) -> VestingResult<Vec<Tranche>> {
    if steps.is_empty() {
        return Err(VestingError::MalformedSchedule);
    }
    validate_steps(steps)?;

    let mut tranches = Vec::with_capacity(steps.len());
    let mut assigned: u64 = 0;
    for step in steps {
        let share = (amount as u128)
            .checked_mul(step.rate_bps as u128)
            .ok_or(VestingError::MathOverflow)?
            / RATE_DENOMINATOR as u128;
        let share = u64::try_from(share).map_err(|_| VestingError::MathOverflow)?;
        assigned = assigned.checked_add(share).ok_or(VestingError::MathOverflow)?;
        tranches.push(Tranche {
            release_ts: step.release_ts,
            amount: share,
        });
    }
    let remainder = amount.checked_sub(assigned).ok_or(VestingError::MathOverflow)?;
    if let Some(last) = tranches.last_mut() {
        last.amount = last
            .amount
            .checked_add(remainder)
            .ok_or(VestingError::MathOverflow)?;
    }
    Ok(tranches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Vec<Tranche> {
        tranches_from_parts(&[100, 200, 300], &[10, 20, 30]).unwrap()
    }

    #[test]
    fn nothing_unlockable_before_first_release() {
        let t = schedule();
        assert!(unlockable(&t, 99, |_| false).is_empty());
        assert_eq!(unlocked_total(&t, 99).unwrap(), 0);
    }

    #[test]
    fn release_boundary_is_inclusive() {
        let t = schedule();
        let slots = unlockable(&t, 200, |_| false);
        assert_eq!(
            slots,
            vec![
                UnlockedSlot { slot: 0, amount: 10 },
                UnlockedSlot { slot: 1, amount: 20 },
            ]
        );
        assert_eq!(unlocked_total(&t, 200).unwrap(), 30);
    }

    #[test]
    fn after_last_release_returns_all_unclaimed() {
        let t = schedule();
        let slots = unlockable(&t, 10_000, |slot| slot == 1);
        let indices: Vec<usize> = slots.iter().map(|s| s.slot).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(total_amount(&t).unwrap(), 60);
    }

    #[test]
    fn equal_release_times_are_allowed() {
        let t = tranches_from_parts(&[50, 50], &[1, 2]).unwrap();
        assert_eq!(unlockable(&t, 50, |_| false).len(), 2);
    }

    #[test]
    fn malformed_parts_are_rejected() {
        assert!(matches!(
            tranches_from_parts(&[100, 200], &[1]),
            Err(VestingError::MalformedSchedule)
        ));
        assert!(matches!(
            tranches_from_parts(&[], &[]),
            Err(VestingError::MalformedSchedule)
        ));
        assert!(matches!(
            tranches_from_parts(&[200, 100], &[1, 1]),
            Err(VestingError::MalformedSchedule)
        ));
        let too_long = vec![1i64; MAX_TRANCHES + 1];
        let amounts = vec![1u64; MAX_TRANCHES + 1];
        assert!(matches!(
            tranches_from_parts(&too_long, &amounts),
            Err(VestingError::MalformedSchedule)
        ));
    }

    #[test]
    fn split_puts_remainder_on_last_tranche() {
        let steps = [
            ReleaseStep { release_ts: 10, rate_bps: 2_000 },
            ReleaseStep { release_ts: 20, rate_bps: 2_000 },
            ReleaseStep { release_ts: 30, rate_bps: 3_000 },
            ReleaseStep { release_ts: 40, rate_bps: 3_000 },
        ];
        let t = split_by_rates(99, &steps).unwrap();
        let amounts: Vec<u64> = t.iter().map(|t| t.amount).collect();
        // 19 + 19 + 29 + (29 + 3)
        assert_eq!(amounts, vec![19, 19, 29, 32]);
        assert_eq!(total_amount(&t).unwrap(), 99);
    }

    #[test]
    fn rates_must_sum_to_denominator() {
        let steps = [
            ReleaseStep { release_ts: 10, rate_bps: 5_000 },
            ReleaseStep { release_ts: 20, rate_bps: 4_000 },
        ];
        assert!(matches!(
            split_by_rates(100, &steps),
            Err(VestingError::MalformedSchedule)
        ));
        assert!(matches!(
            split_by_rates(100, &[]),
            Err(VestingError::MalformedSchedule)
        ));
    }
}
