//! UTC calendar-month release times (no drift; day-of-month clamped).
//! - boundary_k = start date/time + k calendar months, day clamped to last valid day
//! - a monthly schedule releases at boundary_1 ..= boundary_n

use crate::constants::{MAX_TRANCHES, RATE_DENOMINATOR, SECONDS_PER_DAY};
use crate::error::{VestingError, VestingResult};
use crate::utils::schedule::ReleaseStep;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DateTimeUtc {
    year: i32,
    month: u32, // 1-12
    day: u32,   // 1-31
    sod: u32,   // seconds of day [0, 86399]
}

/// `start_ts` shifted by `months` calendar months.
pub fn add_months(start_ts: i64, months: u32) -> VestingResult<i64> {
    let start = datetime_from_unix(start_ts)?;
    let (year, month) = shift_year_month(start.year, start.month, months as i64)?;
    let day = start.day.min(days_in_month(year, month)?);
    unix_from_datetime(DateTimeUtc {
        year,
        month,
        day,
        sod: start.sod,
    })
}

/// Release times one calendar month apart, the first one month after `start_ts`.
pub fn monthly_release_times(start_ts: i64, months: u32) -> VestingResult<Vec<i64>> {
    if months == 0 || months as usize > MAX_TRANCHES {
        return Err(VestingError::MalformedSchedule);
    }
    (1..=months).map(|k| add_months(start_ts, k)).collect()
}

/// Evenly weighted monthly steps; the rate remainder goes to the final month.
pub fn monthly_steps(start_ts: i64, months: u32) -> VestingResult<Vec<ReleaseStep>> {
    let times = monthly_release_times(start_ts, months)?;
    let base = (RATE_DENOMINATOR / months as u64) as u16;
    let remainder = (RATE_DENOMINATOR % months as u64) as u16;
    let last = times.len() - 1;
    Ok(times
        .into_iter()
        .enumerate()
        .map(|(i, release_ts)| ReleaseStep {
            release_ts,
            rate_bps: if i == last { base + remainder } else { base },
        })
        .collect())
}

fn shift_year_month(year: i32, month: u32, add: i64) -> VestingResult<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return Err(VestingError::MalformedSchedule);
    }
    let index = (year as i64)
        .checked_mul(12)
        .and_then(|v| v.checked_add(month as i64 - 1))
        .and_then(|v| v.checked_add(add))
        .ok_or(VestingError::MathOverflow)?;
    let year = i32::try_from(index.div_euclid(12)).map_err(|_| VestingError::MathOverflow)?;
    Ok((year, index.rem_euclid(12) as u32 + 1))
}

fn datetime_from_unix(ts: i64) -> VestingResult<DateTimeUtc> {
    if ts < 0 {
        return Err(VestingError::MalformedSchedule);
    }
    let (year, month, day) = civil_from_days(ts / SECONDS_PER_DAY);
    Ok(DateTimeUtc {
        year,
        month,
        day,
        sod: (ts % SECONDS_PER_DAY) as u32,
    })
}

fn unix_from_datetime(dt: DateTimeUtc) -> VestingResult<i64> {
    days_from_civil(dt.year, dt.month, dt.day)?
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|s| s.checked_add(dt.sod as i64))
        .ok_or(VestingError::MathOverflow)
}

fn days_in_month(year: i32, month: u32) -> VestingResult<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 => Ok(if is_leap_year(year) { 29 } else { 28 }),
        _ => Err(VestingError::MalformedSchedule),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Proleptic Gregorian days since 1970-01-01 (Howard Hinnant, public domain).
fn days_from_civil(y: i32, m: u32, d: u32) -> VestingResult<i64> {
    if !(1..=12).contains(&m) || d == 0 || d > 31 {
        return Err(VestingError::MalformedSchedule);
    }
    let y = y as i64 - if m <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 }.div_euclid(400);
    let yoe = y - era * 400;
    let mp = m as i64 + if m > 2 { -3 } else { 9 };
    let doy = (153 * mp + 2).div_euclid(5) + d as i64 - 1;
    let doe = yoe * 365 + yoe.div_euclid(4) - yoe.div_euclid(100) + doy;
    Ok(era * 146097 + doe - 719468)
}

/// Inverse of `days_from_civil`.
fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 }.div_euclid(146097);
    let doe = z - era * 146097;
    let yoe = (doe - doe.div_euclid(1460) + doe.div_euclid(36524) - doe.div_euclid(146096))
        .div_euclid(365);
    let doy = doe - (365 * yoe + yoe.div_euclid(4) - yoe.div_euclid(100));
    let mp = (5 * doy + 2).div_euclid(153);
    let d = (doy - (153 * mp + 2).div_euclid(5) + 1) as u32;
    let m = (mp + if mp < 10 { 3 } else { -9 }) as u32;
    let y = (yoe + era * 400) as i32 + if m <= 2 { 1 } else { 0 };
    (y, m, d)
}
