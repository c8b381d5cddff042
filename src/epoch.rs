//! Exact epoch arithmetic for instants and durations.
//!
//! Every conversion here is integer-only. Seconds are floored so the nanosecond
//! adjustment is always in `0..1_000_000_000`, matching the array shape.

use crate::decimal::Decimal;
use chrono::{DateTime, TimeDelta, Utc};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Seconds and nanos of an instant.
///
/// A leap-second instant (nanos past one billion) folds into the following
/// second, so nanos are always in `0..1_000_000_000`.
pub(crate) fn instant_parts(instant: &DateTime<Utc>) -> (i64, u32) {
    let seconds = instant.timestamp();
    let nanos = instant.timestamp_subsec_nanos();
    match nanos.checked_sub(NANOS_PER_SECOND as u32) {
        Some(excess) => (seconds.saturating_add(1), excess),
        None => (seconds, nanos),
    }
}

/// The instant as every shape writes it, with a leap second folded forward.
pub(crate) fn normalize_instant(instant: &DateTime<Utc>) -> DateTime<Utc> {
    let (seconds, nanos) = instant_parts(instant);
    instant_from_parts(seconds, nanos).unwrap_or(*instant)
}

pub(crate) fn instant_from_parts(seconds: i64, nanos: u32) -> Option<DateTime<Utc>> {
    if i64::from(nanos) >= NANOS_PER_SECOND {
        return None;
    }
    DateTime::from_timestamp(seconds, nanos)
}

pub(crate) fn instant_millis(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub(crate) fn instant_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    let seconds = millis.div_euclid(MILLIS_PER_SECOND);
    let nanos = millis.rem_euclid(MILLIS_PER_SECOND) * NANOS_PER_MILLI;
    instant_from_parts(seconds, u32::try_from(nanos).ok()?)
}

pub(crate) fn duration_parts(duration: &TimeDelta) -> (i64, u32) {
    let mut seconds = duration.num_seconds();
    let mut nanos = i64::from(duration.subsec_nanos());
    if nanos < 0 {
        seconds -= 1;
        nanos += NANOS_PER_SECOND;
    }
    // nanos is now in 0..NANOS_PER_SECOND
    (seconds, nanos as u32)
}

pub(crate) fn duration_from_parts(seconds: i64, nanos: u32) -> Option<TimeDelta> {
    if i64::from(nanos) >= NANOS_PER_SECOND {
        return None;
    }
    TimeDelta::new(seconds, nanos)
}

pub(crate) fn duration_millis(duration: &TimeDelta) -> i64 {
    duration.num_milliseconds()
}

pub(crate) fn duration_from_millis(millis: i64) -> Option<TimeDelta> {
    TimeDelta::try_milliseconds(millis)
}

/// `seconds + nanos / 10^9` as an exact scale-9 decimal.
pub(crate) fn to_decimal_seconds(seconds: i64, nanos: u32) -> Decimal {
    Decimal::from_parts(seconds, nanos)
}

/// Splits a decimal number of seconds into floored seconds and nanos.
///
/// Digits beyond nanosecond precision are truncated.
pub(crate) fn from_decimal_seconds(value: &Decimal) -> Option<(i64, u32)> {
    value.to_parts()
}

pub(crate) fn instant_from_decimal(value: &Decimal) -> Option<DateTime<Utc>> {
    let (seconds, nanos) = from_decimal_seconds(value)?;
    instant_from_parts(seconds, nanos)
}

pub(crate) fn duration_from_decimal(value: &Decimal) -> Option<TimeDelta> {
    let (seconds, nanos) = from_decimal_seconds(value)?;
    duration_from_parts(seconds, nanos)
}
