//! Canonical and lenient text forms, one table entry per kind.
//!
//! The canonical form is what the encoder writes when no pattern is configured,
//! and the canonical parser accepts exactly that (plus the fixed-width numeric
//! form for enumerations). The lenient parser is the second attempt the decoder
//! makes when leniency is on: case-normalized names and common alternate
//! layouts.

use crate::decimal::Decimal;
use crate::epoch;
use crate::value::{
    month_from_number, weekday_from_number, TemporalKind, TemporalValue, MONTHS, MONTH_NAMES,
    WEEKDAYS, WEEKDAY_NAMES,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};

const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
// RFC 3339 with signed years outside 0000..=9999, as the renderer writes them.
const EXTENDED_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%#z";

pub(crate) type ParseResult = std::result::Result<TemporalValue, String>;

/// Renders the canonical text of a value.
pub(crate) fn canonical(value: &TemporalValue) -> String {
    match value {
        TemporalValue::Month(m) => MONTH_NAMES[m.number_from_month() as usize - 1].to_string(),
        TemporalValue::Weekday(d) => {
            WEEKDAY_NAMES[d.number_from_monday() as usize - 1].to_string()
        }
        TemporalValue::Date(d) => d.to_string(),
        TemporalValue::Time(t) => t.format(TIME_FORMAT).to_string(),
        TemporalValue::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        TemporalValue::Instant(i) => {
            epoch::normalize_instant(i).to_rfc3339_opts(SecondsFormat::AutoSi, true)
        }
        TemporalValue::Duration(d) => duration_text(d),
    }
}

/// Strict parser: the canonical text or fixed-width numeric field.
pub(crate) fn parse_canonical(kind: TemporalKind, text: &str) -> ParseResult {
    match kind {
        TemporalKind::Month => {
            if let Some(month) = fixed_width_number(text, 2).and_then(month_from_number) {
                return Ok(TemporalValue::Month(month));
            }
            exact_name(&MONTH_NAMES, text)
                .map(|i| TemporalValue::Month(MONTHS[i]))
                .ok_or_else(|| "expected a two-digit month or a month name".to_string())
        }
        TemporalKind::Weekday => {
            if let Some(day) = fixed_width_number(text, 1).and_then(weekday_from_number) {
                return Ok(TemporalValue::Weekday(day));
            }
            exact_name(&WEEKDAY_NAMES, text)
                .map(|i| TemporalValue::Weekday(WEEKDAYS[i]))
                .ok_or_else(|| "expected an ISO day number or a day name".to_string())
        }
        TemporalKind::Date => text
            .parse::<NaiveDate>()
            .map(TemporalValue::Date)
            .map_err(|e| e.to_string()),
        TemporalKind::Time => NaiveTime::parse_from_str(text, TIME_FORMAT)
            .map(TemporalValue::Time)
            .map_err(|e| e.to_string()),
        TemporalKind::DateTime => NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .map(TemporalValue::DateTime)
            .map_err(|e| e.to_string()),
        TemporalKind::Instant => DateTime::parse_from_rfc3339(text)
            .or_else(|e| DateTime::parse_from_str(text, EXTENDED_INSTANT_FORMAT).map_err(|_| e))
            .map(|dt| TemporalValue::Instant(dt.with_timezone(&Utc)))
            .map_err(|e| e.to_string()),
        TemporalKind::Duration => parse_duration_seconds(text)
            .map(TemporalValue::Duration)
            .ok_or_else(|| "expected PT<seconds>S".to_string()),
    }
}

/// Lenient fallback parser.
///
/// `use_nanoseconds` decides whether a bare integer string is read as epoch
/// seconds or epoch millis, matching how integer tokens are read.
pub(crate) fn parse_lenient(kind: TemporalKind, text: &str, use_nanoseconds: bool) -> ParseResult {
    match kind {
        TemporalKind::Month => symbolic_name(&MONTH_NAMES, text)
            .map(|i| TemporalValue::Month(MONTHS[i]))
            .ok_or_else(|| "no month has that name".to_string()),
        TemporalKind::Weekday => symbolic_name(&WEEKDAY_NAMES, text)
            .map(|i| TemporalValue::Weekday(WEEKDAYS[i]))
            .ok_or_else(|| "no day of week has that name".to_string()),
        TemporalKind::Date => lenient_date_time(text)
            .map(|dt| TemporalValue::Date(dt.date()))
            .ok_or_else(|| "expected yyyy-MM-dd or a date-time".to_string()),
        TemporalKind::Time => NaiveTime::parse_from_str(text, "%H:%M")
            .map(TemporalValue::Time)
            .map_err(|e| e.to_string()),
        TemporalKind::DateTime => lenient_date_time(text)
            .map(TemporalValue::DateTime)
            .ok_or_else(|| "expected an ISO-8601 local date-time".to_string()),
        TemporalKind::Instant => {
            if let Some(instant) = numeric_instant(text, use_nanoseconds) {
                return Ok(TemporalValue::Instant(instant));
            }
            lenient_date_time(text)
                .map(|dt| TemporalValue::Instant(dt.and_utc()))
                .ok_or_else(|| "expected RFC 3339 text or an epoch number".to_string())
        }
        TemporalKind::Duration => parse_iso_duration(text)
            .map(TemporalValue::Duration)
            .ok_or_else(|| "expected an ISO-8601 duration".to_string()),
    }
}

fn fixed_width_number(text: &str, width: usize) -> Option<i64> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn exact_name(names: &[&str], text: &str) -> Option<usize> {
    names.iter().position(|name| *name == text)
}

fn symbolic_name(names: &[&str], text: &str) -> Option<usize> {
    let upper = text.to_uppercase();
    names.iter().position(|name| *name == upper)
}

fn lenient_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix('z'))
        .unwrap_or(text);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn numeric_instant(text: &str, use_nanoseconds: bool) -> Option<DateTime<Utc>> {
    let integral = text
        .strip_prefix('-')
        .unwrap_or(text)
        .bytes()
        .all(|b| b.is_ascii_digit());
    if integral {
        let n: i64 = text.parse().ok()?;
        return if use_nanoseconds {
            epoch::instant_from_parts(n, 0)
        } else {
            epoch::instant_from_millis(n)
        };
    }
    let decimal: Decimal = text.parse().ok()?;
    epoch::instant_from_decimal(&decimal)
}

fn duration_text(duration: &TimeDelta) -> String {
    let (seconds, nanos) = epoch::duration_parts(duration);
    if nanos == 0 {
        return format!("PT{}S", seconds);
    }
    let decimal = epoch::to_decimal_seconds(seconds, nanos).to_string();
    format!("PT{}S", decimal.trim_end_matches('0'))
}

fn parse_duration_seconds(text: &str) -> Option<TimeDelta> {
    let body = text.strip_prefix("PT")?.strip_suffix('S')?;
    let unsigned = body.strip_prefix('-').unwrap_or(body);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let decimal: Decimal = body.parse().ok()?;
    epoch::duration_from_decimal(&decimal)
}

/// Parses `[-]PnDTnHnMn.nS` with any subset of components, case-insensitively.
fn parse_iso_duration(text: &str) -> Option<TimeDelta> {
    const NANOS: i128 = 1_000_000_000;

    let upper = text.to_ascii_uppercase();
    let (negative, rest) = match upper.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, upper.strip_prefix('+').unwrap_or(upper.as_str())),
    };
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total: i128 = 0;
    let mut components = 0;

    if !date_part.is_empty() {
        let days = date_part.strip_suffix('D')?;
        total += parse_component(days)? * 86_400 * NANOS;
        components += 1;
    }

    if let Some(mut time) = time_part {
        for (unit, scale) in [('H', 3_600), ('M', 60)] {
            if let Some(pos) = time.find(unit) {
                total += parse_component(&time[..pos])? * scale * NANOS;
                time = &time[pos + 1..];
                components += 1;
            }
        }
        if let Some(seconds) = time.strip_suffix('S') {
            let decimal: Decimal = seconds.parse().ok()?;
            let (whole, nanos) = decimal.to_parts()?;
            total += i128::from(whole) * NANOS + i128::from(nanos);
            components += 1;
        } else if !time.is_empty() {
            return None;
        }
    }

    if components == 0 {
        return None;
    }
    if negative {
        total = -total;
    }
    let seconds = i64::try_from(total.div_euclid(NANOS)).ok()?;
    let nanos = u32::try_from(total.rem_euclid(NANOS)).ok()?;
    epoch::duration_from_parts(seconds, nanos)
}

fn parse_component(text: &str) -> Option<i128> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
