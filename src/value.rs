//! Temporal value representation.
//!
//! [`TemporalValue`] is a closed set of the chrono types the codec understands.
//! Each variant carries a fixed decomposition into ordered integer fields (used
//! by the array shape) and, through [`crate::text`], a canonical text form.
//!
//! ## Core Types
//!
//! - [`TemporalValue`]: one immutable temporal value
//! - [`TemporalKind`]: the variant tag, used for configuration and type ids
//!
//! ## Examples
//!
//! ```rust
//! use serde_temporal::{TemporalKind, TemporalValue};
//! use chrono::{Month, NaiveDate};
//!
//! let month = TemporalValue::from(Month::August);
//! assert_eq!(month.kind(), TemporalKind::Month);
//! assert_eq!(month.fields(), vec![8]);
//!
//! let date = TemporalValue::from(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
//! assert_eq!(date.fields(), vec![2024, 2, 29]);
//! assert_eq!(TemporalKind::Date.from_fields(&[2023, 2, 29]), None);
//! ```

use crate::epoch;
use chrono::{
    DateTime, Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

pub(crate) const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub(crate) const WEEKDAY_NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// The kind of a [`TemporalValue`].
///
/// Kinds key per-type configuration and provide the type id written by the
/// polymorphic wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalKind {
    Month,
    Weekday,
    Date,
    Time,
    DateTime,
    Instant,
    Duration,
}

impl TemporalKind {
    pub const ALL: [TemporalKind; 7] = [
        TemporalKind::Month,
        TemporalKind::Weekday,
        TemporalKind::Date,
        TemporalKind::Time,
        TemporalKind::DateTime,
        TemporalKind::Instant,
        TemporalKind::Duration,
    ];

    /// Returns the type id used as the polymorphic discriminator.
    #[must_use]
    pub const fn type_id(self) -> &'static str {
        match self {
            TemporalKind::Month => "chrono::Month",
            TemporalKind::Weekday => "chrono::Weekday",
            TemporalKind::Date => "chrono::NaiveDate",
            TemporalKind::Time => "chrono::NaiveTime",
            TemporalKind::DateTime => "chrono::NaiveDateTime",
            TemporalKind::Instant => "chrono::DateTime<Utc>",
            TemporalKind::Duration => "chrono::TimeDelta",
        }
    }

    /// Returns `true` for calendar-field enumerations.
    ///
    /// Enumerations ignore the global timestamp default and only use the array
    /// form when a per-type, per-field or per-call layer asks for it.
    #[inline]
    #[must_use]
    pub const fn is_field_enumeration(self) -> bool {
        matches!(self, TemporalKind::Month | TemporalKind::Weekday)
    }

    /// Returns `true` when the kind has a single-number timestamp form.
    #[inline]
    #[must_use]
    pub const fn has_numeric_timestamp(self) -> bool {
        matches!(self, TemporalKind::Instant | TemporalKind::Duration)
    }

    /// Names of the array fields, in wire order.
    #[must_use]
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            TemporalKind::Month => &["month"],
            TemporalKind::Weekday => &["day-of-week"],
            TemporalKind::Date => &["year", "month", "day"],
            TemporalKind::Time => &["hour", "minute", "second", "nanosecond"],
            TemporalKind::DateTime => &[
                "year",
                "month",
                "day",
                "hour",
                "minute",
                "second",
                "nanosecond",
            ],
            TemporalKind::Instant => &["epoch-second", "nanosecond"],
            TemporalKind::Duration => &["second", "nanosecond"],
        }
    }

    #[inline]
    #[must_use]
    pub const fn field_count(self) -> usize {
        self.field_names().len()
    }

    /// Rebuilds a value from its array fields.
    ///
    /// Returns `None` when the field count is wrong or any field is out of range.
    #[must_use]
    pub fn from_fields(self, fields: &[i64]) -> Option<TemporalValue> {
        if fields.len() != self.field_count() {
            return None;
        }
        let small = |i: usize| u32::try_from(fields[i]).ok();
        match self {
            TemporalKind::Month => month_from_number(fields[0]).map(TemporalValue::Month),
            TemporalKind::Weekday => weekday_from_number(fields[0]).map(TemporalValue::Weekday),
            TemporalKind::Date => {
                let year = i32::try_from(fields[0]).ok()?;
                NaiveDate::from_ymd_opt(year, small(1)?, small(2)?).map(TemporalValue::Date)
            }
            TemporalKind::Time => {
                NaiveTime::from_hms_nano_opt(small(0)?, small(1)?, small(2)?, small(3)?)
                    .map(TemporalValue::Time)
            }
            TemporalKind::DateTime => {
                let year = i32::try_from(fields[0]).ok()?;
                let date = NaiveDate::from_ymd_opt(year, small(1)?, small(2)?)?;
                let time = NaiveTime::from_hms_nano_opt(small(3)?, small(4)?, small(5)?, small(6)?)?;
                Some(TemporalValue::DateTime(NaiveDateTime::new(date, time)))
            }
            TemporalKind::Instant => {
                epoch::instant_from_parts(fields[0], small(1)?).map(TemporalValue::Instant)
            }
            TemporalKind::Duration => {
                epoch::duration_from_parts(fields[0], small(1)?).map(TemporalValue::Duration)
            }
        }
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemporalKind::Month => "month",
            TemporalKind::Weekday => "day-of-week",
            TemporalKind::Date => "date",
            TemporalKind::Time => "time",
            TemporalKind::DateTime => "date-time",
            TemporalKind::Instant => "instant",
            TemporalKind::Duration => "duration",
        };
        f.pad(name)
    }
}

/// One immutable temporal value.
///
/// # Examples
///
/// ```rust
/// use serde_temporal::TemporalValue;
/// use chrono::{DateTime, TimeDelta};
///
/// let instant = TemporalValue::from(DateTime::from_timestamp(1, 500_000_000).unwrap());
/// assert_eq!(instant.fields(), vec![1, 500_000_000]);
///
/// let duration = TemporalValue::from(TimeDelta::milliseconds(-1500));
/// assert_eq!(duration.fields(), vec![-2, 500_000_000]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalValue {
    Month(Month),
    Weekday(Weekday),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Duration(TimeDelta),
}

impl TemporalValue {
    #[must_use]
    pub const fn kind(&self) -> TemporalKind {
        match self {
            TemporalValue::Month(_) => TemporalKind::Month,
            TemporalValue::Weekday(_) => TemporalKind::Weekday,
            TemporalValue::Date(_) => TemporalKind::Date,
            TemporalValue::Time(_) => TemporalKind::Time,
            TemporalValue::DateTime(_) => TemporalKind::DateTime,
            TemporalValue::Instant(_) => TemporalKind::Instant,
            TemporalValue::Duration(_) => TemporalKind::Duration,
        }
    }

    /// Decomposes the value into its ordered array fields.
    #[must_use]
    pub fn fields(&self) -> Vec<i64> {
        match *self {
            TemporalValue::Month(m) => vec![i64::from(m.number_from_month())],
            TemporalValue::Weekday(d) => vec![i64::from(d.number_from_monday())],
            TemporalValue::Date(d) => vec![i64::from(d.year()), d.month().into(), d.day().into()],
            TemporalValue::Time(t) => time_fields(t).to_vec(),
            TemporalValue::DateTime(dt) => {
                let date = dt.date();
                let mut fields = vec![
                    i64::from(date.year()),
                    date.month().into(),
                    date.day().into(),
                ];
                fields.extend_from_slice(&time_fields(dt.time()));
                fields
            }
            TemporalValue::Instant(i) => {
                let (secs, nanos) = epoch::instant_parts(&i);
                vec![secs, nanos.into()]
            }
            TemporalValue::Duration(d) => {
                let (secs, nanos) = epoch::duration_parts(&d);
                vec![secs, nanos.into()]
            }
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_month(&self) -> Option<Month> {
        match self {
            TemporalValue::Month(m) => Some(*m),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TemporalValue::Instant(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            TemporalValue::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

fn time_fields(t: NaiveTime) -> [i64; 4] {
    [
        t.hour().into(),
        t.minute().into(),
        t.second().into(),
        t.nanosecond().into(),
    ]
}

pub(crate) fn month_from_number(n: i64) -> Option<Month> {
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| MONTHS.get(i).copied())
}

pub(crate) fn weekday_from_number(n: i64) -> Option<Weekday> {
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| WEEKDAYS.get(i).copied())
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::text::canonical(self))
    }
}

impl From<Month> for TemporalValue {
    fn from(value: Month) -> Self {
        TemporalValue::Month(value)
    }
}

impl From<Weekday> for TemporalValue {
    fn from(value: Weekday) -> Self {
        TemporalValue::Weekday(value)
    }
}

impl From<NaiveDate> for TemporalValue {
    fn from(value: NaiveDate) -> Self {
        TemporalValue::Date(value)
    }
}

impl From<NaiveTime> for TemporalValue {
    fn from(value: NaiveTime) -> Self {
        TemporalValue::Time(value)
    }
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(value: NaiveDateTime) -> Self {
        TemporalValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(value: DateTime<Utc>) -> Self {
        TemporalValue::Instant(value)
    }
}

impl From<TimeDelta> for TemporalValue {
    fn from(value: TimeDelta) -> Self {
        TemporalValue::Duration(value)
    }
}
