//! Pattern formatters and their per-codec cache.
//!
//! A [`Formatter`] wraps a strftime-style pattern (see
//! [`chrono::format::strftime`]) and, optionally, the zone instants are
//! rendered in. [`resolve_formatter`] picks the formatter a configuration asks
//! for, and [`FormatCache`] memoizes that choice for one codec.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde_temporal::{Formatter, TemporalKind, TemporalValue};
//!
//! let formatter = Formatter::new("%d/%m/%Y").unwrap();
//! let date = TemporalValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! assert_eq!(formatter.format(&date).unwrap(), "15/01/2024");
//! assert_eq!(formatter.parse(TemporalKind::Date, "15/01/2024").unwrap(), date);
//! ```

use crate::de::ParseStrategy;
use crate::epoch;
use crate::options::EffectiveConfig;
use crate::text;
use crate::value::{TemporalKind, TemporalValue, MONTHS, WEEKDAYS};
use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use std::fmt::Write;
use std::sync::Arc;
use tracing::trace;

/// ISO-8601 with offset, used for instants when only a zone was requested.
const INSTANT_WITH_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// A validated pattern plus an optional zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formatter {
    pattern: Arc<str>,
    zone: Option<FixedOffset>,
    explicit: bool,
}

impl Formatter {
    /// Builds a formatter from a caller-supplied pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern has an unknown or
    /// malformed specifier.
    pub fn new(pattern: &str) -> Result<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::invalid_pattern(pattern, "unrecognized specifier"));
        }
        Ok(Formatter {
            pattern: Arc::from(pattern),
            zone: None,
            explicit: true,
        })
    }

    /// The type default for instants rendered in `zone`.
    #[must_use]
    pub fn instant_default(zone: FixedOffset) -> Self {
        Formatter {
            pattern: Arc::from(INSTANT_WITH_OFFSET),
            zone: Some(zone),
            explicit: false,
        }
    }

    /// Returns a copy that renders instants in `zone`.
    #[must_use]
    pub fn with_zone(&self, zone: FixedOffset) -> Self {
        Formatter {
            zone: Some(zone),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn zone(&self) -> Option<FixedOffset> {
        self.zone
    }

    /// Whether this formatter came from a caller-supplied pattern.
    ///
    /// Only explicit formatters take over decoding; the instant type default
    /// writes text the canonical parser already reads.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Renders `value` with this pattern.
    ///
    /// Month and day-of-week values are rendered through a representative date,
    /// so `%B`, `%b`, `%m`, `%A`, `%a` and `%u` all work.
    ///
    /// Durations have no pattern form and always render as `PT<seconds>S`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidPattern`] when the pattern needs fields the
    /// value does not have (e.g. `%H` on a date).
    pub fn format(&self, value: &TemporalValue) -> Result<String> {
        let mut out = String::new();
        let written = match value {
            TemporalValue::Month(m) => match month_proxy(m.number_from_month()) {
                Some(date) => write!(out, "{}", date.format(&self.pattern)),
                None => Err(std::fmt::Error),
            },
            TemporalValue::Weekday(w) => match weekday_proxy(w.num_days_from_monday()) {
                Some(date) => write!(out, "{}", date.format(&self.pattern)),
                None => Err(std::fmt::Error),
            },
            TemporalValue::Date(d) => write!(out, "{}", d.format(&self.pattern)),
            TemporalValue::Time(t) => write!(out, "{}", t.format(&self.pattern)),
            TemporalValue::DateTime(dt) => write!(out, "{}", dt.format(&self.pattern)),
            TemporalValue::Instant(i) => {
                let instant = epoch::normalize_instant(i);
                match self.zone {
                    Some(zone) => {
                        write!(out, "{}", instant.with_timezone(&zone).format(&self.pattern))
                    }
                    None => write!(out, "{}", instant.format(&self.pattern)),
                }
            }
            TemporalValue::Duration(_) => return Ok(text::canonical(value)),
        };
        written.map_err(|_| {
            Error::invalid_pattern(
                &self.pattern,
                &format!("pattern cannot render a {}", value.kind()),
            )
        })?;
        Ok(out)
    }

    /// Parses `text` as a value of `kind` with this pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the text does not match.
    pub fn parse(&self, kind: TemporalKind, text: &str) -> Result<TemporalValue> {
        self.try_parse(kind, text)
            .map_err(|reason| Error::malformed(kind, text, reason, vec![ParseStrategy::Pattern]))
    }

    pub(crate) fn try_parse(
        &self,
        kind: TemporalKind,
        text: &str,
    ) -> std::result::Result<TemporalValue, String> {
        let pattern: &str = &self.pattern;
        match kind {
            TemporalKind::Month => MONTHS
                .iter()
                .zip(1u32..)
                .find(|(_, n)| {
                    month_proxy(*n).and_then(|d| render(d, pattern)).as_deref() == Some(text)
                })
                .map(|(m, _)| TemporalValue::Month(*m))
                .ok_or_else(|| format!("no month renders as {:?} with {:?}", text, pattern)),
            TemporalKind::Weekday => WEEKDAYS
                .iter()
                .find(|w| {
                    weekday_proxy(w.num_days_from_monday())
                        .and_then(|d| render(d, pattern))
                        .as_deref()
                        == Some(text)
                })
                .map(|w| TemporalValue::Weekday(*w))
                .ok_or_else(|| format!("no day-of-week renders as {:?} with {:?}", text, pattern)),
            TemporalKind::Date => NaiveDate::parse_from_str(text, pattern)
                .map(TemporalValue::Date)
                .map_err(|e| e.to_string()),
            TemporalKind::Time => NaiveTime::parse_from_str(text, pattern)
                .map(TemporalValue::Time)
                .map_err(|e| e.to_string()),
            TemporalKind::DateTime => NaiveDateTime::parse_from_str(text, pattern)
                .map(TemporalValue::DateTime)
                .map_err(|e| e.to_string()),
            TemporalKind::Instant => self.parse_instant(text).map(TemporalValue::Instant),
            TemporalKind::Duration => crate::text::parse_canonical(kind, text),
        }
    }

    fn parse_instant(&self, text: &str) -> std::result::Result<DateTime<Utc>, String> {
        match DateTime::parse_from_str(text, &self.pattern) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(with_offset) => {
                // Patterns without an offset read as local time in the zone.
                let naive = NaiveDateTime::parse_from_str(text, &self.pattern)
                    .map_err(|_| with_offset.to_string())?;
                let zone = self.zone.unwrap_or_else(|| Utc.fix());
                zone.from_local_datetime(&naive)
                    .single()
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or_else(|| "local time is ambiguous in zone".to_string())
            }
        }
    }
}

// `None` when the pattern needs fields a date does not have.
fn render(date: NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

fn month_proxy(month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2000, month, 1)
}

// 2024-01-01 is a Monday.
fn weekday_proxy(days_from_monday: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1 + days_from_monday)
}

/// Picks the formatter a configuration asks for.
///
/// A pattern from any layer wins; the zone is attached only when the per-field
/// or per-call layer set one. Without a pattern, instants get the ISO offset
/// form when a zone was requested, and every other case uses canonical text
/// (`Ok(None)`).
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] for a malformed pattern.
pub fn resolve_formatter(config: &EffectiveConfig) -> Result<Option<Formatter>> {
    match (&config.pattern, config.timezone) {
        (Some(pattern), zone) => {
            let formatter = Formatter::new(pattern)?;
            Ok(Some(match zone {
                Some(zone) => formatter.with_zone(zone),
                None => formatter,
            }))
        }
        (None, Some(zone)) if config.kind == TemporalKind::Instant => {
            Ok(Some(Formatter::instant_default(zone)))
        }
        (None, _) => Ok(None),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FormatKey {
    kind: TemporalKind,
    pattern: Option<Arc<str>>,
    zone: Option<FixedOffset>,
}

impl FormatKey {
    fn of(config: &EffectiveConfig) -> Self {
        FormatKey {
            kind: config.kind,
            pattern: config.pattern.clone(),
            zone: config.timezone,
        }
    }
}

#[derive(Debug)]
struct CachedFormat {
    key: FormatKey,
    formatter: Option<Formatter>,
}

/// Memoized formatter for one codec.
///
/// Readers never block: a miss computes the formatter and publishes it, and
/// threads racing on the same miss may each compute it once.
#[derive(Debug, Default)]
pub struct FormatCache {
    slot: ArcSwapOption<CachedFormat>,
}

impl FormatCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached formatter for `config`, resolving it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates [`resolve_formatter`] errors; failures are not cached.
    pub fn get_or_resolve(&self, config: &EffectiveConfig) -> Result<Option<Formatter>> {
        let key = FormatKey::of(config);
        let guard = self.slot.load();
        if let Some(cached) = &*guard {
            if cached.key == key {
                return Ok(cached.formatter.clone());
            }
        }
        trace!(kind = %config.kind, pattern = ?config.pattern, zone = ?config.timezone, "formatter cache miss");
        let formatter = resolve_formatter(config)?;
        self.slot.store(Some(Arc::new(CachedFormat {
            key,
            formatter: formatter.clone(),
        })));
        Ok(formatter)
    }

    /// Whether a formatter (or the absence of one) has been published.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.slot.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ConfigLayers, FormatOptions};
    use chrono::{Month, Weekday};

    fn config(kind: TemporalKind, call: FormatOptions) -> EffectiveConfig {
        ConfigLayers::new().resolve(kind, &call)
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Formatter::new("%Y-%Q").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_month_pattern() {
        let formatter = Formatter::new("%b").unwrap();
        let march = TemporalValue::Month(Month::March);
        assert_eq!(formatter.format(&march).unwrap(), "Mar");
        assert_eq!(formatter.parse(TemporalKind::Month, "Mar").unwrap(), march);
        assert!(formatter.parse(TemporalKind::Month, "Smarch").is_err());
    }

    #[test]
    fn test_weekday_pattern() {
        let formatter = Formatter::new("%A").unwrap();
        let friday = TemporalValue::Weekday(Weekday::Fri);
        assert_eq!(formatter.format(&friday).unwrap(), "Friday");
        assert_eq!(formatter.parse(TemporalKind::Weekday, "Friday").unwrap(), friday);
    }

    #[test]
    fn test_pattern_needing_missing_fields() {
        let formatter = Formatter::new("%H:%M").unwrap();
        let date = TemporalValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(matches!(
            formatter.format(&date),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_enumeration_pattern_with_time_fields_does_not_match() {
        let formatter = Formatter::new("%H").unwrap();
        assert!(formatter.parse(TemporalKind::Month, "10").is_err());
        assert!(formatter.parse(TemporalKind::Weekday, "00").is_err());
        assert!(matches!(
            formatter.format(&TemporalValue::Month(Month::May)),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_duration_ignores_pattern() {
        let formatter = Formatter::new("%d/%m/%Y").unwrap();
        let duration = TemporalValue::Duration(chrono::TimeDelta::milliseconds(1500));
        assert_eq!(formatter.format(&duration).unwrap(), "PT1.5S");
        assert_eq!(formatter.parse(TemporalKind::Duration, "PT1.5S").unwrap(), duration);
    }

    #[test]
    fn test_instant_in_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let formatter = Formatter::new("%Y-%m-%d %H:%M").unwrap().with_zone(zone);
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 15, 0).unwrap();
        let value = TemporalValue::Instant(instant);
        assert_eq!(formatter.format(&value).unwrap(), "2024-01-15 12:15");
        assert_eq!(
            formatter.parse(TemporalKind::Instant, "2024-01-15 12:15").unwrap(),
            value
        );
    }

    #[test]
    fn test_resolve_formatter_priority() {
        assert_eq!(resolve_formatter(&config(TemporalKind::Date, FormatOptions::new())).unwrap(), None);

        let layers = ConfigLayers::new()
            .with_global(FormatOptions::new().with_pattern("%Y"))
            .with_field(FormatOptions::new().with_pattern("%d.%m.%Y"));
        let resolved = resolve_formatter(&layers.resolve(TemporalKind::Date, &FormatOptions::new()))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.pattern(), "%d.%m.%Y");
        assert!(resolved.is_explicit());
        assert_eq!(resolved.zone(), None);
    }

    #[test]
    fn test_instant_default_only_with_explicit_zone() {
        let zone = FixedOffset::east_opt(3600).unwrap();
        let none = resolve_formatter(&config(TemporalKind::Instant, FormatOptions::new())).unwrap();
        assert_eq!(none, None);

        let zoned = resolve_formatter(&config(
            TemporalKind::Instant,
            FormatOptions::new().with_timezone(zone),
        ))
        .unwrap()
        .unwrap();
        assert!(!zoned.is_explicit());
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 15, 30).unwrap();
        assert_eq!(
            zoned.format(&TemporalValue::Instant(instant)).unwrap(),
            "2024-01-15T11:15:30+01:00"
        );

        // Zone-naive kinds ignore a zone without a pattern.
        let date = resolve_formatter(&config(
            TemporalKind::Date,
            FormatOptions::new().with_timezone(zone),
        ))
        .unwrap();
        assert_eq!(date, None);
    }

    #[test]
    fn test_cache_reuses_and_rekeys() {
        let cache = FormatCache::new();
        assert!(!cache.is_populated());
        let first = config(TemporalKind::Date, FormatOptions::new().with_pattern("%d/%m/%Y"));
        let a = cache.get_or_resolve(&first).unwrap();
        assert!(cache.is_populated());
        let b = cache.get_or_resolve(&first).unwrap();
        assert_eq!(a, b);

        let second = config(TemporalKind::Date, FormatOptions::new().with_pattern("%Y%m%d"));
        let c = cache.get_or_resolve(&second).unwrap().unwrap();
        assert_eq!(c.pattern(), "%Y%m%d");
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let cache = FormatCache::new();
        let bad = config(TemporalKind::Date, FormatOptions::new().with_pattern("%Q"));
        assert!(cache.get_or_resolve(&bad).is_err());
        assert!(!cache.is_populated());
    }
}
