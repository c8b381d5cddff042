//! Property-based tests for the round-trip guarantees.
//!
//! Every value must survive encode-then-decode in every shape, and numeric
//! timestamps must keep every nanosecond.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use proptest::prelude::*;
use serde_temporal::{
    from_str_with, to_string_with, ConfigLayers, FormatOptions, Shape, TemporalCodec,
    TemporalKind, TemporalValue,
};

const SHAPES: [Shape; 3] = [Shape::Scalar, Shape::NumericTimestamp, Shape::Array];

fn roundtrip(value: &TemporalValue, options: FormatOptions) -> bool {
    let codec = TemporalCodec::from_layers(&ConfigLayers::new(), value.kind(), &options);
    match to_string_with(value, &codec) {
        Ok(serialized) => match from_str_with(&serialized, &codec) {
            Ok(Some(decoded)) => *value == decoded,
            Ok(None) => {
                eprintln!("Decoded null from: {}", serialized);
                false
            }
            Err(e) => {
                eprintln!("Decode failed: {}", e);
                eprintln!("Encoded was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Encode failed: {}", e);
            false
        }
    }
}

fn all_shapes(value: &TemporalValue) -> bool {
    SHAPES
        .iter()
        .all(|shape| roundtrip(value, FormatOptions::new().with_shape(*shape)))
}

fn naive_date() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=366).prop_filter_map("valid ordinal", |(year, day)| {
        NaiveDate::from_yo_opt(year, day)
    })
}

fn naive_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..86_400, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or(NaiveTime::MIN)
    })
}

proptest! {
    #[test]
    fn prop_month(n in 1i64..=12) {
        let value = TemporalKind::Month.from_fields(&[n]).unwrap();
        prop_assert!(all_shapes(&value));
        prop_assert!(roundtrip(&value, FormatOptions::new().with_leniency(false)));
    }

    #[test]
    fn prop_weekday(n in 1i64..=7) {
        let value = TemporalKind::Weekday.from_fields(&[n]).unwrap();
        prop_assert!(all_shapes(&value));
    }

    #[test]
    fn prop_date(d in naive_date()) {
        prop_assert!(all_shapes(&TemporalValue::Date(d)));
    }

    #[test]
    fn prop_time(t in naive_time()) {
        prop_assert!(all_shapes(&TemporalValue::Time(t)));
    }

    #[test]
    fn prop_date_time(d in naive_date(), t in naive_time()) {
        prop_assert!(all_shapes(&TemporalValue::DateTime(NaiveDateTime::new(d, t))));
    }

    // Nanosecond exactness across the whole fraction range.
    #[test]
    fn prop_instant_nanos(secs in -8_000_000_000_000i64..8_000_000_000_000, nanos in 0u32..1_000_000_000) {
        let instant = DateTime::from_timestamp(secs, nanos).unwrap();
        prop_assert!(all_shapes(&TemporalValue::Instant(instant)));
    }

    #[test]
    fn prop_instant_strict_text(secs in -8_000_000_000_000i64..8_000_000_000_000, nanos in 0u32..1_000_000_000) {
        let instant = TemporalValue::Instant(DateTime::from_timestamp(secs, nanos).unwrap());
        let strict = FormatOptions::new().with_shape(Shape::Scalar).with_leniency(false);
        prop_assert!(roundtrip(&instant, strict));
    }

    #[test]
    fn prop_instant_millis(millis in -62_000_000_000_000i64..250_000_000_000_000) {
        let instant = DateTime::from_timestamp_millis(millis).unwrap();
        let value = TemporalValue::Instant(instant);
        prop_assert!(roundtrip(&value, FormatOptions::new().with_nanoseconds(false)));
    }

    #[test]
    fn prop_duration(secs in -1_000_000_000_000i64..1_000_000_000_000, nanos in 0u32..1_000_000_000) {
        let duration = TimeDelta::new(secs, nanos).unwrap();
        prop_assert!(all_shapes(&TemporalValue::Duration(duration)));
    }

    #[test]
    fn prop_fields_round_trip(d in naive_date(), t in naive_time()) {
        let value = TemporalValue::DateTime(NaiveDateTime::new(d, t));
        prop_assert_eq!(TemporalKind::DateTime.from_fields(&value.fields()), Some(value));
    }
}
