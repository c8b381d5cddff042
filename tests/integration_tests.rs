use chrono::{
    DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday,
};
use serde_temporal::{
    from_str, from_str_with, from_tokens, to_string, to_string_with, to_tokens, tokens,
    ConfigLayers, Error, FormatOptions, JsonWriter, ParseStrategy, Shape, TemporalCodec,
    TemporalKind, TemporalValue, Token, TokenCursor, WrapperArray, WrapperObject,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_values() -> Vec<TemporalValue> {
    vec![
        TemporalValue::Month(Month::February),
        TemporalValue::Weekday(Weekday::Sat),
        TemporalValue::Date(date(1969, 12, 31)),
        TemporalValue::Time(NaiveTime::from_hms_nano_opt(0, 0, 0, 1).unwrap()),
        TemporalValue::DateTime(NaiveDateTime::new(
            date(2024, 2, 29),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap(),
        )),
        TemporalValue::Instant(DateTime::from_timestamp(-1, 500_000_000).unwrap()),
        TemporalValue::Duration(TimeDelta::milliseconds(-1500)),
    ]
}

fn codec(kind: TemporalKind, options: FormatOptions) -> TemporalCodec {
    TemporalCodec::from_layers(&ConfigLayers::new(), kind, &options)
}

// Scenario 1: a month with no timestamp request is its name.
#[test]
fn test_month_scalar_by_default() {
    let json = to_string(&TemporalValue::Month(Month::January)).unwrap();
    assert_eq!(json, r#""JANUARY""#);
}

// Scenario 2: an explicit timestamp request writes a one-element array.
#[test]
fn test_month_array_when_requested() {
    let month = codec(TemporalKind::Month, FormatOptions::new().with_timestamps(true));
    let json = to_string_with(&TemporalValue::Month(Month::August), &month).unwrap();
    assert_eq!(json, "[8]");
    assert_eq!(
        from_str("[8]", TemporalKind::Month).unwrap(),
        Some(TemporalValue::Month(Month::August))
    );
}

// Scenario 3: zero-padded month numbers decode.
#[test]
fn test_month_from_two_digits() {
    assert_eq!(
        from_str(r#""08""#, TemporalKind::Month).unwrap(),
        Some(TemporalValue::Month(Month::August))
    );
    assert!(from_str(r#""8""#, TemporalKind::Month).is_err());
}

// Scenario 4: lowercase names only decode leniently.
#[test]
fn test_lenient_versus_strict_names() {
    let lenient = TemporalCodec::new(TemporalKind::Month);
    assert_eq!(
        from_str_with(r#""january""#, &lenient).unwrap(),
        Some(TemporalValue::Month(Month::January))
    );

    let strict = lenient.with_leniency(false);
    let err = from_str_with(r#""january""#, &strict).unwrap_err();
    match err {
        Error::MalformedInput {
            kind,
            input,
            attempted,
            ..
        } => {
            assert_eq!(kind, TemporalKind::Month);
            assert_eq!(input, "january");
            assert_eq!(attempted, vec![ParseStrategy::Canonical]);
        }
        other => panic!("expected malformed input, got {other:?}"),
    }

    // Canonical text still round-trips when strict.
    assert_eq!(
        from_str_with(r#""JANUARY""#, &strict).unwrap(),
        Some(TemporalValue::Month(Month::January))
    );
}

// Scenario 5: empty text is null unless the policy says otherwise.
#[test]
fn test_empty_string_policy() {
    for kind in TemporalKind::ALL {
        assert_eq!(from_str(r#""""#, kind).unwrap(), None);
        assert_eq!(from_str(r#""  ""#, kind).unwrap(), None);

        let rejecting = codec(kind, FormatOptions::new().with_empty_as_null(false));
        assert!(matches!(
            from_str_with(r#""""#, &rejecting),
            Err(Error::MalformedInput { .. })
        ));
    }
}

// Scenario 6: polymorphic month output.
#[test]
fn test_polymorphic_month() {
    let month = TemporalCodec::new(TemporalKind::Month);
    let mut writer = JsonWriter::new();
    month
        .encode_with_type(&TemporalValue::Month(Month::November), &mut writer, &WrapperArray)
        .unwrap();
    assert_eq!(writer.into_inner(), r#"["chrono::Month","NOVEMBER"]"#);

    let mut writer = JsonWriter::new();
    month
        .encode_with_type(&TemporalValue::Month(Month::November), &mut writer, &WrapperObject)
        .unwrap();
    assert_eq!(writer.into_inner(), r#"{"chrono::Month":"NOVEMBER"}"#);
}

#[test]
fn test_polymorphic_instant_numeric() {
    let instant = TemporalCodec::new(TemporalKind::Instant);
    let mut writer = JsonWriter::new();
    instant
        .encode_with_type(
            &TemporalValue::Instant(DateTime::from_timestamp(1, 0).unwrap()),
            &mut writer,
            &WrapperArray,
        )
        .unwrap();
    assert_eq!(
        writer.into_inner(),
        r#"["chrono::DateTime<Utc>",1.000000000]"#
    );
}

#[test]
fn test_round_trip_every_kind_and_shape() {
    for value in sample_values() {
        for shape in [Shape::Scalar, Shape::NumericTimestamp, Shape::Array] {
            for nanos in [true, false] {
                let codec = codec(
                    value.kind(),
                    FormatOptions::new()
                        .with_shape(shape)
                        .with_nanoseconds(nanos),
                );
                let json = to_string_with(&value, &codec).unwrap();
                let back = from_str_with(&json, &codec).unwrap();
                assert_eq!(back, Some(value), "{shape} nanos={nanos}: {json}");
            }
        }
    }
}

#[test]
fn test_millis_drop_sub_millisecond_precision() {
    let codec = codec(TemporalKind::Instant, FormatOptions::new().with_nanoseconds(false));
    let instant = TemporalValue::Instant(DateTime::from_timestamp(10, 123_456_789).unwrap());
    let json = to_string_with(&instant, &codec).unwrap();
    assert_eq!(json, "10123");
    assert_eq!(
        from_str_with(&json, &codec).unwrap(),
        Some(TemporalValue::Instant(DateTime::from_timestamp(10, 123_000_000).unwrap()))
    );
}

#[test]
fn test_decoder_ignores_configured_shape() {
    let scalar_only = codec(TemporalKind::Date, FormatOptions::new().with_shape(Shape::Scalar));
    let expected = Some(TemporalValue::Date(date(2024, 1, 15)));
    assert_eq!(from_str_with("[2024,1,15]", &scalar_only).unwrap(), expected);
    assert_eq!(from_str_with(r#""2024-01-15""#, &scalar_only).unwrap(), expected);
}

#[test]
fn test_array_arity_errors() {
    let err = from_str("[2024,1,15,0]", TemporalKind::Date).unwrap_err();
    assert!(matches!(err, Error::ArrayArity { expected: 3, .. }), "{err}");

    let err = from_str("[10,15]", TemporalKind::Time).unwrap_err();
    assert!(matches!(err, Error::ArrayArity { expected: 4, .. }), "{err}");

    let err = from_str(r#"[2024,"1",15]"#, TemporalKind::Date).unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { .. }), "{err}");
}

#[test]
fn test_unexpected_tokens() {
    let err = from_str("true", TemporalKind::Month).unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { .. }));
    let err = from_str("20240115", TemporalKind::Date).unwrap_err();
    assert!(err.to_string().contains("expected string or start-array"));
}

#[test]
fn test_single_value_arrays() {
    let unwrap = codec(
        TemporalKind::Weekday,
        FormatOptions::new().with_single_value_unwrap(true),
    );
    assert_eq!(
        from_str_with(r#"["MONDAY"]"#, &unwrap).unwrap(),
        Some(TemporalValue::Weekday(Weekday::Mon))
    );
    assert!(matches!(
        from_str_with(r#"["MONDAY","TUESDAY"]"#, &unwrap),
        Err(Error::ArrayArity { .. })
    ));
    // Integer arrays are still field arrays.
    assert_eq!(
        from_str_with("[1]", &unwrap).unwrap(),
        Some(TemporalValue::Weekday(Weekday::Mon))
    );
}

#[test]
fn test_object_wrapped_scalar() {
    assert_eq!(
        from_str(r#"{"value":"MARCH"}"#, TemporalKind::Month).unwrap(),
        Some(TemporalValue::Month(Month::March))
    );
    assert_eq!(from_str("{}", TemporalKind::Month).unwrap(), None);
}

#[test]
fn test_patterns_and_zones() {
    let zone = FixedOffset::east_opt(2 * 3600).unwrap();
    let layers = ConfigLayers::new()
        .with_type(
            TemporalKind::Instant,
            FormatOptions::new().with_shape(Shape::Scalar),
        )
        .with_field(
            FormatOptions::new()
                .with_pattern("%d.%m.%Y %H:%M")
                .with_timezone(zone),
        );
    let codec = TemporalCodec::from_layers(&layers, TemporalKind::Instant, &FormatOptions::new());
    let instant = TemporalValue::Instant(
        DateTime::parse_from_rfc3339("2024-01-15T10:15:00Z")
            .unwrap()
            .with_timezone(&Utc),
    );
    let json = to_string_with(&instant, &codec).unwrap();
    assert_eq!(json, r#""15.01.2024 12:15""#);
    assert_eq!(from_str_with(&json, &codec).unwrap(), Some(instant));

    // With a pattern in force the canonical text is rejected.
    assert!(from_str_with(r#""2024-01-15T10:15:00Z""#, &codec).is_err());
}

#[test]
fn test_zone_without_pattern_renders_offset() {
    let zone = FixedOffset::west_opt(5 * 3600).unwrap();
    let codec = codec(
        TemporalKind::Instant,
        FormatOptions::new()
            .with_timestamps(false)
            .with_timezone(zone),
    );
    let instant = TemporalValue::Instant(DateTime::from_timestamp(0, 0).unwrap());
    let json = to_string_with(&instant, &codec).unwrap();
    assert_eq!(json, r#""1969-12-31T19:00:00-05:00""#);
    assert_eq!(from_str_with(&json, &codec).unwrap(), Some(instant));
}

#[test]
fn test_global_zone_is_not_injected() {
    let layers = ConfigLayers::new().with_global(
        FormatOptions::new()
            .with_timestamps(false)
            .with_timezone(FixedOffset::east_opt(3600).unwrap()),
    );
    let codec = TemporalCodec::from_layers(&layers, TemporalKind::Instant, &FormatOptions::new());
    let instant = TemporalValue::Instant(DateTime::from_timestamp(0, 0).unwrap());
    assert_eq!(to_string_with(&instant, &codec).unwrap(), r#""1970-01-01T00:00:00Z""#);
}

#[test]
fn test_layers_from_json_config() {
    let layers: ConfigLayers = serde_json::from_str(
        r#"{
            "global": { "use_timestamp": false, "lenient": false },
            "types": { "Month": { "shape": "array" } },
            "field": { "use_nanoseconds": false }
        }"#,
    )
    .unwrap();

    let month = TemporalCodec::from_layers(&layers, TemporalKind::Month, &FormatOptions::new());
    assert_eq!(month.shape(), Shape::Array);
    assert!(!month.config().lenient);

    let date = TemporalCodec::from_layers(&layers, TemporalKind::Date, &FormatOptions::new());
    assert_eq!(date.shape(), Shape::Scalar);

    let back = serde_json::to_string(&layers).unwrap();
    let again: ConfigLayers = serde_json::from_str(&back).unwrap();
    assert_eq!(again, layers);
}

#[test]
fn test_tokens_api() {
    let codec = TemporalCodec::new(TemporalKind::Duration)
        .with_overrides(&FormatOptions::new().with_shape(Shape::Array));
    let value = TemporalValue::Duration(TimeDelta::seconds(90));
    let tokens = to_tokens(&value, &codec).unwrap();
    assert_eq!(tokens, tokens![[90, 0]]);
    assert_eq!(from_tokens(tokens, &codec).unwrap(), Some(value));
    assert_eq!(from_tokens(vec![Token::Null], &codec).unwrap(), None);
}

#[test]
fn test_source_granted_unwrap() {
    let codec = TemporalCodec::new(TemporalKind::Date);
    let mut cursor = TokenCursor::new(tokens![["2024-01-15"]]).with_single_value_unwrap(true);
    assert_eq!(
        codec.decode(&mut cursor).unwrap(),
        Some(TemporalValue::Date(date(2024, 1, 15)))
    );
}

#[test]
fn test_lenient_alternate_layouts() {
    assert_eq!(
        from_str(r#""2024-01-15 10:15""#, TemporalKind::DateTime).unwrap(),
        Some(TemporalValue::DateTime(NaiveDateTime::new(
            date(2024, 1, 15),
            NaiveTime::from_hms_opt(10, 15, 0).unwrap()
        )))
    );
    assert_eq!(
        from_str(r#""PT1H""#, TemporalKind::Duration).unwrap(),
        Some(TemporalValue::Duration(TimeDelta::hours(1)))
    );
    let strict = codec(TemporalKind::Duration, FormatOptions::new().with_leniency(false));
    assert!(from_str_with(r#""PT1H""#, &strict).is_err());
}

#[test]
fn test_syntax_errors_carry_position() {
    let err = from_str("[2024,\n1,", TemporalKind::Date).unwrap_err();
    assert!(matches!(err, Error::Syntax { line: 2, .. }), "{err:?}");
}

#[test]
fn test_field_pattern_selects_text_under_default_layers() {
    let layers = ConfigLayers::new().with_field(FormatOptions::new().with_pattern("%d/%m/%Y"));
    let codec = TemporalCodec::from_layers(&layers, TemporalKind::Date, &FormatOptions::new());
    let value = TemporalValue::Date(date(2024, 1, 15));

    let json = to_string_with(&value, &codec).unwrap();
    assert_eq!(json, r#""15/01/2024""#);
    assert_eq!(from_str_with(&json, &codec).unwrap(), Some(value));

    // An explicit timestamp request still writes the array.
    let array = codec.with_overrides(&FormatOptions::new().with_timestamps(true));
    assert_eq!(to_string_with(&value, &array).unwrap(), "[2024,1,15]");
}

#[test]
fn test_enumeration_pattern_with_time_fields_fails_cleanly() {
    let codec = codec(TemporalKind::Month, FormatOptions::new().with_pattern("%H"));
    let err = from_str_with(r#""10""#, &codec).unwrap_err();
    assert!(
        matches!(err, Error::MalformedInput { ref attempted, .. } if attempted == &[ParseStrategy::Pattern]),
        "{err:?}"
    );
}

#[test]
fn test_huge_exponents_are_rejected_quickly() {
    for json in ["1e-4000000000", "1e4000000000", "-9e-99999"] {
        assert!(from_str(json, TemporalKind::Instant).is_err(), "{json}");
        assert!(from_str(json, TemporalKind::Duration).is_err(), "{json}");
    }
    // A tiny fraction within bounds truncates to the epoch.
    assert_eq!(
        from_str("1e-30", TemporalKind::Instant).unwrap(),
        Some(TemporalValue::Instant(DateTime::from_timestamp(0, 0).unwrap()))
    );
}

#[test]
fn test_escaped_strings_reach_the_decoder() {
    assert_eq!(
        from_str(r#""\u004aANUARY""#, TemporalKind::Month).unwrap(),
        Some(TemporalValue::Month(Month::January))
    );
    let err = from_str(r#""\ud83d\ude00""#, TemporalKind::Month).unwrap_err();
    assert_eq!(err.input(), Some("\u{1F600}"));
}

#[test]
fn test_non_json_numbers_are_syntax_errors() {
    for json in ["01", "-.5", "1.e5"] {
        assert!(
            matches!(from_str(json, TemporalKind::Instant), Err(Error::Syntax { .. })),
            "{json}"
        );
    }
}

#[test]
fn test_leap_second_instant_is_written_as_next_second() {
    let leap = TemporalValue::Instant(DateTime::from_timestamp(59, 1_500_000_000).unwrap());
    let folded = TemporalValue::Instant(DateTime::from_timestamp(60, 500_000_000).unwrap());
    for shape in [Shape::Scalar, Shape::NumericTimestamp, Shape::Array] {
        let codec = codec(TemporalKind::Instant, FormatOptions::new().with_shape(shape));
        let json = to_string_with(&leap, &codec).unwrap();
        assert_eq!(from_str_with(&json, &codec).unwrap(), Some(folded), "{shape}: {json}");
    }
    let millis = codec(TemporalKind::Instant, FormatOptions::new().with_nanoseconds(false));
    assert_eq!(to_string_with(&leap, &millis).unwrap(), "60500");
}

#[test]
fn test_duration_with_pattern_uses_canonical_text() {
    let codec = codec(TemporalKind::Duration, FormatOptions::new().with_pattern("%H:%M"));
    let value = TemporalValue::Duration(TimeDelta::seconds(90));
    let json = to_string_with(&value, &codec).unwrap();
    assert_eq!(json, r#""PT90S""#);
    assert_eq!(from_str_with(&json, &codec).unwrap(), Some(value));
}
