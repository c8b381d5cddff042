//! Configuration layers, patterns, zones, leniency and type ids.
//!
//! Run with: cargo run --example custom_options

use chrono::{DateTime, FixedOffset, Month, NaiveDate};
use serde_temporal::{
    from_str_with, to_string_with, ConfigLayers, FormatOptions, JsonWriter, Shape,
    TemporalCodec, TemporalKind, TemporalValue, WrapperArray,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Layers can come from a config file.
    let layers: ConfigLayers = serde_json::from_str(
        r#"{
            "global": { "use_timestamp": false },
            "types": { "Month": { "shape": "array" } }
        }"#,
    )?;

    let month = TemporalValue::from(Month::March);
    let codec = TemporalCodec::from_layers(&layers, TemporalKind::Month, &FormatOptions::new());
    println!("Month with type layer: {}", to_string_with(&month, &codec)?);

    let date = TemporalValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("invalid date")?);
    let codec = TemporalCodec::from_layers(&layers, TemporalKind::Date, &FormatOptions::new());
    println!("Date with global layer: {}", to_string_with(&date, &codec)?);

    // A field pattern selects text output even with timestamps on.
    let field = ConfigLayers::new().with_field(FormatOptions::new().with_pattern("%d/%m/%Y"));
    let codec = TemporalCodec::from_layers(&field, TemporalKind::Date, &FormatOptions::new());
    let json = to_string_with(&date, &codec)?;
    println!("Date with field pattern: {}", json);
    assert_eq!(from_str_with(&json, &codec)?, Some(date));

    // Instants render in the configured zone.
    let tokyo = FixedOffset::east_opt(9 * 3600).ok_or("invalid offset")?;
    let instant = TemporalValue::from(
        DateTime::from_timestamp(1_700_000_000, 0).ok_or("out of range")?,
    );
    let codec = TemporalCodec::new(TemporalKind::Instant).with_overrides(
        &FormatOptions::new()
            .with_shape(Shape::Scalar)
            .with_timezone(tokyo),
    );
    println!("Instant in +09:00: {}", to_string_with(&instant, &codec)?);

    // Leniency decides whether case-insensitive names are accepted.
    let lenient = TemporalCodec::new(TemporalKind::Month);
    let strict = lenient.with_leniency(false);
    println!("Lenient \"march\": {:?}", from_str_with(r#""march""#, &lenient)?);
    println!("Strict \"march\": {}", from_str_with(r#""march""#, &strict).is_err());

    // Polymorphic output wraps the value in its type id.
    let codec = TemporalCodec::new(TemporalKind::Date);
    let mut writer = JsonWriter::new();
    codec.encode_with_type(&date, &mut writer, &WrapperArray)?;
    println!("Typed date: {}", writer.into_inner());

    Ok(())
}
