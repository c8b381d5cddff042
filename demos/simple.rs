//! Default JSON shapes for every temporal kind.
//!
//! Run with: cargo run --example simple

use chrono::{DateTime, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use serde_temporal::{from_str, to_string, TemporalValue};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("invalid date")?;
    let time = NaiveTime::from_hms_nano_opt(10, 15, 30, 500_000_000).ok_or("invalid time")?;
    let instant = DateTime::from_timestamp(1_700_000_000, 123_456_789).ok_or("out of range")?;

    let values = vec![
        TemporalValue::from(Month::November),
        TemporalValue::from(Weekday::Fri),
        TemporalValue::from(date),
        TemporalValue::from(time),
        TemporalValue::from(NaiveDateTime::new(date, time)),
        TemporalValue::from(instant),
        TemporalValue::from(TimeDelta::new(90, 250_000_000).ok_or("out of range")?),
    ];

    for value in &values {
        let json = to_string(value)?;
        println!("{:<10} {}", value.kind(), json);

        let decoded = from_str(&json, value.kind())?;
        assert_eq!(decoded.as_ref(), Some(value));
    }

    // Canonical text is accepted whatever the write shape.
    let parsed = from_str(r#""2024-01-15T10:15:30.5""#, values[4].kind())?;
    println!("\nParsed from text: {:?}", parsed);

    Ok(())
}
