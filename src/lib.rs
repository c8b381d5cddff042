//! # serde_temporal
//!
//! Configurable encoding and decoding of date/time values for token-stream
//! serialization frameworks.
//!
//! ## What does it do?
//!
//! Month, day-of-week, local date, local time, local date-time, UTC instant and
//! duration values (the [`chrono`] types) can each appear on the wire in three
//! shapes:
//!
//! - **Scalar**: one string, e.g. `"JANUARY"`, `"2024-01-15"`, `"PT1.5S"`
//! - **Numeric timestamp**: one number, e.g. `1700000000.123456789` (instants
//!   and durations only)
//! - **Array**: the value's integer fields, e.g. `[2024,1,15]`
//!
//! Which shape is written, which pattern renders text and how forgiving the
//! parser is are decided by layered configuration: global, per-type, per-field
//! and per-call [`FormatOptions`]. Decoding accepts every shape regardless of
//! configuration.
//!
//! ## Key Features
//!
//! - **Exact**: epoch conversions use integer and big-integer arithmetic, so
//!   every nanosecond survives a round trip
//! - **Format independent**: encoding writes to a [`TokenSink`] and decoding
//!   reads from a [`TokenSource`]; in-memory and JSON implementations ship
//! - **Polymorphic output**: values can be wrapped with their type id through a
//!   [`TypeIdWriter`]
//! - **Lenient or strict**: symbolic names are case-normalized and alternate
//!   layouts accepted unless leniency is turned off
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Month;
//! use serde_temporal::{from_str, to_string, TemporalKind, TemporalValue};
//!
//! let json = to_string(&TemporalValue::Month(Month::January)).unwrap();
//! assert_eq!(json, r#""JANUARY""#);
//!
//! let back = from_str(&json, TemporalKind::Month).unwrap();
//! assert_eq!(back, Some(TemporalValue::Month(Month::January)));
//!
//! // Zero-padded numbers and field arrays decode too
//! assert_eq!(from_str(r#""08""#, TemporalKind::Month).unwrap(), Some(TemporalValue::Month(Month::August)));
//! assert_eq!(from_str("[8]", TemporalKind::Month).unwrap(), Some(TemporalValue::Month(Month::August)));
//! ```
//!
//! ### Configured Codecs
//!
//! ```rust
//! use chrono::DateTime;
//! use serde_temporal::{
//!     from_str_with, to_string_with, ConfigLayers, FormatOptions, TemporalCodec, TemporalKind,
//!     TemporalValue,
//! };
//!
//! let layers = ConfigLayers::new().with_global(FormatOptions::new().with_nanoseconds(false));
//! let codec = TemporalCodec::from_layers(&layers, TemporalKind::Instant, &FormatOptions::new());
//!
//! let instant = TemporalValue::Instant(DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap());
//! let json = to_string_with(&instant, &codec).unwrap();
//! assert_eq!(json, "1700000000250");
//! assert_eq!(from_str_with(&json, &codec).unwrap(), Some(instant));
//! ```
//!
//! ### Building Token Streams with tokens! Macro
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde_temporal::{from_tokens, tokens, TemporalCodec, TemporalKind, TemporalValue};
//!
//! let codec = TemporalCodec::new(TemporalKind::Date);
//! let value = from_tokens(tokens![[2024, 1, 15]], &codec).unwrap();
//! assert_eq!(value, Some(TemporalValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())));
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - No panics in the public API; every failure is an [`Error`]
//! - Codecs are immutable and `Send + Sync`
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Default shapes for every kind
//! - **`custom_options.rs`** - Layered configuration, patterns and leniency
//!
//! Run any demo with: `cargo run --example <name>`

pub mod buffer;
pub mod codec;
pub mod de;
pub mod decimal;
mod epoch;
pub mod error;
pub mod format;
pub mod json;
pub mod macros;
pub mod options;
pub mod ser;
pub mod shape;
mod text;
pub mod token;
pub mod typed;
pub mod value;

pub use buffer::{TokenBuffer, TokenCursor};
pub use codec::TemporalCodec;
pub use de::{decode, ParseStrategy};
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use format::{resolve_formatter, FormatCache, Formatter};
pub use json::{JsonReader, JsonWriter};
pub use options::{ConfigLayers, EffectiveConfig, FormatOptions};
pub use ser::encode;
pub use shape::{resolve_shape, Shape};
pub use token::{Token, TokenKind, TokenSink, TokenSource};
pub use typed::{encode_with_type, TypeIdContext, TypeIdWriter, ValueShape, WrapperArray, WrapperObject};
pub use value::{TemporalKind, TemporalValue};

use std::io;

/// Encode a value to JSON with default settings for its kind.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use serde_temporal::{to_string, TemporalValue};
///
/// let date = TemporalValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// assert_eq!(to_string(&date).unwrap(), "[2024,1,15]");
/// ```
///
/// # Errors
///
/// Encoding with defaults does not fail in practice; the `Result` mirrors
/// [`to_string_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &TemporalValue) -> Result<String> {
    to_string_with(value, &TemporalCodec::new(value.kind()))
}

/// Encode a value to JSON with a configured codec.
///
/// # Errors
///
/// Returns an error if the codec is for another kind or its pattern cannot
/// render the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with(value: &TemporalValue, codec: &TemporalCodec) -> Result<String> {
    let mut writer = JsonWriter::new();
    codec.encode(value, &mut writer)?;
    Ok(writer.into_inner())
}

/// Encode a value as JSON into an I/O stream.
///
/// # Errors
///
/// As [`to_string_with`], plus I/O failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, value: &TemporalValue, codec: &TemporalCodec) -> Result<()>
where
    W: io::Write,
{
    let json = to_string_with(value, codec)?;
    writer
        .write_all(json.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Encode a value into a token vector.
///
/// # Errors
///
/// As [`to_string_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_tokens(value: &TemporalValue, codec: &TemporalCodec) -> Result<Vec<Token>> {
    let mut buffer = TokenBuffer::new();
    codec.encode(value, &mut buffer)?;
    Ok(buffer.into_tokens())
}

/// Decode a value of `kind` from JSON with default settings.
///
/// JSON `null` decodes to `None`.
///
/// # Examples
///
/// ```rust
/// use chrono::TimeDelta;
/// use serde_temporal::{from_str, TemporalKind, TemporalValue};
///
/// let value = from_str(r#""PT1.5S""#, TemporalKind::Duration).unwrap();
/// assert_eq!(value, Some(TemporalValue::Duration(TimeDelta::milliseconds(1500))));
/// assert_eq!(from_str("null", TemporalKind::Duration).unwrap(), None);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or not a valid value of
/// `kind`. Syntax errors include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str, kind: TemporalKind) -> Result<Option<TemporalValue>> {
    from_str_with(s, &TemporalCodec::new(kind))
}

/// Decode a value from JSON with a configured codec.
///
/// # Errors
///
/// As [`from_str`]; trailing characters after the value are rejected.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with(s: &str, codec: &TemporalCodec) -> Result<Option<TemporalValue>> {
    let mut reader = JsonReader::from_str(s)?;
    let value = if reader.current_kind() == Some(TokenKind::Null) {
        None
    } else {
        codec.decode(&mut reader)?
    };
    reader.end()?;
    Ok(value)
}

/// Decode a value from an I/O stream of JSON.
///
/// # Errors
///
/// As [`from_str_with`], plus I/O failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, codec: &TemporalCodec) -> Result<Option<TemporalValue>>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str_with(&string, codec)
}

/// Decode a value from a token vector.
///
/// A lone [`Token::Null`] decodes to `None`.
///
/// # Errors
///
/// As [`TemporalCodec::decode`]; tokens left over after the value are rejected.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_tokens(tokens: Vec<Token>, codec: &TemporalCodec) -> Result<Option<TemporalValue>> {
    let mut cursor = TokenCursor::new(tokens);
    let value = if cursor.current_kind() == Some(TokenKind::Null) {
        None
    } else {
        codec.decode(&mut cursor)?
    };
    if cursor.remaining() > 0 {
        return Err(Error::custom(format!(
            "{} trailing token(s) after the value",
            cursor.remaining()
        )));
    }
    Ok(value)
}
