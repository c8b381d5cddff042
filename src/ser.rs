//! Temporal value encoding.
//!
//! [`encode`] writes one value to a [`TokenSink`] in a resolved [`Shape`]:
//!
//! - **Scalar**: one string token, from the formatter or the canonical text
//! - **Numeric timestamp**: one decimal token (seconds at scale 9) or one
//!   integer token (millis); kinds without a numeric form write their array
//! - **Array**: the kind's integer fields between array delimiters
//!
//! All epoch arithmetic is exact, including for instants before 1970 and
//! negative durations.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{DateTime, Month};
//! use serde_temporal::{encode, tokens, EffectiveConfig, Shape, TemporalKind, TemporalValue, TokenBuffer};
//!
//! let config = EffectiveConfig::defaults(TemporalKind::Month);
//! let mut buffer = TokenBuffer::new();
//! encode(&TemporalValue::Month(Month::January), Shape::Scalar, None, &config, &mut buffer).unwrap();
//! assert_eq!(buffer.into_tokens(), tokens!["JANUARY"]);
//!
//! let config = EffectiveConfig::defaults(TemporalKind::Instant);
//! let instant = TemporalValue::Instant(DateTime::from_timestamp(-1, 500_000_000).unwrap());
//! let mut buffer = TokenBuffer::new();
//! encode(&instant, Shape::NumericTimestamp, None, &config, &mut buffer).unwrap();
//! assert_eq!(buffer.tokens()[0].clone(), serde_temporal::Token::Decimal("-0.500000000".parse().unwrap()));
//! ```

use crate::epoch;
use crate::format::Formatter;
use crate::options::EffectiveConfig;
use crate::shape::Shape;
use crate::text;
use crate::token::TokenSink;
use crate::value::TemporalValue;
use crate::Result;

/// Writes `value` to `sink` in the given shape.
///
/// # Errors
///
/// Fails when the sink fails, or when `formatter` cannot render the value
/// ([`crate::Error::InvalidPattern`]).
pub fn encode<W>(
    value: &TemporalValue,
    shape: Shape,
    formatter: Option<&Formatter>,
    config: &EffectiveConfig,
    sink: &mut W,
) -> Result<()>
where
    W: TokenSink + ?Sized,
{
    match written_shape(value, shape) {
        Shape::Array => {
            sink.write_start_array()?;
            encode_array_contents(value, sink)?;
            sink.write_end_array()
        }
        other => encode_contents(value, other, formatter, config, sink),
    }
}

/// The shape actually written: numeric requests on kinds without a numeric
/// form become arrays.
pub(crate) fn written_shape(value: &TemporalValue, shape: Shape) -> Shape {
    match shape {
        Shape::NumericTimestamp if !value.kind().has_numeric_timestamp() => Shape::Array,
        other => other,
    }
}

/// Writes the value without array delimiters.
///
/// Type-id writers own the array delimiters for array shapes, so the
/// polymorphic path calls this instead of [`encode`].
pub(crate) fn encode_contents<W>(
    value: &TemporalValue,
    shape: Shape,
    formatter: Option<&Formatter>,
    config: &EffectiveConfig,
    sink: &mut W,
) -> Result<()>
where
    W: TokenSink + ?Sized,
{
    match written_shape(value, shape) {
        Shape::Scalar => encode_scalar(value, formatter, sink),
        Shape::NumericTimestamp => encode_timestamp(value, config.use_nanoseconds, sink),
        Shape::Array => encode_array_contents(value, sink),
    }
}

fn encode_scalar<W>(value: &TemporalValue, formatter: Option<&Formatter>, sink: &mut W) -> Result<()>
where
    W: TokenSink + ?Sized,
{
    let text = match formatter {
        Some(formatter) => formatter.format(value)?,
        None => text::canonical(value),
    };
    sink.write_string(&text)
}

fn encode_timestamp<W>(value: &TemporalValue, use_nanoseconds: bool, sink: &mut W) -> Result<()>
where
    W: TokenSink + ?Sized,
{
    let (parts, millis) = match value {
        TemporalValue::Instant(i) => (epoch::instant_parts(i), epoch::instant_millis(i)),
        TemporalValue::Duration(d) => (epoch::duration_parts(d), epoch::duration_millis(d)),
        _ => return encode_array_contents(value, sink),
    };
    if use_nanoseconds {
        sink.write_decimal(&epoch::to_decimal_seconds(parts.0, parts.1))
    } else {
        sink.write_integer(millis)
    }
}

fn encode_array_contents<W>(value: &TemporalValue, sink: &mut W) -> Result<()>
where
    W: TokenSink + ?Sized,
{
    for field in value.fields() {
        sink.write_integer(field)?;
    }
    Ok(())
}
