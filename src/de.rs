//! Temporal value decoding.
//!
//! [`decode`] reads one value from a [`TokenSource`], dispatching on the kind of
//! the token under the cursor. The configured output shape plays no part:
//! every shape the encoder can write is always accepted.
//!
//! ## Accepted input
//!
//! - **String**: trimmed, then parsed with an explicit pattern (and only that),
//!   or with the canonical parser followed by the lenient fallback
//! - **Single-field object**: reduced to its scalar text, then as a string
//! - **Array**: the kind's integer fields, `[]` for null, or a wrapped scalar
//!   when single-value unwrapping is enabled
//! - **Embedded value**: returned as-is when it has the right kind
//! - **Number**: epoch seconds or millis, for instants and durations
//!
//! ## Examples
//!
//! ```rust
//! use chrono::Month;
//! use serde_temporal::{decode, tokens, EffectiveConfig, TemporalKind, TemporalValue, TokenCursor};
//!
//! let config = EffectiveConfig::defaults(TemporalKind::Month);
//! let mut cursor = TokenCursor::new(tokens![[8]]);
//! let value = decode(&mut cursor, &config, None).unwrap();
//! assert_eq!(value, Some(TemporalValue::Month(Month::August)));
//! ```

use crate::epoch;
use crate::format::Formatter;
use crate::options::EffectiveConfig;
use crate::text::{self, ParseResult};
use crate::token::{Token, TokenKind, TokenSource};
use crate::value::{TemporalKind, TemporalValue};
use crate::{Error, Result};
use std::fmt;
use tracing::debug;

/// One step in the text parsing chain, reported in malformed-input errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseStrategy {
    /// The caller-supplied pattern
    Pattern,
    /// The canonical text form (plus fixed-width numbers for enumerations)
    Canonical,
    /// Case-normalized names and alternate layouts
    Fallback,
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseStrategy::Pattern => "explicit pattern",
            ParseStrategy::Canonical => "canonical",
            ParseStrategy::Fallback => "lenient fallback",
        })
    }
}

/// Decodes one value starting at the source's current token.
///
/// Returns `Ok(None)` for null-equivalent input (an empty array, or empty text
/// when `accept_empty_string_as_null` is on). On return the cursor rests on
/// the last token of the value.
///
/// # Errors
///
/// - [`Error::MalformedInput`] when text or field values are invalid
/// - [`Error::UnexpectedToken`] for a token the kind cannot start with
/// - [`Error::ArrayArity`] for missing or extra array elements
/// - [`Error::KindMismatch`] for an embedded value of another kind
pub fn decode<S>(
    source: &mut S,
    config: &EffectiveConfig,
    formatter: Option<&Formatter>,
) -> Result<Option<TemporalValue>>
where
    S: TokenSource + ?Sized,
{
    let kind = config.kind;
    match source.current_kind() {
        Some(TokenKind::String) => {
            let raw = source.text()?.to_string();
            decode_text(&raw, config, formatter)
        }
        Some(TokenKind::StartObject) => {
            let raw = source.extract_scalar_from_object()?;
            decode_text(&raw, config, formatter)
        }
        Some(TokenKind::StartArray) => decode_array(source, config, formatter),
        Some(TokenKind::Embedded) => match source.current() {
            Some(Token::Embedded(value)) if value.kind() == kind => Ok(Some(*value)),
            Some(Token::Embedded(value)) => Err(Error::KindMismatch {
                expected: kind,
                found: value.kind(),
            }),
            other => Err(Error::unexpected_token(
                kind,
                other.map(Token::kind),
                accepted_tokens(kind),
            )),
        },
        Some(TokenKind::Integer) if kind.has_numeric_timestamp() => {
            let n = source.int_value()?;
            decode_integer(kind, n, config.use_nanoseconds)
        }
        Some(TokenKind::Decimal) if kind.has_numeric_timestamp() => match source.current() {
            Some(Token::Decimal(d)) => {
                let value = match kind {
                    TemporalKind::Instant => {
                        epoch::instant_from_decimal(d).map(TemporalValue::Instant)
                    }
                    _ => epoch::duration_from_decimal(d).map(TemporalValue::Duration),
                };
                value
                    .map(Some)
                    .ok_or_else(|| Error::malformed(kind, &d.to_string(), "timestamp out of range", vec![]))
            }
            other => Err(Error::unexpected_token(
                kind,
                other.map(Token::kind),
                accepted_tokens(kind),
            )),
        },
        other => Err(Error::unexpected_token(kind, other, accepted_tokens(kind))),
    }
}

fn accepted_tokens(kind: TemporalKind) -> &'static [TokenKind] {
    if kind.has_numeric_timestamp() {
        &[
            TokenKind::String,
            TokenKind::StartArray,
            TokenKind::Integer,
            TokenKind::Decimal,
        ]
    } else {
        &[TokenKind::String, TokenKind::StartArray]
    }
}

fn decode_text(
    raw: &str,
    config: &EffectiveConfig,
    formatter: Option<&Formatter>,
) -> Result<Option<TemporalValue>> {
    let kind = config.kind;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if config.accept_empty_string_as_null {
            Ok(None)
        } else {
            Err(Error::malformed(kind, raw, "empty text", vec![]))
        };
    }

    // An explicit pattern is the only parser consulted.
    if let Some(formatter) = formatter.filter(|f| f.is_explicit()) {
        return formatter
            .try_parse(kind, trimmed)
            .map(Some)
            .map_err(|reason| Error::malformed(kind, raw, reason, vec![ParseStrategy::Pattern]));
    }

    let canonical = |t: &str| text::parse_canonical(kind, t);
    let lenient = |t: &str| text::parse_lenient(kind, t, config.use_nanoseconds);
    let mut chain: Vec<(ParseStrategy, &dyn Fn(&str) -> ParseResult)> =
        vec![(ParseStrategy::Canonical, &canonical as &dyn Fn(&str) -> ParseResult)];
    if config.lenient {
        chain.push((ParseStrategy::Fallback, &lenient as &dyn Fn(&str) -> ParseResult));
    }

    let mut attempted = Vec::with_capacity(chain.len());
    let mut last_reason = String::new();
    for (strategy, parse) in chain {
        attempted.push(strategy);
        match parse(trimmed) {
            Ok(value) => return Ok(Some(value)),
            Err(reason) => {
                debug!(%kind, input = raw, strategy = %strategy, %reason, "parse strategy failed");
                last_reason = reason;
            }
        }
    }
    Err(Error::malformed(kind, raw, last_reason, attempted))
}

fn decode_array<S>(
    source: &mut S,
    config: &EffectiveConfig,
    formatter: Option<&Formatter>,
) -> Result<Option<TemporalValue>>
where
    S: TokenSource + ?Sized,
{
    let kind = config.kind;
    let unwrap = config.unwrap_single_value_arrays || source.allows_single_value_unwrap();

    match source.next_token()? {
        Some(TokenKind::EndArray) => return Ok(None),
        Some(TokenKind::String) | Some(TokenKind::Embedded) if unwrap => {
            let value = decode(source, config, formatter)?;
            return match source.next_token()? {
                Some(TokenKind::EndArray) => Ok(value),
                _ => Err(Error::array_arity(
                    kind,
                    1,
                    "expected end-array after the unwrapped value",
                )),
            };
        }
        _ => {}
    }

    let count = kind.field_count();
    let mut fields = Vec::with_capacity(count);
    for index in 0..count {
        if index > 0 {
            source.next_token()?;
        }
        match source.current_kind() {
            Some(TokenKind::Integer) => fields.push(source.int_value()?),
            Some(TokenKind::EndArray) | None => {
                return Err(Error::array_arity(
                    kind,
                    count,
                    &format!("found {}", index),
                ))
            }
            other => return Err(Error::unexpected_token(kind, other, &[TokenKind::Integer])),
        }
    }

    match source.next_token()? {
        Some(TokenKind::EndArray) => {}
        Some(_) => {
            return Err(Error::array_arity(
                kind,
                count,
                "found extra elements before end-array",
            ))
        }
        None => return Err(Error::array_arity(kind, count, "missing end-array")),
    }

    kind.from_fields(&fields).map(Some).ok_or_else(|| {
        let rendered = fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Error::malformed(
            kind,
            &format!("[{}]", rendered),
            "field values out of range",
            vec![],
        )
    })
}

fn decode_integer(kind: TemporalKind, n: i64, seconds: bool) -> Result<Option<TemporalValue>> {
    let value = match (kind, seconds) {
        (TemporalKind::Instant, true) => epoch::instant_from_parts(n, 0).map(TemporalValue::Instant),
        (TemporalKind::Instant, false) => epoch::instant_from_millis(n).map(TemporalValue::Instant),
        (TemporalKind::Duration, true) => {
            epoch::duration_from_parts(n, 0).map(TemporalValue::Duration)
        }
        (TemporalKind::Duration, false) => {
            epoch::duration_from_millis(n).map(TemporalValue::Duration)
        }
        _ => None,
    };
    value
        .map(Some)
        .ok_or_else(|| Error::malformed(kind, &n.to_string(), "timestamp out of range", vec![]))
}
