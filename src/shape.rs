//! On-wire shape selection.

use crate::options::EffectiveConfig;
use crate::value::TemporalKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a value appears in the token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A single string token.
    Scalar,
    /// A single number (instant and duration only).
    NumericTimestamp,
    /// An array of integer fields.
    Array,
}

impl Shape {
    /// The shape "timestamp output" maps to for `kind`.
    #[must_use]
    pub const fn timestamp_for(kind: TemporalKind) -> Shape {
        if kind.has_numeric_timestamp() {
            Shape::NumericTimestamp
        } else {
            Shape::Array
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Scalar => "scalar",
            Shape::NumericTimestamp => "numeric-timestamp",
            Shape::Array => "array",
        })
    }
}

/// Picks the output shape for a resolved configuration.
///
/// An explicit shape request wins, then an explicit `use_timestamp` flag. A
/// configured pattern without either selects [`Shape::Scalar`]; otherwise the
/// kind's default applies. Month and day-of-week default to [`Shape::Scalar`]
/// even when the global timestamp default is on.
///
/// ```rust
/// use serde_temporal::{resolve_shape, EffectiveConfig, Shape, TemporalKind};
///
/// assert_eq!(resolve_shape(&EffectiveConfig::defaults(TemporalKind::Month)), Shape::Scalar);
/// assert_eq!(resolve_shape(&EffectiveConfig::defaults(TemporalKind::Date)), Shape::Array);
/// assert_eq!(
///     resolve_shape(&EffectiveConfig::defaults(TemporalKind::Instant)),
///     Shape::NumericTimestamp
/// );
/// ```
#[must_use]
pub fn resolve_shape(config: &EffectiveConfig) -> Shape {
    let kind = config.kind;
    if let Some(requested) = config.shape_request {
        return match requested {
            Shape::NumericTimestamp => Shape::timestamp_for(kind),
            other => other,
        };
    }
    let timestamps = match config.use_timestamp {
        Some(explicit) => explicit,
        None if config.pattern.is_some() => false,
        None => config.timestamp_default,
    };
    if timestamps {
        Shape::timestamp_for(kind)
    } else {
        Shape::Scalar
    }
}
