//! Layered configuration for the temporal codec.
//!
//! This module provides the types that describe formatting policy:
//!
//! - [`FormatOptions`]: one layer of recognized options, every field optional
//! - [`ConfigLayers`]: the global, per-type and per-field layers a host keeps
//! - [`EffectiveConfig`]: the resolved, immutable snapshot used by one codec
//!
//! Layers apply in ascending priority: global < per-type < per-field < per-call.
//! An unset field inherits from the layer below; defaults fill whatever is
//! still unset when the snapshot is built.
//!
//! ## Examples
//!
//! ```rust
//! use serde_temporal::{ConfigLayers, FormatOptions, Shape, TemporalKind};
//!
//! let layers = ConfigLayers::new()
//!     .with_global(FormatOptions::new().with_timestamps(false))
//!     .with_type(TemporalKind::Month, FormatOptions::new().with_shape(Shape::Array));
//!
//! let config = layers.resolve(TemporalKind::Month, &FormatOptions::new());
//! assert_eq!(config.shape_request, Some(Shape::Array));
//!
//! // Per-call options win over everything else
//! let config = layers.resolve(TemporalKind::Month, &FormatOptions::new().with_shape(Shape::Scalar));
//! assert_eq!(config.shape_request, Some(Shape::Scalar));
//! ```
//!
//! Layers deserialize from any serde format:
//!
//! ```rust
//! use serde_temporal::{ConfigLayers, TemporalKind};
//!
//! let layers: ConfigLayers = serde_json::from_str(r#"{
//!     "global": { "use_timestamp": false },
//!     "field": { "pattern": "%d/%m/%Y", "timezone": "+02:00" }
//! }"#).unwrap();
//! let config = layers.resolve(TemporalKind::Date, &Default::default());
//! assert_eq!(config.pattern.as_deref(), Some("%d/%m/%Y"));
//! assert!(config.timezone.is_some());
//! ```

use crate::shape::Shape;
use crate::value::TemporalKind;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_USE_TIMESTAMP: bool = true;
pub const DEFAULT_USE_NANOSECONDS: bool = true;
pub const DEFAULT_LENIENT: bool = true;
pub const DEFAULT_UNWRAP_SINGLE_VALUE_ARRAYS: bool = false;
pub const DEFAULT_ACCEPT_EMPTY_STRING_AS_NULL: bool = true;

/// One layer of recognized formatting options.
///
/// Every field is optional; `None` means "inherit from the layer below".
///
/// # Examples
///
/// ```rust
/// use serde_temporal::{FormatOptions, Shape};
///
/// let options = FormatOptions::new()
///     .with_shape(Shape::Array)
///     .with_leniency(false);
/// assert_eq!(options.shape, Some(Shape::Array));
/// assert_eq!(options.lenient, Some(false));
/// assert_eq!(options.pattern, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub shape: Option<Shape>,
    pub use_timestamp: Option<bool>,
    pub use_nanoseconds: Option<bool>,
    pub pattern: Option<String>,
    #[serde(with = "offset_text")]
    pub timezone: Option<FixedOffset>,
    pub lenient: Option<bool>,
    pub unwrap_single_value_arrays: Option<bool>,
    pub accept_empty_string_as_null: Option<bool>,
}

impl FormatOptions {
    /// Creates an empty layer that overrides nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an explicit on-wire shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Turns timestamp output (numbers or field arrays) on or off.
    #[must_use]
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.use_timestamp = Some(enabled);
        self
    }

    /// Chooses decimal seconds with nanoseconds (`true`) or integer millis.
    #[must_use]
    pub fn with_nanoseconds(mut self, enabled: bool) -> Self {
        self.use_nanoseconds = Some(enabled);
        self
    }

    /// Sets a strftime-style pattern, e.g. `"%d/%m/%Y"`.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Associates a zone with formatted output.
    ///
    /// Only honored on the per-field and per-call layers.
    #[must_use]
    pub fn with_timezone(mut self, zone: FixedOffset) -> Self {
        self.timezone = Some(zone);
        self
    }

    #[must_use]
    pub fn with_leniency(mut self, lenient: bool) -> Self {
        self.lenient = Some(lenient);
        self
    }

    #[must_use]
    pub fn with_single_value_unwrap(mut self, enabled: bool) -> Self {
        self.unwrap_single_value_arrays = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_empty_as_null(mut self, enabled: bool) -> Self {
        self.accept_empty_string_as_null = Some(enabled);
        self
    }

    /// Returns this layer applied on top of `lower`.
    #[must_use]
    pub fn merged_over(&self, lower: &FormatOptions) -> FormatOptions {
        FormatOptions {
            shape: self.shape.or(lower.shape),
            use_timestamp: self.use_timestamp.or(lower.use_timestamp),
            use_nanoseconds: self.use_nanoseconds.or(lower.use_nanoseconds),
            pattern: self.pattern.clone().or_else(|| lower.pattern.clone()),
            timezone: self.timezone.or(lower.timezone),
            lenient: self.lenient.or(lower.lenient),
            unwrap_single_value_arrays: self
                .unwrap_single_value_arrays
                .or(lower.unwrap_single_value_arrays),
            accept_empty_string_as_null: self
                .accept_empty_string_as_null
                .or(lower.accept_empty_string_as_null),
        }
    }
}

/// The configuration layers a host keeps for the lifetime of a mapper.
///
/// The per-call layer is supplied at resolution time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayers {
    pub global: FormatOptions,
    pub types: HashMap<TemporalKind, FormatOptions>,
    pub field: FormatOptions,
}

impl ConfigLayers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_global(mut self, options: FormatOptions) -> Self {
        self.global = options;
        self
    }

    #[must_use]
    pub fn with_type(mut self, kind: TemporalKind, options: FormatOptions) -> Self {
        self.types.insert(kind, options);
        self
    }

    #[must_use]
    pub fn with_field(mut self, options: FormatOptions) -> Self {
        self.field = options;
        self
    }

    /// Resolves the effective configuration for one kind and one call.
    #[must_use]
    pub fn resolve(&self, kind: TemporalKind, call: &FormatOptions) -> EffectiveConfig {
        let empty = FormatOptions::default();
        let per_type = self.types.get(&kind).unwrap_or(&empty);

        // Layers above global count as explicit requests.
        let explicit = call.merged_over(&self.field.merged_over(per_type));
        let all = explicit.merged_over(&self.global);
        let zone_layers = call.merged_over(&self.field);

        // Field enumerations opt out of the global shape defaults.
        let (shape_request, timestamp_default) = if kind.is_field_enumeration() {
            (explicit.shape, false)
        } else {
            (
                all.shape,
                self.global.use_timestamp.unwrap_or(DEFAULT_USE_TIMESTAMP),
            )
        };

        EffectiveConfig {
            kind,
            shape_request,
            use_timestamp: explicit.use_timestamp,
            timestamp_default,
            use_nanoseconds: all.use_nanoseconds.unwrap_or(DEFAULT_USE_NANOSECONDS),
            pattern: all.pattern.map(Arc::from),
            timezone: zone_layers.timezone,
            lenient: all.lenient.unwrap_or(DEFAULT_LENIENT),
            unwrap_single_value_arrays: all
                .unwrap_single_value_arrays
                .unwrap_or(DEFAULT_UNWRAP_SINGLE_VALUE_ARRAYS),
            accept_empty_string_as_null: all
                .accept_empty_string_as_null
                .unwrap_or(DEFAULT_ACCEPT_EMPTY_STRING_AS_NULL),
        }
    }
}

/// A resolved configuration snapshot for one kind.
///
/// Immutable once built; the `with_*` methods return a new snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    pub kind: TemporalKind,
    /// Explicit shape request, if any layer that applies to this kind made one.
    pub shape_request: Option<Shape>,
    /// Timestamp flag from the per-type, per-field or per-call layers.
    pub use_timestamp: Option<bool>,
    /// What an unset `use_timestamp` falls back to for this kind.
    pub timestamp_default: bool,
    pub use_nanoseconds: bool,
    pub pattern: Option<Arc<str>>,
    /// Zone explicitly requested on the per-field or per-call layer.
    pub timezone: Option<FixedOffset>,
    pub lenient: bool,
    pub unwrap_single_value_arrays: bool,
    pub accept_empty_string_as_null: bool,
}

impl EffectiveConfig {
    /// Resolves a configuration from defaults only.
    #[must_use]
    pub fn defaults(kind: TemporalKind) -> Self {
        ConfigLayers::default().resolve(kind, &FormatOptions::default())
    }

    /// Applies `options` on top of this snapshot, as a per-call layer would.
    #[must_use]
    pub fn with_overrides(&self, options: &FormatOptions) -> Self {
        EffectiveConfig {
            kind: self.kind,
            shape_request: options.shape.or(self.shape_request),
            use_timestamp: options.use_timestamp.or(self.use_timestamp),
            timestamp_default: self.timestamp_default,
            use_nanoseconds: options.use_nanoseconds.unwrap_or(self.use_nanoseconds),
            pattern: options
                .pattern
                .as_deref()
                .map(Arc::from)
                .or_else(|| self.pattern.clone()),
            timezone: options.timezone.or(self.timezone),
            lenient: options.lenient.unwrap_or(self.lenient),
            unwrap_single_value_arrays: options
                .unwrap_single_value_arrays
                .unwrap_or(self.unwrap_single_value_arrays),
            accept_empty_string_as_null: options
                .accept_empty_string_as_null
                .unwrap_or(self.accept_empty_string_as_null),
        }
    }

    #[must_use]
    pub fn with_leniency(&self, lenient: bool) -> Self {
        EffectiveConfig {
            lenient,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_empty_as_null(&self, enabled: bool) -> Self {
        EffectiveConfig {
            accept_empty_string_as_null: enabled,
            ..self.clone()
        }
    }
}

/// Serde adapter writing zones as `"+02:00"` and reading `"Z"`/`"UTC"` too.
mod offset_text {
    use chrono::FixedOffset;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(zone: &Option<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match zone {
            Some(offset) => serializer.serialize_some(&offset.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|t| {
            parse_offset(&t).ok_or_else(|| de::Error::custom(format!("invalid zone offset {:?}", t)))
        })
        .transpose()
    }

    pub(super) fn parse_offset(text: &str) -> Option<FixedOffset> {
        if text == "Z" || text.eq_ignore_ascii_case("UTC") {
            return FixedOffset::east_opt(0);
        }
        let sign = match text.as_bytes().first()? {
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        let (hours, minutes) = text[1..].split_once(':').unwrap_or((&text[1..], "0"));
        let hours = two_digit_field(hours).filter(|h| *h < 24)?;
        let minutes = two_digit_field(minutes).filter(|m| *m < 60)?;
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }

    fn two_digit_field(text: &str) -> Option<i32> {
        if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok()
    }
}
