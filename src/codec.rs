//! The typed codec a host keeps per (kind, configuration).
//!
//! A [`TemporalCodec`] bundles a resolved [`EffectiveConfig`], the shape it
//! implies and a formatter cache. It is immutable, `Send + Sync` and cheap to
//! clone; [`TemporalCodec::with_leniency`] and [`TemporalCodec::with_overrides`]
//! return derived codecs and leave the original untouched.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde_temporal::{
//!     ConfigLayers, FormatOptions, Shape, TemporalCodec, TemporalKind, TemporalValue, TokenBuffer,
//!     TokenCursor,
//! };
//!
//! let layers = ConfigLayers::new().with_field(FormatOptions::new().with_pattern("%d/%m/%Y"));
//! let codec = TemporalCodec::from_layers(&layers, TemporalKind::Date, &FormatOptions::new())
//!     .with_overrides(&FormatOptions::new().with_shape(Shape::Scalar));
//!
//! let date = TemporalValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! let mut buffer = TokenBuffer::new();
//! codec.encode(&date, &mut buffer).unwrap();
//!
//! let mut cursor = TokenCursor::new(buffer.into_tokens());
//! assert_eq!(codec.decode(&mut cursor).unwrap(), Some(date));
//! ```

use crate::de;
use crate::format::{FormatCache, Formatter};
use crate::options::{ConfigLayers, EffectiveConfig, FormatOptions};
use crate::ser;
use crate::shape::{resolve_shape, Shape};
use crate::token::{TokenSink, TokenSource};
use crate::typed::{self, TypeIdWriter};
use crate::value::{TemporalKind, TemporalValue};
use crate::{Error, Result};
use std::sync::Arc;

/// Encoder and decoder for one temporal kind under one configuration.
#[derive(Clone, Debug)]
pub struct TemporalCodec {
    config: Arc<EffectiveConfig>,
    shape: Shape,
    formats: Arc<FormatCache>,
}

impl TemporalCodec {
    /// A codec using only default settings.
    #[must_use]
    pub fn new(kind: TemporalKind) -> Self {
        Self::from_config(EffectiveConfig::defaults(kind))
    }

    /// Resolves `layers` plus per-call `options` for `kind`.
    #[must_use]
    pub fn from_layers(layers: &ConfigLayers, kind: TemporalKind, options: &FormatOptions) -> Self {
        Self::from_config(layers.resolve(kind, options))
    }

    #[must_use]
    pub fn from_config(config: EffectiveConfig) -> Self {
        TemporalCodec {
            shape: resolve_shape(&config),
            config: Arc::new(config),
            formats: Arc::new(FormatCache::new()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TemporalKind {
        self.config.kind
    }

    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// The shape values are written in.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The formatter scalar output uses, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for a malformed configured pattern.
    pub fn formatter(&self) -> Result<Option<Formatter>> {
        self.formats.get_or_resolve(&self.config)
    }

    /// A codec that differs only in leniency.
    ///
    /// Returns a clone of `self` when the setting already matches.
    #[must_use]
    pub fn with_leniency(&self, lenient: bool) -> Self {
        if self.config.lenient == lenient {
            return self.clone();
        }
        TemporalCodec {
            config: Arc::new(self.config.with_leniency(lenient)),
            shape: self.shape,
            formats: Arc::clone(&self.formats),
        }
    }

    /// A codec with `options` applied on top of the current configuration.
    #[must_use]
    pub fn with_overrides(&self, options: &FormatOptions) -> Self {
        let config = self.config.with_overrides(options);
        let same_format =
            config.pattern == self.config.pattern && config.timezone == self.config.timezone;
        TemporalCodec {
            shape: resolve_shape(&config),
            config: Arc::new(config),
            formats: if same_format {
                Arc::clone(&self.formats)
            } else {
                Arc::new(FormatCache::new())
            },
        }
    }

    fn check_kind(&self, value: &TemporalValue) -> Result<()> {
        if value.kind() == self.kind() {
            Ok(())
        } else {
            Err(Error::KindMismatch {
                expected: self.kind(),
                found: value.kind(),
            })
        }
    }

    /// Writes `value` in this codec's shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] for a value of another kind, plus any
    /// formatter or sink error.
    pub fn encode<W>(&self, value: &TemporalValue, sink: &mut W) -> Result<()>
    where
        W: TokenSink + ?Sized,
    {
        self.check_kind(value)?;
        let formatter = self.formatter()?;
        ser::encode(value, self.shape, formatter.as_ref(), &self.config, sink)
    }

    /// Writes `value` wrapped in its type id.
    ///
    /// # Errors
    ///
    /// As [`TemporalCodec::encode`], plus [`Error::UnsupportedShape`] when the
    /// type-id writer disagrees with this codec's shape.
    pub fn encode_with_type(
        &self,
        value: &TemporalValue,
        sink: &mut dyn TokenSink,
        type_ids: &dyn TypeIdWriter,
    ) -> Result<()> {
        self.check_kind(value)?;
        let formatter = self.formatter()?;
        typed::encode_with_type(
            value,
            self.shape,
            formatter.as_ref(),
            &self.config,
            sink,
            type_ids,
        )
    }

    /// Reads one value from `source`.
    ///
    /// # Errors
    ///
    /// See [`crate::decode`].
    pub fn decode<S>(&self, source: &mut S) -> Result<Option<TemporalValue>>
    where
        S: TokenSource + ?Sized,
    {
        let formatter = self.formatter()?;
        de::decode(source, &self.config, formatter.as_ref())
    }
}
