//! Polymorphic (type-tagged) output.
//!
//! When a host serializes a value through a field of a more general type, it
//! wraps the value with a type id. A [`TypeIdWriter`] owns the wrapper; the
//! codec only writes the value contents in between. Two wrappers ship:
//!
//! - [`WrapperArray`]: `["chrono::Month","NOVEMBER"]`
//! - [`WrapperObject`]: `{"chrono::Month":"NOVEMBER"}`
//!
//! ```rust
//! use chrono::Month;
//! use serde_temporal::{TemporalCodec, TemporalKind, TemporalValue, WrapperArray, JsonWriter};
//!
//! let codec = TemporalCodec::new(TemporalKind::Month);
//! let mut writer = JsonWriter::new();
//! codec
//!     .encode_with_type(&TemporalValue::Month(Month::November), &mut writer, &WrapperArray)
//!     .unwrap();
//! assert_eq!(writer.into_inner(), r#"["chrono::Month","NOVEMBER"]"#);
//! ```

use crate::format::Formatter;
use crate::options::EffectiveConfig;
use crate::ser::{encode_contents, written_shape};
use crate::shape::Shape;
use crate::token::TokenSink;
use crate::value::TemporalValue;
use crate::{Error, Result};

/// Container hint handed to a type-id writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueShape {
    Scalar,
    Array,
}

impl ValueShape {
    #[must_use]
    pub const fn of(shape: Shape) -> Self {
        match shape {
            Shape::Array => ValueShape::Array,
            Shape::Scalar | Shape::NumericTimestamp => ValueShape::Scalar,
        }
    }
}

/// State carried from a type prefix to its suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeIdContext {
    pub type_id: String,
    /// The value shape the writer prepared for.
    pub value_shape: ValueShape,
}

/// Writes the type-id wrapper around a value.
pub trait TypeIdWriter {
    /// Opens the wrapper and, for array values, the value's own array.
    fn write_type_prefix(
        &self,
        sink: &mut dyn TokenSink,
        type_id: &str,
        hint: ValueShape,
    ) -> Result<TypeIdContext>;

    /// Closes whatever the prefix opened.
    fn write_type_suffix(&self, sink: &mut dyn TokenSink, context: TypeIdContext) -> Result<()>;
}

/// `["<type id>", value]`
#[derive(Clone, Copy, Debug, Default)]
pub struct WrapperArray;

impl TypeIdWriter for WrapperArray {
    fn write_type_prefix(
        &self,
        sink: &mut dyn TokenSink,
        type_id: &str,
        hint: ValueShape,
    ) -> Result<TypeIdContext> {
        sink.write_start_array()?;
        sink.write_string(type_id)?;
        if hint == ValueShape::Array {
            sink.write_start_array()?;
        }
        Ok(TypeIdContext {
            type_id: type_id.to_string(),
            value_shape: hint,
        })
    }

    fn write_type_suffix(&self, sink: &mut dyn TokenSink, context: TypeIdContext) -> Result<()> {
        if context.value_shape == ValueShape::Array {
            sink.write_end_array()?;
        }
        sink.write_end_array()
    }
}

/// `{"<type id>": value}`
#[derive(Clone, Copy, Debug, Default)]
pub struct WrapperObject;

impl TypeIdWriter for WrapperObject {
    fn write_type_prefix(
        &self,
        sink: &mut dyn TokenSink,
        type_id: &str,
        hint: ValueShape,
    ) -> Result<TypeIdContext> {
        sink.write_start_object()?;
        sink.write_field_name(type_id)?;
        if hint == ValueShape::Array {
            sink.write_start_array()?;
        }
        Ok(TypeIdContext {
            type_id: type_id.to_string(),
            value_shape: hint,
        })
    }

    fn write_type_suffix(&self, sink: &mut dyn TokenSink, context: TypeIdContext) -> Result<()> {
        if context.value_shape == ValueShape::Array {
            sink.write_end_array()?;
        }
        sink.write_end_object()
    }
}

/// Writes `value` wrapped in its type id.
///
/// # Errors
///
/// Returns [`Error::UnsupportedShape`] if the writer prepared for a different
/// value shape than the one resolved, plus any sink or formatter error.
pub fn encode_with_type(
    value: &TemporalValue,
    shape: Shape,
    formatter: Option<&Formatter>,
    config: &EffectiveConfig,
    sink: &mut dyn TokenSink,
    type_ids: &dyn TypeIdWriter,
) -> Result<()> {
    let shape = written_shape(value, shape);
    let hint = ValueShape::of(shape);
    let type_id = value.kind().type_id();
    let context = type_ids.write_type_prefix(sink, type_id, hint)?;
    if context.value_shape != hint {
        return Err(Error::unsupported_shape(&format!(
            "{} requested {:?} output but the type-id writer prepared {:?}",
            type_id, hint, context.value_shape
        )));
    }
    encode_contents(value, shape, formatter, config, &mut *sink)?;
    type_ids.write_type_suffix(sink, context)
}
