//! Token stream abstractions.
//!
//! The codec never owns the output or input format. It writes through a
//! [`TokenSink`] and pulls from a [`TokenSource`], both of which the host
//! serialization framework implements. [`crate::buffer`] and [`crate::json`]
//! provide in-memory and JSON text implementations.

use crate::{Decimal, Error, Result, TemporalValue};
use std::fmt;

/// One structural or scalar token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    FieldName(String),
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Bool(bool),
    Null,
    /// An already-decoded value passed through the pipeline as-is.
    Embedded(TemporalValue),
}

impl Token {
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::StartArray => TokenKind::StartArray,
            Token::EndArray => TokenKind::EndArray,
            Token::StartObject => TokenKind::StartObject,
            Token::EndObject => TokenKind::EndObject,
            Token::FieldName(_) => TokenKind::FieldName,
            Token::String(_) => TokenKind::String,
            Token::Integer(_) => TokenKind::Integer,
            Token::Decimal(_) => TokenKind::Decimal,
            Token::Bool(_) => TokenKind::Bool,
            Token::Null => TokenKind::Null,
            Token::Embedded(_) => TokenKind::Embedded,
        }
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::String(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::String(value)
    }
}

impl From<i32> for Token {
    fn from(value: i32) -> Self {
        Token::Integer(value.into())
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Token::Integer(value)
    }
}

impl From<Decimal> for Token {
    fn from(value: Decimal) -> Self {
        Token::Decimal(value)
    }
}

impl From<TemporalValue> for Token {
    fn from(value: TemporalValue) -> Self {
        Token::Embedded(value)
    }
}

/// Token kind without payload, used in error messages and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartArray,
    EndArray,
    StartObject,
    EndObject,
    FieldName,
    String,
    Integer,
    Decimal,
    Bool,
    Null,
    Embedded,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::StartArray => "start-array",
            TokenKind::EndArray => "end-array",
            TokenKind::StartObject => "start-object",
            TokenKind::EndObject => "end-object",
            TokenKind::FieldName => "field-name",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::Embedded => "embedded-value",
        };
        f.write_str(name)
    }
}

/// Push-based token output.
///
/// Call order must form a well-nested sequence; the codec only ever writes
/// one complete value per call.
pub trait TokenSink {
    fn write_string(&mut self, value: &str) -> Result<()>;

    fn write_integer(&mut self, value: i64) -> Result<()>;

    fn write_decimal(&mut self, value: &Decimal) -> Result<()>;

    fn write_start_array(&mut self) -> Result<()>;

    fn write_end_array(&mut self) -> Result<()>;

    fn write_start_object(&mut self) -> Result<()>;

    fn write_field_name(&mut self, name: &str) -> Result<()>;

    fn write_end_object(&mut self) -> Result<()>;
}

/// Pull-based token cursor.
///
/// The decoder starts with the cursor positioned on the first token of the
/// value and leaves it on the value's last token.
pub trait TokenSource {
    /// The token under the cursor, or `None` past the end of input.
    fn current(&self) -> Option<&Token>;

    /// Advances the cursor and returns the new token's kind.
    fn next_token(&mut self) -> Result<Option<TokenKind>>;

    /// Whether this context treats one-element arrays as bare scalars.
    fn allows_single_value_unwrap(&self) -> bool {
        false
    }

    #[inline]
    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(Token::kind)
    }

    /// Text of the current string or field-name token.
    fn text(&self) -> Result<&str> {
        match self.current() {
            Some(Token::String(s)) | Some(Token::FieldName(s)) => Ok(s),
            other => Err(Error::custom(format!(
                "expected string token, found {}",
                describe(other)
            ))),
        }
    }

    /// Value of the current integer token.
    fn int_value(&self) -> Result<i64> {
        match self.current() {
            Some(Token::Integer(i)) => Ok(*i),
            other => Err(Error::custom(format!(
                "expected integer token, found {}",
                describe(other)
            ))),
        }
    }

    /// Reduces a single-field object to its scalar text.
    ///
    /// Used by formats (XML-like) that wrap scalars in an element. The cursor
    /// must be on a start-object token and ends on the matching end-object.
    fn extract_scalar_from_object(&mut self) -> Result<String> {
        if self.current_kind() != Some(TokenKind::StartObject) {
            return Err(Error::custom(format!(
                "expected start-object token, found {}",
                describe(self.current())
            )));
        }
        let mut scalar = None;
        loop {
            match self.next_token()? {
                Some(TokenKind::EndObject) => break,
                Some(TokenKind::FieldName) if scalar.is_none() => {
                    match self.next_token()? {
                        Some(TokenKind::String) => scalar = Some(self.text()?.to_string()),
                        Some(TokenKind::Integer) => scalar = Some(self.int_value()?.to_string()),
                        other => {
                            return Err(Error::custom(format!(
                                "object field must hold a scalar, found {}",
                                other.map_or_else(|| "end of input".to_string(), |k| k.to_string())
                            )))
                        }
                    }
                }
                other => {
                    return Err(Error::custom(format!(
                        "expected a single-field object, found {}",
                        other.map_or_else(|| "end of input".to_string(), |k| k.to_string())
                    )))
                }
            }
        }
        Ok(scalar.unwrap_or_default())
    }
}

fn describe(token: Option<&Token>) -> String {
    token.map_or_else(|| "end of input".to_string(), |t| t.kind().to_string())
}
