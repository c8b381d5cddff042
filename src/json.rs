//! JSON text as a token sink and source, built on `serde_json`.
//!
//! [`JsonWriter`] renders tokens as compact JSON (no whitespace) and
//! [`JsonReader`] parses a JSON document and replays it as tokens. Syntax
//! errors carry line and column. Numbers keep their exact text, so numbers with
//! a fraction or exponent are read as [`Decimal`] values, never as floats.
//!
//! ## Examples
//!
//! ```rust
//! use serde_temporal::{JsonReader, JsonWriter, Token, TokenSink, TokenSource};
//!
//! let mut writer = JsonWriter::new();
//! writer.write_start_array().unwrap();
//! writer.write_string("chrono::Month").unwrap();
//! writer.write_integer(8).unwrap();
//! writer.write_end_array().unwrap();
//! let json = writer.into_inner();
//! assert_eq!(json, r#"["chrono::Month",8]"#);
//!
//! let mut reader = JsonReader::from_str(&json).unwrap();
//! assert_eq!(reader.current(), Some(&Token::StartArray));
//! reader.next_token().unwrap();
//! assert_eq!(reader.text().unwrap(), "chrono::Month");
//! ```

use crate::buffer::TokenCursor;
use crate::token::{Token, TokenKind, TokenSink, TokenSource};
use crate::{Decimal, Error, Result};
use serde_json::{Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Array,
    Object,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    has_items: bool,
}

/// Writes tokens as compact JSON text.
#[derive(Debug, Default)]
pub struct JsonWriter {
    output: String,
    stack: Vec<Frame>,
    after_field_name: bool,
}

impl JsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the JSON written so far.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    fn begin_value(&mut self) {
        if self.after_field_name {
            self.after_field_name = false;
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            if frame.has_items {
                self.output.push(',');
            }
            frame.has_items = true;
        }
    }

    fn close(&mut self, container: Container, closer: char) -> Result<()> {
        match self.stack.pop() {
            Some(frame) if frame.container == container && !self.after_field_name => {
                self.output.push(closer);
                Ok(())
            }
            _ => Err(Error::io(&format!("unbalanced '{}'", closer))),
        }
    }

    fn write_quoted(&mut self, s: &str) -> Result<()> {
        let quoted = serde_json::to_string(s)?;
        self.output.push_str(&quoted);
        Ok(())
    }
}

impl TokenSink for JsonWriter {
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.begin_value();
        self.write_quoted(value)
    }

    fn write_integer(&mut self, value: i64) -> Result<()> {
        self.begin_value();
        self.output.push_str(&value.to_string());
        Ok(())
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        let number: Number = value.to_string().parse()?;
        self.begin_value();
        self.output.push_str(&number.to_string());
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.begin_value();
        self.output.push('[');
        self.stack.push(Frame {
            container: Container::Array,
            has_items: false,
        });
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.close(Container::Array, ']')
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.begin_value();
        self.output.push('{');
        self.stack.push(Frame {
            container: Container::Object,
            has_items: false,
        });
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.container == Container::Object && !self.after_field_name => {}
            _ => return Err(Error::io("field name outside of an object")),
        }
        self.begin_value();
        self.write_quoted(name)?;
        self.output.push(':');
        self.after_field_name = true;
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.close(Container::Object, '}')
    }
}

/// Token source over one JSON document.
///
/// The whole document is parsed up front, so syntax errors (including trailing
/// characters) surface from [`JsonReader::from_str`]. Like every
/// [`TokenSource`], the reader starts positioned on the first token.
#[derive(Clone, Debug)]
pub struct JsonReader {
    cursor: TokenCursor,
}

impl JsonReader {
    /// Parses `input` and positions the reader on its first token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed JSON and an error for numbers
    /// too large to hold exactly.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(input)?;
        let mut tokens = Vec::new();
        flatten(document, &mut tokens)?;
        Ok(JsonReader {
            cursor: TokenCursor::new(tokens),
        })
    }

    /// Marks this context as permitting single-value array unwrapping.
    #[must_use]
    pub fn with_single_value_unwrap(mut self, enabled: bool) -> Self {
        self.cursor = self.cursor.with_single_value_unwrap(enabled);
        self
    }

    /// Checks that the decoder consumed the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error naming how many tokens were left unread.
    pub fn end(&mut self) -> Result<()> {
        match self.cursor.remaining() {
            0 => Ok(()),
            n => Err(Error::custom(format!("{} trailing token(s) after the value", n))),
        }
    }
}

fn flatten(value: Value, tokens: &mut Vec<Token>) -> Result<()> {
    match value {
        Value::Null => tokens.push(Token::Null),
        Value::Bool(b) => tokens.push(Token::Bool(b)),
        Value::Number(n) => tokens.push(number_token(&n)?),
        Value::String(s) => tokens.push(Token::String(s)),
        Value::Array(items) => {
            tokens.push(Token::StartArray);
            for item in items {
                flatten(item, tokens)?;
            }
            tokens.push(Token::EndArray);
        }
        Value::Object(fields) => {
            tokens.push(Token::StartObject);
            for (name, item) in fields {
                tokens.push(Token::FieldName(name));
                flatten(item, tokens)?;
            }
            tokens.push(Token::EndObject);
        }
    }
    Ok(())
}

fn number_token(number: &Number) -> Result<Token> {
    match number.as_i64() {
        Some(n) => Ok(Token::Integer(n)),
        None => number.to_string().parse().map(Token::Decimal),
    }
}

impl TokenSource for JsonReader {
    fn current(&self) -> Option<&Token> {
        self.cursor.current()
    }

    fn next_token(&mut self) -> Result<Option<TokenKind>> {
        self.cursor.next_token()
    }

    fn allows_single_value_unwrap(&self) -> bool {
        self.cursor.allows_single_value_unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Result<Vec<Token>> {
        let mut reader = JsonReader::from_str(input)?;
        let mut tokens = Vec::new();
        while let Some(token) = reader.current().cloned() {
            tokens.push(token);
            reader.next_token()?;
        }
        Ok(tokens)
    }

    #[test]
    fn test_writer_nesting() {
        let mut writer = JsonWriter::new();
        writer.write_start_object().unwrap();
        writer.write_field_name("chrono::NaiveDate").unwrap();
        writer.write_start_array().unwrap();
        writer.write_integer(2024).unwrap();
        writer.write_integer(1).unwrap();
        writer.write_integer(15).unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_object().unwrap();
        assert_eq!(writer.into_inner(), r#"{"chrono::NaiveDate":[2024,1,15]}"#);
    }

    #[test]
    fn test_writer_escapes() {
        let mut writer = JsonWriter::new();
        writer.write_string("a\"b\\c\n\u{1}").unwrap();
        assert_eq!(writer.into_inner(), r#""a\"b\\c\n\u0001""#);
    }

    #[test]
    fn test_writer_exact_decimal() {
        let mut writer = JsonWriter::new();
        writer
            .write_decimal(&"-0.500000000".parse().unwrap())
            .unwrap();
        assert_eq!(writer.into_inner(), "-0.500000000");
    }

    #[test]
    fn test_writer_rejects_unbalanced() {
        let mut writer = JsonWriter::new();
        writer.write_start_array().unwrap();
        assert!(writer.write_end_object().is_err());
        assert!(JsonWriter::new().write_field_name("x").is_err());
    }

    #[test]
    fn test_reader_tokens() {
        let tokens = tokenize(r#" [ "a", -12, 1.5e3, {"k": null}, true ] "#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::StartArray,
                Token::String("a".to_string()),
                Token::Integer(-12),
                Token::Decimal("1.5e3".parse().unwrap()),
                Token::StartObject,
                Token::FieldName("k".to_string()),
                Token::Null,
                Token::EndObject,
                Token::Bool(true),
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn test_reader_exact_decimal() {
        let tokens = tokenize("1700000000.123456789").unwrap();
        assert_eq!(tokens[0].clone(), Token::Decimal("1700000000.123456789".parse().unwrap()));
    }

    #[test]
    fn test_reader_surrogate_pair() {
        assert_eq!(
            tokenize(r#""\ud83d\ude00""#).unwrap(),
            vec![Token::String("\u{1F600}".to_string())]
        );
    }

    #[test]
    fn test_reader_empty_containers() {
        assert_eq!(tokenize("[]").unwrap(), vec![Token::StartArray, Token::EndArray]);
        assert_eq!(tokenize("{}").unwrap(), vec![Token::StartObject, Token::EndObject]);
        assert!(tokenize("").is_err());
    }

    #[test]
    fn test_reader_syntax_errors() {
        let err = tokenize("[1,\n 2,]").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }), "{err:?}");
        assert!(tokenize("[1 2]").is_err());
        assert!(tokenize("\"open").is_err());
        assert!(tokenize("[1}").is_err());
        assert!(tokenize("{1: 2}").is_err());
        assert!(tokenize("[").is_err());
        assert!(tokenize("nul").is_err());
        assert!(tokenize("\"x\" 1").is_err());
    }

    #[test]
    fn test_reader_rejects_non_json_numbers() {
        for input in ["01", "-.5", "1.e5", "+1"] {
            assert!(matches!(tokenize(input), Err(Error::Syntax { .. })), "{input}");
        }
    }

    #[test]
    fn test_reader_rejects_extreme_exponent() {
        assert!(tokenize("1e-4000000000").is_err());
    }

    #[test]
    fn test_reader_end() {
        let mut reader = JsonReader::from_str("\"x\"  ").unwrap();
        assert!(reader.end().is_ok());

        let mut reader = JsonReader::from_str("[1]").unwrap();
        assert!(reader.end().is_err());
    }
}
