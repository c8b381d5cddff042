//! In-memory token sink and source.
//!
//! [`TokenBuffer`] records whatever the encoder writes; [`TokenCursor`] replays a
//! token vector to the decoder. Both are handy for hosts that build their own
//! document trees and for tests.
//!
//! ```rust
//! use serde_temporal::{tokens, Token, TokenBuffer, TokenSink};
//!
//! let mut buffer = TokenBuffer::new();
//! buffer.write_start_array().unwrap();
//! buffer.write_integer(8).unwrap();
//! buffer.write_end_array().unwrap();
//! assert_eq!(buffer.into_tokens(), tokens![[8]]);
//! ```

use crate::token::{Token, TokenKind, TokenSink, TokenSource};
use crate::{Decimal, Result};

/// A [`TokenSink`] that collects tokens into a vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl TokenSink for TokenBuffer {
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.tokens.push(Token::String(value.to_string()));
        Ok(())
    }

    fn write_integer(&mut self, value: i64) -> Result<()> {
        self.tokens.push(Token::Integer(value));
        Ok(())
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        self.tokens.push(Token::Decimal(value.clone()));
        Ok(())
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.tokens.push(Token::StartArray);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.tokens.push(Token::EndArray);
        Ok(())
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.tokens.push(Token::StartObject);
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        self.tokens.push(Token::FieldName(name.to_string()));
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.tokens.push(Token::EndObject);
        Ok(())
    }
}

/// A [`TokenSource`] over a token vector.
///
/// The cursor starts on the first token.
#[derive(Clone, Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
    unwrap_single_values: bool,
}

impl TokenCursor {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor {
            tokens,
            position: 0,
            unwrap_single_values: false,
        }
    }

    /// Marks this context as permitting single-value array unwrapping.
    #[must_use]
    pub fn with_single_value_unwrap(mut self, enabled: bool) -> Self {
        self.unwrap_single_values = enabled;
        self
    }

    /// Number of tokens after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position + 1)
    }
}

impl TokenSource for TokenCursor {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next_token(&mut self) -> Result<Option<TokenKind>> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        Ok(self.current_kind())
    }

    fn allows_single_value_unwrap(&self) -> bool {
        self.unwrap_single_values
    }
}
