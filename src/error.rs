//! Error types for temporal encoding and decoding.
//!
//! Every failure is terminal for the single value being processed. The decoder's
//! ordered strategy list is a designed fallback chain, not error recovery, so
//! once an [`Error`] is produced it is handed back to the caller untouched.
//!
//! ## Error Categories
//!
//! - **Malformed input**: text matched none of the attempted parsers
//! - **Unexpected token**: the stream held a structural token the kind cannot start with
//! - **Array arity**: wrong number of numeric fields, or a missing terminator
//! - **Unsupported shape**: a type-id writer disagreed with the resolved shape
//! - **Syntax / I/O**: failures raised by the bundled JSON reader or by a sink
//!
//! ## Examples
//!
//! ```rust
//! use serde_temporal::{from_str, Error, TemporalKind};
//!
//! let err = from_str("\"Smarch\"", TemporalKind::Month).unwrap_err();
//! assert!(matches!(err, Error::MalformedInput { .. }));
//! assert!(err.to_string().contains("Smarch"));
//! ```

use crate::de::ParseStrategy;
use crate::token::TokenKind;
use crate::value::TemporalKind;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the temporal codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The underlying sink or source failed
    #[error("IO error: {0}")]
    Io(String),

    /// The JSON text reader hit invalid syntax
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Text did not match any accepted parser
    #[error("Cannot parse {kind} from {input:?}: {reason} (tried: {})", list_strategies(.attempted))]
    MalformedInput {
        kind: TemporalKind,
        input: String,
        reason: String,
        attempted: Vec<ParseStrategy>,
    },

    /// Wrong structural token for the calling context
    #[error("Unexpected token for {kind}: found {found}, expected {expected}")]
    UnexpectedToken {
        kind: TemporalKind,
        found: String,
        expected: String,
    },

    /// Wrong field count or missing array terminator
    #[error("Array arity mismatch for {kind}: expected {expected} element(s), {msg}")]
    ArrayArity {
        kind: TemporalKind,
        expected: usize,
        msg: String,
    },

    /// Type-id wrapper and value shape disagree
    #[error("Unsupported shape combination: {0}")]
    UnsupportedShape(String),

    /// A value was handed to a codec built for another kind
    #[error("Kind mismatch: codec handles {expected}, value is {found}")]
    KindMismatch {
        expected: TemporalKind,
        found: TemporalKind,
    },

    /// A format pattern is invalid or cannot render the value
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

fn list_strategies(attempted: &[ParseStrategy]) -> String {
    if attempted.is_empty() {
        return "none".to_string();
    }
    attempted
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Creates a malformed-input error citing the raw (untrimmed) text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_temporal::{Error, ParseStrategy, TemporalKind};
    ///
    /// let err = Error::malformed(TemporalKind::Month, " 13 ", "no such month", vec![ParseStrategy::Canonical]);
    /// assert!(err.to_string().contains("\" 13 \""));
    /// assert!(err.to_string().contains("canonical"));
    /// ```
    pub fn malformed(
        kind: TemporalKind,
        input: &str,
        reason: impl fmt::Display,
        attempted: Vec<ParseStrategy>,
    ) -> Self {
        Error::MalformedInput {
            kind,
            input: input.to_string(),
            reason: reason.to_string(),
            attempted,
        }
    }

    /// Creates an unexpected-token error naming the accepted token kinds.
    ///
    /// `found` is `None` when the stream ended.
    pub fn unexpected_token(
        kind: TemporalKind,
        found: Option<TokenKind>,
        expected: &[TokenKind],
    ) -> Self {
        let expected = expected
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        Error::UnexpectedToken {
            kind,
            found: found.map_or_else(|| "end of input".to_string(), |t| t.to_string()),
            expected,
        }
    }

    /// Creates an array arity error.
    pub fn array_arity(kind: TemporalKind, expected: usize, msg: &str) -> Self {
        Error::ArrayArity {
            kind,
            expected,
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_temporal::Error;
    ///
    /// let err = Error::syntax(3, 7, "unterminated string");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    pub fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported_shape(msg: &str) -> Self {
        Error::UnsupportedShape(msg.to_string())
    }

    /// Creates an I/O error for sink or source failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the offending raw input for malformed-input errors.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Error::MalformedInput { input, .. } => Some(input),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let text = err.to_string();
        // serde_json appends the position; it is kept in the fields instead.
        let msg = text.split(" at line ").next().unwrap_or(&text);
        match err.classify() {
            Category::Syntax | Category::Eof => Error::syntax(err.line(), err.column(), msg),
            Category::Io => Error::io(msg),
            Category::Data => Error::custom(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
