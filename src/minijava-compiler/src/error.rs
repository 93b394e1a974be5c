//! 前端错误类型
//!
//! Both error kinds are fatal: the first one aborts the run and no partial
//! token sequence or tree is handed back.

use std::fmt;

use thiserror::Error;

use crate::lexer::{Category, Token};

/// The result of a front end operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error raised while turning source text into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

/// A character at the scan position matched none of the token categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character {character:?} at {line}:{column}")]
pub struct LexicalError {
    pub character: char,
    pub line: isize,
    pub column: isize,
}

/// The first grammar violation found by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// `consume` saw a token of the wrong category or spelling.
    #[error("expected {expected}, got {found} at {line}:{column}")]
    Mismatch {
        expected: Expected,
        found: String,
        line: isize,
        column: isize,
    },

    /// `consume` ran past the last token.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: Expected },

    /// Input ran out where a dispatching procedure needed a token.
    #[error("unexpected end of input while parsing {context}")]
    EndOfInputIn { context: &'static str },

    /// A dispatching procedure found no alternative for the lookahead.
    #[error("unexpected token {found} in {context} at {line}:{column}")]
    UnexpectedToken {
        context: &'static str,
        found: String,
        line: isize,
        column: isize,
    },

    #[error("class declarations after the main class are not supported (found at {line}:{column})")]
    UnsupportedClassDeclaration { line: isize, column: isize },

    #[error("expected end of input, got {found} at {line}:{column}")]
    TrailingInput {
        found: String,
        line: isize,
        column: isize,
    },
}

/// What `consume` was asked for: a category and optionally its exact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expected {
    pub category: Category,
    pub text: Option<String>,
}

impl SyntaxError {
    pub(crate) fn mismatch(expected: Expected, token: &Token) -> Self {
        SyntaxError::Mismatch {
            expected,
            found: describe(token),
            line: token.line,
            column: token.column,
        }
    }

    pub(crate) fn unexpected(context: &'static str, token: &Token) -> Self {
        if token.category == Category::Eof {
            return SyntaxError::EndOfInputIn { context };
        }
        SyntaxError::UnexpectedToken {
            context,
            found: describe(token),
            line: token.line,
            column: token.column,
        }
    }

    pub(crate) fn trailing(token: &Token) -> Self {
        SyntaxError::TrailingInput {
            found: describe(token),
            line: token.line,
            column: token.column,
        }
    }

    /// Line and column of the offending token, if there was one.
    pub fn position(&self) -> Option<(isize, isize)> {
        match self {
            SyntaxError::Mismatch { line, column, .. }
            | SyntaxError::UnexpectedToken { line, column, .. }
            | SyntaxError::UnsupportedClassDeclaration { line, column }
            | SyntaxError::TrailingInput { line, column, .. } => Some((*line, *column)),
            SyntaxError::UnexpectedEndOfInput { .. } | SyntaxError::EndOfInputIn { .. } => None,
        }
    }
}

/// `CATEGORY(text)`, the way tokens are named in diagnostics.
fn describe(token: &Token) -> String {
    format!("{}({})", token.category, token.text)
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} '{}'", self.category, text),
            None => write!(f, "{}", self.category),
        }
    }
}
