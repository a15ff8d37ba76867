//! Notation adapter
//!
//!     Signatures of most objects, and the `:n:` role, are written in the notation grammar
//!     (`@ident` holes, `{+ …}` repetitions and so on). The domain needs two things from a
//!     notation: a structured inline representation to display, and a plain string with
//!     ellipses to derive object names from. Both can fail on malformed input.
//!
//!     [`NotationAdapter`] is the seam for that. [`GrammarNotation`] is the built-in
//!     implementation: a logos lexer ([tokens]) feeding a small recursive parser ([parser]),
//!     plus the ellipsis stringifier ([plain]). Hosts with their own notation engine plug
//!     it in instead.

mod parser;
mod plain;
pub mod tokens;

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use plain::ELLIPSIS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatKind {
    /// `{+ …}`
    OneOrMore,
    /// `{* …}`
    ZeroOrMore,
}

/// Structured inline representation of a notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum NotationNode {
    Atom(String),
    Whitespace,
    /// `@ident`, stored without the `@`
    Hole(String),
    Repeat {
        kind: RepeatKind,
        separator: Option<String>,
        body: Vec<NotationNode>,
    },
    Optional(Vec<NotationNode>),
    Alternative(Vec<Vec<NotationNode>>),
    /// Literal braces around a sub-notation
    Curlies(Vec<NotationNode>),
}

/// Failure reported by a notation adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationError {
    pub message: String,
    /// Byte offset into the notation text
    pub offset: usize,
}

impl NotationError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.offset)
    }
}

impl std::error::Error for NotationError {}

/// Converts notation text for display and for name derivation
pub trait NotationAdapter: Send + Sync {
    fn render(&self, notation: &str) -> Result<Vec<NotationNode>, NotationError>;

    fn to_plain_string(&self, notation: &str) -> Result<String, NotationError>;
}

/// Built-in adapter for the notation grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarNotation;

impl NotationAdapter for GrammarNotation {
    fn render(&self, notation: &str) -> Result<Vec<NotationNode>, NotationError> {
        parser::parse(notation)
    }

    fn to_plain_string(&self, notation: &str) -> Result<String, NotationError> {
        parser::parse(notation).map(|nodes| plain::stringify_with_ellipses(&nodes))
    }
}

/// Parse a notation for display, turning adapter failures into declaration errors
pub fn notation_to_nodes(
    adapter: &dyn NotationAdapter,
    notation: &str,
) -> Result<Vec<NotationNode>, DomainError> {
    adapter
        .render(notation)
        .map_err(|e| parse_error(notation, e))
}

/// Parse a notation and format it as a string with ellipses
pub fn notation_to_string(
    adapter: &dyn NotationAdapter,
    notation: &str,
) -> Result<String, DomainError> {
    adapter
        .to_plain_string(notation)
        .map_err(|e| parse_error(notation, e))
}

fn parse_error(notation: &str, err: NotationError) -> DomainError {
    DomainError::NotationParse {
        notation: notation.to_string(),
        message: err.to_string(),
    }
}
