//! Errors that abort the processing of a single declaration
//!
//! Registry-level problems (duplicates, dangling references) are never errors: they are
//! reported through [`Diagnostics`](super::diagnostics::Diagnostics) and the build goes on.
//! Everything here is fatal to the offending declaration only. Since declarations are
//! prepared completely before anything is registered, returning one of these leaves the
//! registry exactly as it was.

use super::diagnostics::SourceLocation;
use std::fmt;

const PARSE_ERROR: &str = "Parse error in notation!";

const SIG_ERROR: &str = "Invalid syntax in ``.. prodn::`` directive\n\
                         Expected ``name ::= ...`` or ``name += ...`` \
                         (e.g. ``pattern += constr:(@ident)``)";

/// Error that can occur while processing a declaration or role
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// No descriptor is registered under this construct-type name
    UnknownObjectType(String),
    /// The explicit name list does not have one name per signature
    NameCountMismatch {
        expected: usize,
        got: usize,
        location: SourceLocation,
    },
    /// The notation adapter rejected a signature or inline notation
    NotationParse { notation: String, message: String },
    /// A grammar production is not of the form `lhs ::= rhs` or `lhs += rhs`
    MalformedGrammarSignature { signature: String },
    /// A body-less declaration under the strict completeness policy
    MissingDocumentation {
        directive: String,
        location: SourceLocation,
    },
    /// An inference block without exactly one rule line
    MalformedInference { title: String },
    /// Inconsistent descriptor and index tables
    InvalidSetup(String),
    /// A registry snapshot could not be read or written
    Snapshot(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::UnknownObjectType(name) => write!(f, "Unknown object type '{}'", name),
            DomainError::NameCountMismatch {
                expected,
                got,
                location,
            } => write!(
                f,
                "{}: Expected {} semicolon-separated names, got {}.  \
                 Please provide one name per signature line.",
                location, expected, got
            ),
            DomainError::NotationParse { notation, message } => write!(
                f,
                "{}\nOffending notation: {}\nError message: {}",
                PARSE_ERROR, notation, message
            ),
            DomainError::MalformedGrammarSignature { signature } => {
                write!(f, "{}\nOffending signature: {}", SIG_ERROR, signature)
            }
            DomainError::MissingDocumentation {
                directive,
                location,
            } => write!(f, "{}: No contents in directive {}", location, directive),
            DomainError::MalformedInference { title } => write!(
                f,
                "Expected two parts in ‘inference’ directive '{}', separated by a rule (----).",
                title
            ),
            DomainError::InvalidSetup(msg) => write!(f, "Invalid domain setup: {}", msg),
            DomainError::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Snapshot(err.to_string())
    }
}
