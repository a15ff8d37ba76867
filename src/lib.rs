//! # coq-domain
//!
//! A documentation domain for a proof language: commands, tactics, options, theorems,
//! grammar productions, errors and warnings become typed, linkable objects.
//!
//! Architecture
//!
//!     Authors declare objects; each declaration is processed against a static descriptor
//!     of its construct kind, which says what subdomain its names live in and how its
//!     signature is rendered and named. Names are recorded in a build-scoped registry
//!     (`DomainData`) with a stable target identifier. Once every document is read, the
//!     registry answers cross-references and feeds the subdomain indices.
//!
//!     Documents may be read in parallel: each worker fills its own `DomainData`, and the
//!     coordinating process merges them, restricted to the documents each worker read.
//!
//!     This is a pure lib. It does not parse markup, execute proof scripts or write any
//!     output format; the host document engine does all of that and calls in here.
//!
//! Reporting
//!
//!     Duplicates and dangling references are diagnostics, never errors. Errors
//!     (`DomainError`) abort only the declaration that caused them.

#![allow(rustdoc::invalid_html_tags)]

pub mod coq;

pub use coq::declaration::{DescribedObject, DocumentContext, ObjectDeclaration};
pub use coq::descriptor::{DescriptorTable, NameRule, ObjectDescriptor, SignatureRule};
pub use coq::diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation};
pub use coq::domain::CoqDomain;
pub use coq::error::DomainError;
pub use coq::index::{IndexContent, SubdomainIndex};
pub use coq::notation::{GrammarNotation, NotationAdapter, NotationError, NotationNode};
pub use coq::registry::{DomainData, ObjectRegistry, RegisteredObject};
pub use coq::resolver::{ObjectEntry, ResolvedLink};
pub use coq::settings::{DomainSettings, ReportUndocumented};
pub use coq::subdomain::{Subdomain, XrefRole};
pub use coq::target::{make_target, DocutilsIds, IdSanitizer};
