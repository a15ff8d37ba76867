//! Non-fatal reporting channel
//!
//! Duplicate names, dangling references and undocumented objects must never stop a build:
//! large multi-author document sets rely on the build going through. These conditions are
//! collected as [`Diagnostic`]s in a [`Diagnostics`] sink that the caller owns and passes to
//! every operation that can report. Each pushed diagnostic is also forwarded to `tracing` at
//! the matching level so a host that only installs a subscriber still sees them.

use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "info"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Error => write!(f, "error"),
        }
    }
}

/// Where in the document set something was declared or referenced
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub docname: String,
    pub line: Option<usize>,
}

impl SourceLocation {
    pub fn new(docname: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            docname: docname.into(),
            line,
        }
    }

    pub fn doc(docname: impl Into<String>) -> Self {
        Self::new(docname, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.docname, line),
            None => write!(f, "{}", self.docname),
        }
    }
}

/// Stable codes for the conditions this crate reports
pub mod codes {
    pub const DUPLICATE_OBJECT: &str = "duplicate-object";
    pub const DUPLICATE_DECLARATION: &str = "duplicate-declaration";
    pub const UNRESOLVED_REFERENCE: &str = "unresolved-reference";
    pub const UNDOCUMENTED_OBJECT: &str = "undocumented-object";
}

/// Structured diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: &'static str,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, code: &'static str, message: String) -> Self {
        Self {
            severity,
            code,
            message,
            location: None,
        }
    }

    pub fn warning(code: &'static str, message: String) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, message)
    }

    pub fn info(code: &'static str, message: String) -> Self {
        Self::new(DiagnosticSeverity::Info, code, message)
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{}: {} [{}]: {}",
                location, self.severity, self.code, self.message
            ),
            None => write!(f, "{} [{}]: {}", self.severity, self.code, self.message),
        }
    }
}

/// Sink collecting the diagnostics of one build pass (or one worker's share of it)
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to `tracing`
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let location = diagnostic
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match diagnostic.severity {
            DiagnosticSeverity::Info => {
                tracing::info!(code = diagnostic.code, %location, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Warning => {
                tracing::warn!(code = diagnostic.code, %location, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Error => {
                tracing::error!(code = diagnostic.code, %location, "{}", diagnostic.message)
            }
        }
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    /// Move another sink's diagnostics into this one, without logging them twice
    pub fn absorb(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_and_code() {
        let diag = Diagnostic::warning(codes::DUPLICATE_OBJECT, "Duplicate object: foo".into())
            .at(SourceLocation::new("tactics", Some(3)));
        assert_eq!(
            diag.to_string(),
            "tactics:3: warning [duplicate-object]: Duplicate object: foo"
        );
    }

    #[test]
    fn test_filters_by_code_and_severity() {
        let mut sink = Diagnostics::new();
        sink.push(Diagnostic::warning(codes::DUPLICATE_OBJECT, "a".into()));
        sink.push(Diagnostic::info(codes::UNDOCUMENTED_OBJECT, "b".into()));
        sink.push(Diagnostic::warning(codes::UNRESOLVED_REFERENCE, "c".into()));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.warnings().count(), 2);
        assert_eq!(sink.with_code(codes::UNDOCUMENTED_OBJECT).count(), 1);
    }

    #[test]
    fn test_absorb_keeps_order() {
        let mut main = Diagnostics::new();
        main.push(Diagnostic::info(codes::UNDOCUMENTED_OBJECT, "first".into()));
        let mut worker = Diagnostics::new();
        worker.push(Diagnostic::info(codes::UNDOCUMENTED_OBJECT, "second".into()));
        main.absorb(worker);

        let messages: Vec<_> = main.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
