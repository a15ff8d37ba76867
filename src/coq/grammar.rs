//! Grammar productions
//!
//!     Productions are keyed by a `(kind, name)` pair rather than by a bare name: `term ::= …`
//!     defines the token `term`, while `term += …` documents an extension of an existing
//!     production and defines nothing. Only the defining form yields a key.
//!
//!     The keys do not go into a subdomain table. They are written into the [`TokenTable`],
//!     the generic token namespace that the host's `:token:` references already resolve
//!     against, so a production declared here is found exactly like one from the host's own
//!     production lists. That write is the only cross-namespace write in the domain and goes
//!     through [`TokenTable::alias_production`] and [`TokenTable::note_production_role`]
//!     alone.

use super::diagnostics::{codes, Diagnostic, Diagnostics, SourceLocation};
use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Kind marker of the keys productions contribute
pub const TOKEN_KIND: &str = "token";

/// The relation between a production's left- and right-hand sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionOp {
    /// `::=`, defines the token
    IsDefinedAs,
    /// `+=`, extends a token defined elsewhere
    IsExtendedBy,
}

impl ProductionOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionOp::IsDefinedAs => "::=",
            ProductionOp::IsExtendedBy => "+=",
        }
    }
}

/// A split `lhs op rhs` signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionSignature<'a> {
    pub lhs: &'a str,
    pub op: ProductionOp,
    pub rhs: &'a str,
}

impl ProductionSignature<'_> {
    /// The `(kind, name)` key this production registers, if any
    pub fn key(&self) -> Option<(&'static str, &str)> {
        match self.op {
            ProductionOp::IsDefinedAs => Some((TOKEN_KIND, self.lhs)),
            ProductionOp::IsExtendedBy => None,
        }
    }
}

/// Split a production signature into exactly three whitespace-separated parts
///
/// The right-hand side keeps its inner whitespace.
pub fn parse_production(signature: &str) -> Result<ProductionSignature<'_>, DomainError> {
    let malformed = || DomainError::MalformedGrammarSignature {
        signature: signature.to_string(),
    };

    let rest = signature.trim_start();
    let (lhs, rest) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let rest = rest.trim_start();
    let (op, rhs) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let rhs = rhs.trim();
    if rhs.is_empty() {
        return Err(malformed());
    }

    let op = match op {
        "::=" => ProductionOp::IsDefinedAs,
        "+=" => ProductionOp::IsExtendedBy,
        _ => return Err(malformed()),
    };
    Ok(ProductionSignature { lhs, op, rhs })
}

/// Where a token points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    pub docname: String,
    pub target: String,
}

/// The host's generic token namespace: kind → name → (docname, target)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTable {
    entries: BTreeMap<String, BTreeMap<String, TokenEntry>>,
}

impl TokenTable {
    pub fn get(&self, kind: &str, name: &str) -> Option<&TokenEntry> {
        self.entries.get(kind).and_then(|names| names.get(name))
    }

    /// What a `:token:` reference to `name` resolves to
    pub fn resolve_token(&self, name: &str) -> Option<&TokenEntry> {
        self.get(TOKEN_KIND, name)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mirror a declared production into the token namespace, warning on duplicates
    pub(crate) fn alias_production(
        &mut self,
        key: (&str, &str),
        entry: TokenEntry,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) {
        let (kind, name) = key;
        let names = self.entries.entry(kind.to_string()).or_default();
        if let Some(other) = names.get(name) {
            diagnostics.push(
                Diagnostic::warning(
                    codes::DUPLICATE_OBJECT,
                    format!(
                        "Duplicate object: ('{}', '{}'); other is at {}",
                        kind, name, other.docname
                    ),
                )
                .at(location),
            );
        }
        names.insert(name.to_string(), entry);
    }

    /// Record a token introduced informally in running text; later mentions simply win
    pub(crate) fn note_production_role(&mut self, name: &str, entry: TokenEntry) {
        self.entries
            .entry(TOKEN_KIND.to_string())
            .or_default()
            .insert(name.to_string(), entry);
    }

    pub(crate) fn clear_doc(&mut self, docname: &str) -> usize {
        let mut removed = 0;
        for names in self.entries.values_mut() {
            let before = names.len();
            names.retain(|_, entry| entry.docname != docname);
            removed += before - names.len();
        }
        removed
    }

    pub(crate) fn merge(
        &mut self,
        other: &TokenTable,
        docnames: &HashSet<String>,
        diagnostics: &mut Diagnostics,
    ) {
        for (kind, theirs) in &other.entries {
            let ours = self.entries.entry(kind.clone()).or_default();
            for (name, entry) in theirs {
                if !docnames.contains(&entry.docname) {
                    continue;
                }
                if let Some(existing) = ours.get(name) {
                    diagnostics.push(
                        Diagnostic::warning(
                            codes::DUPLICATE_DECLARATION,
                            format!(
                                "Duplicate declaration: '{}' also defined in '{}'.",
                                name, existing.docname
                            ),
                        )
                        .at(SourceLocation::doc(entry.docname.clone())),
                    );
                }
                ours.insert(name.clone(), entry.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defining_production() {
        let sig = parse_production("term ::= let: @pattern := @term in @term").unwrap();
        assert_eq!(sig.lhs, "term");
        assert_eq!(sig.op, ProductionOp::IsDefinedAs);
        assert_eq!(sig.rhs, "let: @pattern := @term in @term");
        assert_eq!(sig.key(), Some(("token", "term")));
    }

    #[test]
    fn test_extending_production_has_no_key() {
        let sig = parse_production("term += @ident").unwrap();
        assert_eq!(sig.op, ProductionOp::IsExtendedBy);
        assert_eq!(sig.key(), None);
    }

    #[test]
    fn test_extra_whitespace_is_tolerated() {
        let sig = parse_production("  occ_switch   ::=   { {? {| + | - } } {* @num } } ").unwrap();
        assert_eq!(sig.lhs, "occ_switch");
        assert_eq!(sig.rhs, "{ {? {| + | - } } {* @num } }");
    }

    #[rstest]
    #[case("term")]
    #[case("term ::=")]
    #[case("term := @ident")]
    #[case("term = @ident")]
    #[case("")]
    fn test_malformed_signatures(#[case] signature: &str) {
        assert!(matches!(
            parse_production(signature),
            Err(DomainError::MalformedGrammarSignature { .. })
        ));
    }

    #[test]
    fn test_alias_duplicates_warn() {
        let mut table = TokenTable::default();
        let mut diags = Diagnostics::new();
        let entry = |doc: &str| TokenEntry {
            docname: doc.to_string(),
            target: "grammar-token-term".to_string(),
        };
        table.alias_production(("token", "term"), entry("a"), SourceLocation::doc("a"), &mut diags);
        table.alias_production(("token", "term"), entry("b"), SourceLocation::doc("b"), &mut diags);

        assert_eq!(diags.len(), 1);
        assert_eq!(table.resolve_token("term").unwrap().docname, "b");
    }

    #[test]
    fn test_production_role_overwrites_silently() {
        let mut table = TokenTable::default();
        let entry = TokenEntry {
            docname: "a".to_string(),
            target: "grammar-token-string".to_string(),
        };
        table.note_production_role("string", entry.clone());
        table.note_production_role("string", entry);
        assert_eq!(table.len(), 1);
        assert_eq!(table.clear_doc("a"), 1);
        assert!(table.is_empty());
    }
}
