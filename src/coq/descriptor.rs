//! Object descriptors
//!
//! Each documented construct kind (command, tactic, option, ...) is a static configuration
//! record rather than a type of its own: which subdomain its names live in, how it appears
//! in indices and headers, how a name is derived from its signature and how the signature
//! is rendered. Descriptors are registered once at startup in a [`DescriptorTable`] keyed by
//! construct-type name and are read-only afterwards.

use super::subdomain::Subdomain;
use std::collections::HashMap;

/// How a name to link to is derived from a signature when none is given explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// No automatic name; an explicit `name` option is required to get a target
    None,
    /// The signature text itself
    Verbatim,
    /// The leading run of letters and spaces (`Set Printing All.` → `Set Printing All`)
    LeadingWords,
    /// The notation rendered as plain text with ellipses
    Notation,
}

/// How a signature is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRule {
    /// Literal text
    Plain,
    /// Parsed through the notation adapter
    Notation,
    /// `lhs ::= rhs` / `lhs += rhs`, named by its left-hand side in the token namespace
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// Construct-type name, also the object-type tag in targets (`cmd`, `tacv`, ...)
    pub name: &'static str,
    pub subdomain: Subdomain,
    /// Appended to index entries, e.g. `(cmd)`
    pub index_suffix: Option<&'static str>,
    /// Prefixed to rendered headers, e.g. `Command`; not part of identity
    pub annotation: Option<&'static str>,
    pub name_rule: NameRule,
    pub signature_rule: SignatureRule,
    /// Subject to the undocumented-object policy
    pub documentable: bool,
    pub search_priority: i32,
}

impl ObjectDescriptor {
    /// A documentable notation object with no automatic name
    pub const fn notation(
        name: &'static str,
        subdomain: Subdomain,
        index_suffix: &'static str,
        annotation: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            subdomain,
            index_suffix: Some(index_suffix),
            annotation,
            name_rule: NameRule::None,
            signature_rule: SignatureRule::Notation,
            documentable: true,
            search_priority: 1,
        }
    }

    pub const fn with_name_rule(mut self, rule: NameRule) -> Self {
        self.name_rule = rule;
        self
    }

    pub const fn with_signature_rule(mut self, rule: SignatureRule) -> Self {
        self.signature_rule = rule;
        self
    }
}

const BUILTINS: [ObjectDescriptor; 11] = [
    ObjectDescriptor::notation("cmd", Subdomain::Cmd, "(cmd)", Some("Command"))
        .with_name_rule(NameRule::LeadingWords),
    ObjectDescriptor::notation("cmdv", Subdomain::Cmd, "(cmdv)", Some("Variant")),
    ObjectDescriptor::notation("tacn", Subdomain::Tacn, "(tacn)", None),
    ObjectDescriptor::notation("tacv", Subdomain::Tacn, "(tacnv)", Some("Variant")),
    ObjectDescriptor::notation("opt", Subdomain::Opt, "(opt)", Some("Option"))
        .with_name_rule(NameRule::Notation),
    ObjectDescriptor::notation("flag", Subdomain::Flag, "(flag)", Some("Flag"))
        .with_name_rule(NameRule::Notation),
    ObjectDescriptor::notation("table", Subdomain::Table, "(table)", Some("Table"))
        .with_name_rule(NameRule::Notation),
    ObjectDescriptor::notation("thm", Subdomain::Thm, "(thm)", Some("Theorem"))
        .with_signature_rule(SignatureRule::Plain),
    ObjectDescriptor {
        name: "prodn",
        subdomain: Subdomain::Prodn,
        index_suffix: None,
        annotation: None,
        name_rule: NameRule::None,
        signature_rule: SignatureRule::Production,
        documentable: false,
        search_priority: 1,
    },
    // `exn` rather than `err`, which writers already use as a CSS class
    ObjectDescriptor::notation("exn", Subdomain::Exn, "(err)", Some("Error"))
        .with_name_rule(NameRule::Notation),
    ObjectDescriptor::notation("warn", Subdomain::Warn, "(warn)", Some("Warning"))
        .with_name_rule(NameRule::Notation),
];

/// Lookup table of descriptors, keyed by construct-type name
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    descriptors: HashMap<&'static str, ObjectDescriptor>,
}

impl DescriptorTable {
    /// Create a new empty table
    pub fn new() -> Self {
        DescriptorTable {
            descriptors: HashMap::new(),
        }
    }

    /// Register a descriptor
    ///
    /// If a descriptor with the same name already exists, it will be replaced.
    pub fn register(&mut self, descriptor: ObjectDescriptor) {
        self.descriptors.insert(descriptor.name, descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ObjectDescriptor> {
        self.descriptors.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// List all construct-type names (sorted)
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.descriptors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Subdomains served by at least one descriptor
    pub fn subdomains(&self) -> Vec<Subdomain> {
        let mut subdomains: Vec<_> = self.descriptors.values().map(|d| d.subdomain).collect();
        subdomains.sort();
        subdomains.dedup();
        subdomains
    }

    /// Index suffix of an object type, if it has one
    pub fn index_suffix(&self, object_type: &str) -> Option<&'static str> {
        self.get(object_type).and_then(|d| d.index_suffix)
    }

    /// Search priority of an object type; unknown types get the default of 1
    pub fn search_priority(&self, object_type: &str) -> i32 {
        self.get(object_type).map_or(1, |d| d.search_priority)
    }

    /// Create a table with the built-in construct kinds
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for descriptor in BUILTINS {
            table.register(descriptor);
        }
        table
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
