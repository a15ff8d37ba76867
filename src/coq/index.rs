//! Subdomain indices
//!
//! Just as in the printed manual, there is a separate index per family of subdomains
//! (commands, tactics, settings, ...). An index is never stored: it is computed from the
//! registry whenever the host asks for it.

use super::declaration::strip_trailing_period;
use super::descriptor::DescriptorTable;
use super::registry::ObjectRegistry;
use super::subdomain::Subdomain;
use std::collections::{BTreeMap, HashSet};

/// Page document name of an index
pub fn index_docname(name: &str) -> String {
    format!("coq-{}", name)
}

/// A named index over one or more subdomains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdomainIndex {
    /// Reference name, as used by the `index` role (`cmdindex`, ...)
    pub name: &'static str,
    /// Title of the index page
    pub localname: &'static str,
    pub shortname: &'static str,
    pub subdomains: &'static [Subdomain],
}

pub const COMMAND_INDEX: SubdomainIndex = SubdomainIndex {
    name: "cmdindex",
    localname: "Command Index",
    shortname: "commands",
    subdomains: &[Subdomain::Cmd],
};

pub const TACTIC_INDEX: SubdomainIndex = SubdomainIndex {
    name: "tacindex",
    localname: "Tactic Index",
    shortname: "tactics",
    subdomains: &[Subdomain::Tacn],
};

pub const OPTION_INDEX: SubdomainIndex = SubdomainIndex {
    name: "optindex",
    localname: "Flags, options and Tables Index",
    shortname: "options",
    subdomains: &[Subdomain::Flag, Subdomain::Opt, Subdomain::Table],
};

pub const GALLINA_INDEX: SubdomainIndex = SubdomainIndex {
    name: "thmindex",
    localname: "Gallina Index",
    shortname: "theorems",
    subdomains: &[Subdomain::Thm],
};

pub const EXCEPTION_INDEX: SubdomainIndex = SubdomainIndex {
    name: "exnindex",
    localname: "Errors and Warnings Index",
    shortname: "errors",
    subdomains: &[Subdomain::Exn, Subdomain::Warn],
};

pub const DEFAULT_INDICES: [SubdomainIndex; 5] = [
    COMMAND_INDEX,
    TACTIC_INDEX,
    OPTION_INDEX,
    GALLINA_INDEX,
    EXCEPTION_INDEX,
];

/// One line of an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    /// Name without a trailing period, followed by the object type's index suffix
    pub display: String,
    pub object_type: String,
    pub docname: String,
    pub anchor: String,
}

/// All rows sharing a (case-folded) first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBucket {
    pub letter: String,
    pub rows: Vec<IndexRow>,
}

/// A generated index; buckets are never collapsed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexContent {
    pub buckets: Vec<IndexBucket>,
}

impl IndexContent {
    pub fn rows(&self) -> impl Iterator<Item = &IndexRow> {
        self.buckets.iter().flat_map(|bucket| bucket.rows.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl SubdomainIndex {
    /// Gather, filter, sort and bucket the names of this index's subdomains
    ///
    /// With a non-empty `docnames`, only objects declared in those documents are listed;
    /// an empty set restricts nothing.
    pub fn generate(
        &self,
        registry: &ObjectRegistry,
        descriptors: &DescriptorTable,
        docnames: Option<&HashSet<String>>,
    ) -> IndexContent {
        let docnames = docnames.filter(|docs| !docs.is_empty());
        let mut items: Vec<_> = self
            .subdomains
            .iter()
            .flat_map(|subdomain| registry.entries(*subdomain))
            .filter(|(_, object)| docnames.map_or(true, |docs| docs.contains(&object.docname)))
            .collect();
        items.sort_by_cached_key(|(name, _)| name.to_lowercase());

        let mut buckets: BTreeMap<String, Vec<IndexRow>> = BTreeMap::new();
        for (name, object) in items {
            let mut display = strip_trailing_period(name).to_string();
            if let Some(suffix) = descriptors.index_suffix(&object.object_type) {
                display.push(' ');
                display.push_str(suffix);
            }
            buckets.entry(bucket_letter(name)).or_default().push(IndexRow {
                name: name.to_string(),
                display,
                object_type: object.object_type.clone(),
                docname: object.docname.clone(),
                anchor: object.target.clone(),
            });
        }

        IndexContent {
            buckets: buckets
                .into_iter()
                .map(|(letter, rows)| IndexBucket { letter, rows })
                .collect(),
        }
    }
}

fn bucket_letter(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Find an index by its reference name
pub fn find_index_by_name<'a>(indices: &'a [SubdomainIndex], name: &str) -> Option<&'a SubdomainIndex> {
    indices.iter().find(|index| index.name == name)
}
