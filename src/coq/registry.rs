//! Object registry
//!
//!     Per-subdomain tables mapping a declared name to the document it was declared in, its
//!     object type and its link target. One [`DomainData`] holds the registry of a build (or
//!     of one worker's share of it) together with the grammar-token alias table; it is
//!     created at build start, filled while documents are processed, merged across workers
//!     and discarded (or serialized by the host) at build end.
//!
//!     Duplicate policy: a name declared twice in one subdomain is reported and the last
//!     declaration wins. This is never fatal; large document sets rely on builds going
//!     through.

use super::diagnostics::{codes, Diagnostic, Diagnostics, SourceLocation};
use super::error::DomainError;
use super::grammar::TokenTable;
use super::subdomain::Subdomain;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Version of the serialized registry; bump when the layout of [`DomainData`] changes
pub const ENV_VERSION: u32 = 2;

/// Where a registered name points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredObject {
    pub docname: String,
    pub object_type: String,
    pub target: String,
}

impl RegisteredObject {
    pub fn new(
        docname: impl Into<String>,
        object_type: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            docname: docname.into(),
            object_type: object_type.into(),
            target: target.into(),
        }
    }
}

/// One row of [`ObjectRegistry::iter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord<'a> {
    pub subdomain: Subdomain,
    pub name: &'a str,
    pub object: &'a RegisteredObject,
}

/// subdomain → name → (docname, object type, target)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRegistry {
    objects: BTreeMap<Subdomain, BTreeMap<String, RegisteredObject>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` in `subdomain`, reporting a duplicate at the object's document
    pub fn insert(
        &mut self,
        subdomain: Subdomain,
        name: impl Into<String>,
        object: RegisteredObject,
        diagnostics: &mut Diagnostics,
    ) -> Option<RegisteredObject> {
        let location = SourceLocation::doc(object.docname.clone());
        self.record(subdomain, name, object, location, diagnostics)
    }

    /// Like [`insert`](Self::insert), with an explicit location for the duplicate warning
    pub fn record(
        &mut self,
        subdomain: Subdomain,
        name: impl Into<String>,
        object: RegisteredObject,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Option<RegisteredObject> {
        let name = name.into();
        let table = self.objects.entry(subdomain).or_default();
        if let Some(other) = table.get(&name) {
            diagnostics.push(
                Diagnostic::warning(
                    codes::DUPLICATE_OBJECT,
                    format!("Duplicate object: {}; other is at {}", name, other.docname),
                )
                .at(location),
            );
        }
        tracing::trace!(%subdomain, %name, target = %object.target, "recording object");
        table.insert(name, object)
    }

    pub fn get(&self, subdomain: Subdomain, name: &str) -> Option<&RegisteredObject> {
        self.objects.get(&subdomain).and_then(|table| table.get(name))
    }

    /// Names and objects of one subdomain, ordered by name
    pub fn entries(&self, subdomain: Subdomain) -> impl Iterator<Item = (&str, &RegisteredObject)> {
        self.objects
            .get(&subdomain)
            .into_iter()
            .flat_map(|table| table.iter().map(|(name, object)| (name.as_str(), object)))
    }

    /// Every registered object, in subdomain then name order
    pub fn iter(&self) -> impl Iterator<Item = ObjectRecord<'_>> {
        self.objects.iter().flat_map(|(subdomain, table)| {
            table.iter().map(move |(name, object)| ObjectRecord {
                subdomain: *subdomain,
                name,
                object,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.objects.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every object declared in `docname`; returns how many were removed
    pub fn clear_doc(&mut self, docname: &str) -> usize {
        let mut removed = 0;
        for table in self.objects.values_mut() {
            let before = table.len();
            table.retain(|_, object| object.docname != docname);
            removed += before - table.len();
        }
        removed
    }

    /// Replay the objects of another registry that were declared in `docnames`
    ///
    /// Objects from other documents are skipped: they may have been re-processed by a
    /// different worker, and merging them here would count them twice.
    pub fn merge(
        &mut self,
        other: &ObjectRegistry,
        docnames: &HashSet<String>,
        diagnostics: &mut Diagnostics,
    ) {
        for (subdomain, theirs) in &other.objects {
            let ours = self.objects.entry(*subdomain).or_default();
            for (name, object) in theirs {
                if !docnames.contains(&object.docname) {
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
                        .at(SourceLocation::doc(object.docname.clone())),
                    );
                }
                ours.insert(name.clone(), object.clone());
            }
        }
    }
}

/// Build-scoped state of the domain: the object registry and the grammar-token aliases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainData {
    pub objects: ObjectRegistry,
    pub(crate) tokens: TokenTable,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    env_version: u32,
    data: &'a DomainData,
}

#[derive(Deserialize)]
struct Snapshot {
    env_version: u32,
    data: DomainData,
}

impl DomainData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grammar tokens declared through productions, as seen by the host's token references
    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    /// Forget everything declared in `docname`, before it is processed again
    pub fn clear_doc(&mut self, docname: &str) {
        let objects = self.objects.clear_doc(docname);
        let tokens = self.tokens.clear_doc(docname);
        tracing::debug!(docname, objects, tokens, "cleared document");
    }

    /// Fold a worker's data into this one, restricted to the documents that worker read
    pub fn merge(
        &mut self,
        other: &DomainData,
        docnames: &HashSet<String>,
        diagnostics: &mut Diagnostics,
    ) {
        self.objects.merge(&other.objects, docnames, diagnostics);
        self.tokens.merge(&other.tokens, docnames, diagnostics);
        tracing::debug!(documents = docnames.len(), "merged domain data");
    }

    pub fn to_snapshot(&self) -> Result<String, DomainError> {
        let snapshot = SnapshotRef {
            env_version: ENV_VERSION,
            data: self,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Load a snapshot written by [`to_snapshot`](Self::to_snapshot)
    ///
    /// Snapshots from another environment version are rejected; the host must then
    /// re-read the affected documents.
    pub fn from_snapshot(json: &str) -> Result<Self, DomainError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.env_version != ENV_VERSION {
            return Err(DomainError::Snapshot(format!(
                "environment version {} does not match {}",
                snapshot.env_version, ENV_VERSION
            )));
        }
        Ok(snapshot.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(docname: &str, target: &str) -> RegisteredObject {
        RegisteredObject::new(docname, "tacn", target)
    }

    fn docs(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_warns_and_last_wins() {
        let mut registry = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        registry.insert(Subdomain::Tacn, "simpl", object("a", "coq:tacn.simpl"), &mut diags);
        assert!(diags.is_empty());

        let previous = registry.insert(Subdomain::Tacn, "simpl", object("b", "coq:tacn.simpl"), &mut diags);
        assert_eq!(previous.unwrap().docname, "a");
        assert_eq!(diags.len(), 1);
        let warning = diags.iter().next().unwrap();
        assert_eq!(warning.code, codes::DUPLICATE_OBJECT);
        assert_eq!(warning.message, "Duplicate object: simpl; other is at a");
        assert_eq!(registry.get(Subdomain::Tacn, "simpl").unwrap().docname, "b");
    }

    #[test]
    fn test_same_name_in_other_subdomain_is_fine() {
        let mut registry = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        registry.insert(Subdomain::Tacn, "simpl", object("a", "coq:tacn.simpl"), &mut diags);
        registry.insert(Subdomain::Thm, "simpl", object("a", "coq:thm.simpl"), &mut diags);
        assert!(diags.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clear_doc_removes_only_that_document() {
        let mut registry = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        registry.insert(Subdomain::Tacn, "simpl", object("a", "t1"), &mut diags);
        registry.insert(Subdomain::Cmd, "Print", object("a", "t2"), &mut diags);
        registry.insert(Subdomain::Tacn, "auto", object("b", "t3"), &mut diags);

        assert_eq!(registry.clear_doc("a"), 2);
        assert!(registry.get(Subdomain::Tacn, "simpl").is_none());
        assert!(registry.get(Subdomain::Cmd, "Print").is_none());
        assert!(registry.get(Subdomain::Tacn, "auto").is_some());
    }

    #[test]
    fn test_merge_respects_document_restriction() {
        let mut main = ObjectRegistry::new();
        let mut batch = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        batch.insert(Subdomain::Tacn, "simpl", object("a", "t1"), &mut diags);
        batch.insert(Subdomain::Tacn, "auto", object("stale", "t2"), &mut diags);

        main.merge(&batch, &docs(&["a"]), &mut diags);
        assert!(main.get(Subdomain::Tacn, "simpl").is_some());
        assert!(main.get(Subdomain::Tacn, "auto").is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_merge_reports_cross_batch_duplicates() {
        let mut main = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        main.insert(Subdomain::Cmd, "Print", object("a", "t1"), &mut diags);
        let mut batch = ObjectRegistry::new();
        batch.insert(Subdomain::Cmd, "Print", object("b", "t2"), &mut diags);

        main.merge(&batch, &docs(&["b"]), &mut diags);
        let warning = diags.with_code(codes::DUPLICATE_DECLARATION).next().unwrap();
        assert_eq!(warning.message, "Duplicate declaration: 'Print' also defined in 'a'.");
        assert_eq!(main.get(Subdomain::Cmd, "Print").unwrap().docname, "b");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut batch = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        batch.insert(Subdomain::Opt, "Hyps Limit", object("a", "t1"), &mut diags);

        let mut once = ObjectRegistry::new();
        once.merge(&batch, &docs(&["a"]), &mut diags);
        let mut twice = once.clone();
        twice.merge(&batch, &docs(&["a"]), &mut diags);

        assert_eq!(once, twice);
        assert_eq!(diags.with_code(codes::DUPLICATE_DECLARATION).count(), 1);
    }

    #[test]
    fn test_iter_visits_everything() {
        let mut registry = ObjectRegistry::new();
        let mut diags = Diagnostics::new();
        registry.insert(Subdomain::Warn, "w", object("a", "t1"), &mut diags);
        registry.insert(Subdomain::Cmd, "c", object("a", "t2"), &mut diags);

        let seen: Vec<_> = registry.iter().map(|r| (r.subdomain, r.name)).collect();
        assert_eq!(seen, vec![(Subdomain::Cmd, "c"), (Subdomain::Warn, "w")]);
    }

    #[test]
    fn test_snapshot_version_is_checked() {
        let mut data = DomainData::new();
        let mut diags = Diagnostics::new();
        data.objects.insert(Subdomain::Thm, "Bound", object("a", "t1"), &mut diags);

        let json = data.to_snapshot().unwrap();
        assert_eq!(DomainData::from_snapshot(&json).unwrap(), data);

        let stale = json.replacen("\"env_version\":2", "\"env_version\":1", 1);
        assert!(matches!(
            DomainData::from_snapshot(&stale),
            Err(DomainError::Snapshot(_))
        ));
    }
}
