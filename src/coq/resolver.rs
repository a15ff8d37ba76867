//! Cross-reference resolution
//!
//! A reference names a role and a target. Object roles look the target up in their
//! subdomain table; the `index` role looks it up in the fixed table of subdomain indices and
//! points at the index page. A reference that does not resolve is reported and left for the
//! host to render as plain text.

use super::diagnostics::{codes, Diagnostic, Diagnostics, SourceLocation};
use super::domain::CoqDomain;
use super::index::index_docname;
use super::registry::DomainData;
use super::subdomain::XrefRole;

/// Where a resolved reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub docname: String,
    /// Target id inside the document; empty for index pages
    pub anchor: String,
    pub title: String,
}

/// Search/inventory record for one linkable thing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub name: String,
    pub display_name: String,
    pub object_type: String,
    pub docname: String,
    pub anchor: String,
    pub priority: i32,
}

impl CoqDomain {
    /// Resolve a reference written in `location` with `role` to `target`
    pub fn resolve_xref(
        &self,
        data: &DomainData,
        location: &SourceLocation,
        role: XrefRole,
        target: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<ResolvedLink> {
        let resolved = match role {
            XrefRole::Index => self.find_index_by_name(target).map(|index| ResolvedLink {
                docname: index_docname(index.name),
                anchor: String::new(),
                title: index.localname.to_string(),
            }),
            XrefRole::Object(subdomain) => {
                data.objects
                    .get(subdomain, target)
                    .map(|object| ResolvedLink {
                        docname: object.docname.clone(),
                        anchor: object.target.clone(),
                        title: target.to_string(),
                    })
            }
        };

        if resolved.is_none() && self.settings().warn_dangling {
            diagnostics.push(
                Diagnostic::warning(
                    codes::UNRESOLVED_REFERENCE,
                    format!("coq:{} reference target not found: {}", role, target),
                )
                .at(location.clone()),
            );
        }
        resolved
    }

    /// Title and target of an `index` role, before resolution
    ///
    /// Index targets are case-insensitive. Without an explicit title the link shows the
    /// index's local name.
    pub fn process_index_link(&self, title: Option<&str>, target: &str) -> (String, String) {
        let target = target.to_lowercase();
        let title = match title {
            Some(title) => title.to_string(),
            None => self
                .find_index_by_name(&target)
                .map_or_else(|| target.clone(), |index| index.localname.to_string()),
        };
        (title, target)
    }

    /// Everything linkable, for search indices and object inventories
    pub fn get_all_objects(&self, data: &DomainData) -> Vec<ObjectEntry> {
        let objects = data.objects.iter().map(|record| ObjectEntry {
            name: record.name.to_string(),
            display_name: record.name.to_string(),
            object_type: record.object.object_type.clone(),
            docname: record.object.docname.clone(),
            anchor: record.object.target.clone(),
            priority: self.descriptors().search_priority(&record.object.object_type),
        });
        let indices = self.indices().iter().map(|index| ObjectEntry {
            name: index.name.to_string(),
            display_name: index.localname.to_string(),
            object_type: "index".to_string(),
            docname: index_docname(index.name),
            anchor: String::new(),
            priority: -1,
        });
        objects.chain(indices).collect()
    }
}
