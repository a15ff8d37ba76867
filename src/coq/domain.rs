//! The documentation domain
//!
//! [`CoqDomain`] bundles the read-only configuration shared by every document of a build:
//! the descriptor table, the subdomain indices, the policy settings and the two host
//! collaborators (notation adapter, identifier sanitizer). It holds no per-build state;
//! the registry lives in a [`DomainData`](super::registry::DomainData) that callers create
//! and pass in explicitly, one per worker.
//!
//! The operations are spread over the modules that implement them:
//! [`describe`](CoqDomain::describe) in `declaration`, [`resolve_xref`](CoqDomain::resolve_xref)
//! and [`get_all_objects`](CoqDomain::get_all_objects) in `resolver`, the inline roles in
//! `roles`.

use super::descriptor::DescriptorTable;
use super::error::DomainError;
use super::index::{find_index_by_name, IndexContent, SubdomainIndex, DEFAULT_INDICES};
use super::notation::{GrammarNotation, NotationAdapter};
use super::registry::DomainData;
use super::settings::DomainSettings;
use super::target::{DocutilsIds, IdSanitizer};
use std::collections::HashSet;
use std::fmt;

pub const DOMAIN_NAME: &str = "coq";
pub const DOMAIN_LABEL: &str = "Coq";

pub struct CoqDomain {
    descriptors: DescriptorTable,
    indices: Vec<SubdomainIndex>,
    settings: DomainSettings,
    notation: Box<dyn NotationAdapter>,
    sanitizer: Box<dyn IdSanitizer>,
}

impl CoqDomain {
    /// A domain with the built-in construct kinds and indices
    pub fn new(settings: DomainSettings) -> Self {
        Self {
            descriptors: DescriptorTable::with_defaults(),
            indices: DEFAULT_INDICES.to_vec(),
            settings,
            notation: Box::new(GrammarNotation),
            sanitizer: Box::new(DocutilsIds),
        }
    }

    /// A domain with custom tables
    ///
    /// Every subdomain an index lists must be served by some descriptor.
    pub fn with_tables(
        settings: DomainSettings,
        descriptors: DescriptorTable,
        indices: Vec<SubdomainIndex>,
    ) -> Result<Self, DomainError> {
        let served = descriptors.subdomains();
        for index in &indices {
            if let Some(missing) = index.subdomains.iter().find(|s| !served.contains(*s)) {
                return Err(DomainError::InvalidSetup(format!(
                    "index '{}' lists subdomain '{}', which no object type declares",
                    index.name, missing
                )));
            }
        }
        Ok(Self {
            descriptors,
            indices,
            ..Self::new(settings)
        })
    }

    pub fn with_notation(mut self, notation: impl NotationAdapter + 'static) -> Self {
        self.notation = Box::new(notation);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: impl IdSanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    pub fn indices(&self) -> &[SubdomainIndex] {
        &self.indices
    }

    pub fn settings(&self) -> &DomainSettings {
        &self.settings
    }

    pub fn notation(&self) -> &dyn NotationAdapter {
        self.notation.as_ref()
    }

    pub fn sanitizer(&self) -> &dyn IdSanitizer {
        self.sanitizer.as_ref()
    }

    pub fn find_index_by_name(&self, name: &str) -> Option<&SubdomainIndex> {
        find_index_by_name(&self.indices, name)
    }

    /// Generate the index called `name`
    pub fn generate_index(
        &self,
        data: &DomainData,
        name: &str,
        docnames: Option<&HashSet<String>>,
    ) -> Option<IndexContent> {
        self.find_index_by_name(name)
            .map(|index| index.generate(&data.objects, &self.descriptors, docnames))
    }
}

impl Default for CoqDomain {
    fn default() -> Self {
        Self::new(DomainSettings::default())
    }
}

impl fmt::Debug for CoqDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoqDomain")
            .field("descriptors", &self.descriptors.names())
            .field("indices", &self.indices)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coq::descriptor::ObjectDescriptor;
    use crate::coq::index::OPTION_INDEX;
    use crate::coq::subdomain::Subdomain;

    #[test]
    fn test_rejects_indices_over_unserved_subdomains() {
        let mut descriptors = DescriptorTable::new();
        descriptors.register(ObjectDescriptor::notation("opt", Subdomain::Opt, "(opt)", None));

        let err = CoqDomain::with_tables(DomainSettings::default(), descriptors, vec![OPTION_INDEX])
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidSetup(
                "index 'optindex' lists subdomain 'flag', which no object type declares".to_string()
            )
        );
    }

    #[test]
    fn test_custom_tables() {
        let mut descriptors = DescriptorTable::new();
        descriptors.register(ObjectDescriptor::notation("opt", Subdomain::Opt, "(opt)", None));
        let domain =
            CoqDomain::with_tables(DomainSettings::default(), descriptors, vec![]).unwrap();
        assert!(domain.find_index_by_name("cmdindex").is_none());
        assert!(domain.descriptors().has("opt"));
    }

    #[test]
    fn test_generate_unknown_index() {
        let domain = CoqDomain::default();
        assert!(domain.generate_index(&DomainData::new(), "nope", None).is_none());
        assert!(domain
            .generate_index(&DomainData::new(), "cmdindex", None)
            .unwrap()
            .is_empty());
    }
}
