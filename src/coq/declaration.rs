//! Declaration processing
//!
//!     An object declaration is what an author writes to document one construct: a
//!     construct type (`cmd`, `tacn`, ...), one or more signature lines, options and a body.
//!     Processing a declaration renders its signatures, works out the name of each one,
//!     claims link targets in the current document, records the names in the registry and
//!     produces entries for the general index.
//!
//!     Naming
//!
//!     An explicit `name` option wins (one name per signature, separated by semicolons).
//!     Otherwise the descriptor's [`NameRule`] derives a name from the signature text, and a
//!     trailing `.` is dropped unless the name ends in an ellipsis (`...`). A signature
//!     without a name is rendered but gets no target and no index entry; variants such as
//!     `cmdv` routinely have none.
//!
//!     Atomicity
//!
//!     Every signature is rendered and named before anything is registered, so a malformed
//!     notation or a bad name list fails the declaration without leaving half of it in the
//!     registry.

use super::descriptor::{NameRule, ObjectDescriptor, SignatureRule};
use super::diagnostics::{codes, Diagnostic, Diagnostics, SourceLocation};
use super::domain::CoqDomain;
use super::error::DomainError;
use super::grammar::{parse_production, TokenEntry};
use super::notation::{notation_to_nodes, notation_to_string, NotationNode};
use super::registry::{DomainData, RegisteredObject};
use super::settings::ReportUndocumented;
use super::subdomain::Subdomain;
use super::target::{grammar_token_target, make_target};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static LEADING_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z ]+").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationOptions {
    /// Semicolon-separated explicit names, one per signature
    pub name: Option<String>,
    /// Silences the undocumented-object policy
    pub undocumented: bool,
    /// Keeps the object out of the general index
    pub noindex: bool,
}

/// One documented-construct block, as handed over by the host's markup parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDeclaration {
    pub directive: String,
    pub signatures: Vec<String>,
    pub options: DeclarationOptions,
    pub has_content: bool,
    pub location: SourceLocation,
}

impl ObjectDeclaration {
    pub fn new(directive: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            directive: directive.into(),
            signatures: Vec::new(),
            options: DeclarationOptions::default(),
            has_content: false,
            location,
        }
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into());
        self
    }

    pub fn name(mut self, names: impl Into<String>) -> Self {
        self.options.name = Some(names.into());
        self
    }

    pub fn undocumented(mut self) -> Self {
        self.options.undocumented = true;
        self
    }

    pub fn noindex(mut self) -> Self {
        self.options.noindex = true;
        self
    }

    pub fn with_content(mut self) -> Self {
        self.has_content = true;
        self
    }
}

/// Per-document processing state: the target ids already claimed in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    docname: String,
    ids: HashSet<String>,
}

impl DocumentContext {
    pub fn new(docname: impl Into<String>) -> Self {
        Self {
            docname: docname.into(),
            ids: HashSet::new(),
        }
    }

    pub fn docname(&self) -> &str {
        &self.docname
    }

    /// Claim a target id; false if the document already has it
    pub fn note_target(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Rendered form of a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureBody {
    Plain(String),
    Notation(Vec<NotationNode>),
    /// `lhs_op` is the literal `lhs ::= ` / `lhs += ` prefix
    Production {
        lhs_op: String,
        rhs: Vec<NotationNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSignature {
    pub source: String,
    pub annotation: Option<&'static str>,
    pub body: SignatureBody,
    pub name: Option<String>,
    /// Target ids attached to this signature
    pub ids: Vec<String>,
    pub names: Vec<String>,
}

/// An entry for the host's general index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralIndexEntry {
    pub text: String,
    pub target: String,
}

/// Result of processing one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedObject {
    pub object_type: &'static str,
    pub subdomain: Subdomain,
    pub signatures: Vec<RenderedSignature>,
    pub index_entries: Vec<GeneralIndexEntry>,
}

impl DescribedObject {
    /// Every target id claimed by this object
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.signatures
            .iter()
            .flat_map(|sig| sig.ids.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ObjectName {
    Plain(String),
    Token(&'static str, String),
}

impl ObjectName {
    fn display(&self) -> &str {
        match self {
            ObjectName::Plain(name) | ObjectName::Token(_, name) => name,
        }
    }
}

/// Drop a trailing `.` found in commands, but not from `...` (ellipsis)
pub fn strip_trailing_period(name: &str) -> &str {
    if name.ends_with('.') && !name.ends_with("...") {
        &name[..name.len() - 1]
    } else {
        name
    }
}

/// Text of a general-index entry; names starting with `_` are not index-worthy
pub fn index_text(name: &str, suffix: Option<&str>) -> Option<String> {
    if name.starts_with('_') {
        return None;
    }
    let mut text = strip_trailing_period(name).to_string();
    if let Some(suffix) = suffix {
        text.push(' ');
        text.push_str(suffix);
    }
    Some(text)
}

impl CoqDomain {
    /// Process one declaration of the document `doc`, recording its names in `data`
    pub fn describe(
        &self,
        data: &mut DomainData,
        doc: &mut DocumentContext,
        declaration: &ObjectDeclaration,
        diagnostics: &mut Diagnostics,
    ) -> Result<DescribedObject, DomainError> {
        let descriptor = self
            .descriptors()
            .get(&declaration.directive)
            .ok_or_else(|| DomainError::UnknownObjectType(declaration.directive.clone()))?;
        let _span = tracing::debug_span!(
            "describe",
            directive = descriptor.name,
            docname = doc.docname()
        )
        .entered();

        if descriptor.documentable {
            self.warn_if_undocumented(declaration, diagnostics)?;
        }

        let explicit = prepare_names(declaration)?;
        let mut prepared = Vec::with_capacity(declaration.signatures.len());
        for (signature, explicit) in declaration.signatures.iter().zip(explicit) {
            let (body, name) = self.handle_signature(descriptor, signature, explicit)?;
            prepared.push((signature, body, name));
        }

        let mut described = DescribedObject {
            object_type: descriptor.name,
            subdomain: descriptor.subdomain,
            signatures: Vec::with_capacity(prepared.len()),
            index_entries: Vec::new(),
        };
        let mut seen: Vec<ObjectName> = Vec::new();
        for (signature, body, name) in prepared {
            let mut rendered = RenderedSignature {
                source: signature.clone(),
                annotation: descriptor.annotation,
                body,
                name: name.as_ref().map(|n| n.display().to_string()),
                ids: Vec::new(),
                names: Vec::new(),
            };
            if let Some(name) = name.filter(|name| !seen.contains(name)) {
                let target = self.target_id(descriptor, &name);
                if doc.note_target(&target) {
                    rendered.ids.push(target.clone());
                    rendered.names.push(name.display().to_string());
                    self.record_name(data, descriptor, &name, &target, declaration, diagnostics);
                }
                if !declaration.options.noindex {
                    if let Some(entry) = general_index_entry(descriptor, &name, &target) {
                        described.index_entries.push(entry);
                    }
                }
                seen.push(name);
            }
            described.signatures.push(rendered);
        }
        Ok(described)
    }

    fn warn_if_undocumented(
        &self,
        declaration: &ObjectDeclaration,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), DomainError> {
        let report = self.settings().report_undocumented;
        if report == ReportUndocumented::None
            || declaration.has_content
            || declaration.options.undocumented
        {
            return Ok(());
        }
        diagnostics.push(
            Diagnostic::info(
                codes::UNDOCUMENTED_OBJECT,
                format!("No contents in directive {}", declaration.directive),
            )
            .at(declaration.location.clone()),
        );
        if report == ReportUndocumented::Warning {
            return Err(DomainError::MissingDocumentation {
                directive: declaration.directive.clone(),
                location: declaration.location.clone(),
            });
        }
        Ok(())
    }

    /// Render a signature and work out the name it is known by
    fn handle_signature(
        &self,
        descriptor: &ObjectDescriptor,
        signature: &str,
        explicit: Option<String>,
    ) -> Result<(SignatureBody, Option<ObjectName>), DomainError> {
        let notation = self.notation();
        let body = match descriptor.signature_rule {
            SignatureRule::Production => {
                let production = parse_production(signature)?;
                let rhs = notation_to_nodes(notation, production.rhs)?;
                let lhs_op = format!("{} {} ", production.lhs, production.op.as_str());
                let name = production
                    .key()
                    .map(|(kind, name)| ObjectName::Token(kind, name.to_string()));
                return Ok((SignatureBody::Production { lhs_op, rhs }, name));
            }
            SignatureRule::Plain => SignatureBody::Plain(signature.to_string()),
            SignatureRule::Notation => SignatureBody::Notation(notation_to_nodes(notation, signature)?),
        };

        let name = match explicit {
            Some(name) => Some(name),
            None => self
                .name_from_signature(descriptor.name_rule, signature)?
                .map(|name| strip_trailing_period(&name).to_string()),
        };
        Ok((body, name.filter(|n| !n.is_empty()).map(ObjectName::Plain)))
    }

    fn name_from_signature(
        &self,
        rule: NameRule,
        signature: &str,
    ) -> Result<Option<String>, DomainError> {
        Ok(match rule {
            NameRule::None => None,
            NameRule::Verbatim => Some(signature.to_string()),
            NameRule::LeadingWords => LEADING_WORDS
                .find(signature)
                .map(|m| m.as_str().trim().to_string()),
            NameRule::Notation => Some(notation_to_string(self.notation(), signature)?),
        })
    }

    fn target_id(&self, descriptor: &ObjectDescriptor, name: &ObjectName) -> String {
        match name {
            // The raw name, so that the host's own token references find it
            ObjectName::Token(_, name) => grammar_token_target(name),
            ObjectName::Plain(name) => make_target(descriptor.name, &self.sanitizer().make_id(name)),
        }
    }

    fn record_name(
        &self,
        data: &mut DomainData,
        descriptor: &ObjectDescriptor,
        name: &ObjectName,
        target: &str,
        declaration: &ObjectDeclaration,
        diagnostics: &mut Diagnostics,
    ) {
        let location = declaration.location.clone();
        match name {
            ObjectName::Plain(name) => {
                let object =
                    RegisteredObject::new(location.docname.clone(), descriptor.name, target);
                data.objects
                    .record(descriptor.subdomain, name.clone(), object, location, diagnostics);
            }
            ObjectName::Token(kind, name) => {
                let entry = TokenEntry {
                    docname: location.docname.clone(),
                    target: target.to_string(),
                };
                data.tokens
                    .alias_production((*kind, name.as_str()), entry, location, diagnostics);
            }
        }
    }
}

/// Split the explicit name list, checking there is one name per signature
fn prepare_names(declaration: &ObjectDeclaration) -> Result<Vec<Option<String>>, DomainError> {
    let count = declaration.signatures.len();
    let Some(names) = &declaration.options.name else {
        return Ok(vec![None; count]);
    };
    let names: Vec<String> = names.split(';').map(|n| n.trim().to_string()).collect();
    if names.len() != count {
        return Err(DomainError::NameCountMismatch {
            expected: count,
            got: names.len(),
            location: declaration.location.clone(),
        });
    }
    Ok(names.into_iter().map(Some).collect())
}

fn general_index_entry(
    descriptor: &ObjectDescriptor,
    name: &ObjectName,
    target: &str,
) -> Option<GeneralIndexEntry> {
    match name {
        ObjectName::Token(..) => None,
        ObjectName::Plain(name) => index_text(name, descriptor.index_suffix).map(|text| {
            GeneralIndexEntry {
                text,
                target: target.to_string(),
            }
        }),
    }
}
