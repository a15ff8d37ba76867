//! Inline roles
//!
//! - `n`: any text in the notation grammar, e.g. :n:`generalize @term as @ident`.
//! - `production`: introduces a grammar token in running text, e.g. :production:`string`
//!   indicates a quoted string. The token becomes a target of the host's `:token:`
//!   references, like those declared with `prodn`.

use super::declaration::DocumentContext;
use super::domain::CoqDomain;
use super::error::DomainError;
use super::grammar::TokenEntry;
use super::notation::{notation_to_nodes, NotationNode};
use super::registry::DomainData;
use super::target::grammar_token_target;

/// Rendered `n` role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineNotation {
    pub rawtext: String,
    pub nodes: Vec<NotationNode>,
}

/// Rendered `production` role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineProduction {
    pub text: String,
    pub target: String,
}

impl CoqDomain {
    pub fn notation_role(&self, text: &str) -> Result<InlineNotation, DomainError> {
        Ok(InlineNotation {
            rawtext: text.to_string(),
            nodes: notation_to_nodes(self.notation(), text)?,
        })
    }

    pub fn production_role(
        &self,
        data: &mut DomainData,
        doc: &mut DocumentContext,
        text: &str,
    ) -> InlineProduction {
        let target = grammar_token_target(text);
        doc.note_target(&target);
        data.tokens.note_production_role(
            text,
            TokenEntry {
                docname: doc.docname().to_string(),
                target: target.clone(),
            },
        );
        InlineProduction {
            text: text.to_string(),
            target,
        }
    }
}
