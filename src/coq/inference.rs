//! Inference rules
//!
//! An inference block has a title and a body made of premises, a rule line of dashes and a
//! conclusion:
//!
//! ```text
//! .. inference:: Prod-Pro
//!
//!    \WTEG{T}{s}
//!    s \in \Sort
//!    -----------------------------
//!    \WTEG{\forall~x:T,U}{\Prop}
//! ```
//!
//! The body becomes a LaTeX fraction for the host's math renderer, and the block gets an
//! `inference-<slug>` target.

use super::declaration::DocumentContext;
use super::domain::CoqDomain;
use super::error::DomainError;
use super::target::INFERENCE_PREFIX;
use once_cell::sync::Lazy;
use regex::Regex;

static RULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ *----+ *$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceBlock {
    pub title: String,
    pub target: String,
    pub latex: String,
}

fn prepare_latex_operand(operand: &str) -> String {
    operand
        .trim()
        .lines()
        .collect::<Vec<_>>()
        .join("%\n\\hspace{3em}%\n")
}

/// Turn `premises / rule / conclusion` into a `\frac`
pub fn prepare_latex(title: &str, content: &str) -> Result<String, DomainError> {
    let parts: Vec<&str> = RULE_LINE.split(content).collect();
    let [top, bottom] = parts.as_slice() else {
        return Err(DomainError::MalformedInference {
            title: title.to_string(),
        });
    };
    let top = prepare_latex_operand(top);
    let bottom = prepare_latex_operand(bottom);
    Ok(["\\frac{", &top, "}{", &bottom, "}"].join("%\n"))
}

impl CoqDomain {
    pub fn inference(
        &self,
        doc: &mut DocumentContext,
        title: &str,
        content: &str,
    ) -> Result<InferenceBlock, DomainError> {
        let latex = prepare_latex(title, content)?;
        let target = format!("{}{}", INFERENCE_PREFIX, self.sanitizer().make_id(title));
        doc.note_target(&target);
        Ok(InferenceBlock {
            title: title.to_string(),
            target,
            latex,
        })
    }
}
