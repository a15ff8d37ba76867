//! Build-wide policy knobs consumed by the domain
//!
//! Loading these from files is the job of the `coq-domain-config` crate; this module only
//! defines the values and their defaults.

use serde::Deserialize;

/// What to do with a documentable object that has no body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportUndocumented {
    /// Say nothing
    #[default]
    None,
    /// Emit an informational diagnostic
    Info,
    /// Emit the diagnostic and fail the declaration
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DomainSettings {
    pub report_undocumented: ReportUndocumented,
    /// Report cross-references that do not resolve
    pub warn_dangling: bool,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            report_undocumented: ReportUndocumented::None,
            warn_dangling: true,
        }
    }
}
