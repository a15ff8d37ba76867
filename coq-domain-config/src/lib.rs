//! Configuration loader for the documentation domain.
//!
//! `defaults/coq-domain.default.toml` is embedded so that the documented defaults and the
//! runtime behavior stay in sync. Hosts layer project files on top of those defaults via
//! [`Loader`] before deserializing into [`DomainConfig`], then hand
//! [`DomainConfig::settings`] to [`coq_domain::CoqDomain::new`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use coq_domain::{DomainSettings, ReportUndocumented};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/coq-domain.default.toml");

/// Top-level configuration of the domain.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    pub objects: ObjectsConfig,
    pub xref: XrefConfig,
}

/// Policies applied while declarations are processed.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectsConfig {
    pub report_undocumented: ReportUndocumented,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XrefConfig {
    pub warn_dangling: bool,
}

impl DomainConfig {
    /// The settings the domain itself consumes
    pub fn settings(&self) -> DomainSettings {
        DomainSettings {
            report_undocumented: self.objects.report_undocumented,
            warn_dangling: self.xref.warn_dangling,
        }
    }
}

/// Helper for layering project overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `objects.report_undocumented`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DomainConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DomainConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coq_domain::{CoqDomain, Diagnostics, DocumentContext, DomainData, ObjectDeclaration, SourceLocation};
    use std::fs;

    #[test]
    fn defaults_match_domain_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.objects.report_undocumented, ReportUndocumented::None);
        assert!(config.xref.warn_dangling);
        assert_eq!(config.settings(), DomainSettings::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("objects.report_undocumented", "warning")
            .expect("override to apply")
            .set_override("xref.warn_dangling", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.objects.report_undocumented, ReportUndocumented::Warning);
        assert!(!config.xref.warn_dangling);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Loader::new()
            .set_override("objects.report_undocumented", "loud")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn layers_project_file() {
        let dir = std::env::temp_dir().join(format!("coq-domain-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("project.toml");
        fs::write(&path, "[objects]\nreport_undocumented = \"info\"\n").unwrap();

        let config = Loader::new()
            .with_file(&path)
            .with_optional_file(dir.join("missing.toml"))
            .build()
            .expect("config to build");
        assert_eq!(config.objects.report_undocumented, ReportUndocumented::Info);
        assert!(config.xref.warn_dangling);

        assert!(Loader::new().with_file(dir.join("missing.toml")).build().is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loaded_settings_drive_the_domain() {
        let config = Loader::new()
            .set_override("objects.report_undocumented", "info")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let domain = CoqDomain::new(config.settings());

        let mut data = DomainData::new();
        let mut doc = DocumentContext::new("flags");
        let mut diags = Diagnostics::new();
        let declaration = ObjectDeclaration::new("flag", SourceLocation::doc("flags"))
            .signature("Printing All");
        domain
            .describe(&mut data, &mut doc, &declaration, &mut diags)
            .expect("info policy does not fail");
        assert_eq!(diags.len(), 1);
    }
}
