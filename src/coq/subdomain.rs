//! Subdomains and cross-reference roles
//!
//! A subdomain is a closed namespace of object identities. Names are unique within one
//! subdomain, but a tactic and a theorem may share a name. Every subdomain is also exactly
//! one cross-reference role; the extra `index` role points at the subdomain indices instead
//! of the object registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A namespace of object identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdomain {
    Cmd,
    Tacn,
    Opt,
    Flag,
    Table,
    Thm,
    Prodn,
    Exn,
    Warn,
}

impl Subdomain {
    pub const ALL: [Subdomain; 9] = [
        Subdomain::Cmd,
        Subdomain::Tacn,
        Subdomain::Opt,
        Subdomain::Flag,
        Subdomain::Table,
        Subdomain::Thm,
        Subdomain::Prodn,
        Subdomain::Exn,
        Subdomain::Warn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subdomain::Cmd => "cmd",
            Subdomain::Tacn => "tacn",
            Subdomain::Opt => "opt",
            Subdomain::Flag => "flag",
            Subdomain::Table => "table",
            Subdomain::Thm => "thm",
            Subdomain::Prodn => "prodn",
            Subdomain::Exn => "exn",
            Subdomain::Warn => "warn",
        }
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subdomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subdomain::ALL
            .into_iter()
            .find(|subdomain| subdomain.as_str() == s)
            .ok_or_else(|| format!("Unknown subdomain '{}'", s))
    }
}

/// The role a cross-reference was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrefRole {
    /// `:cmd:`, `:tacn:`, ... resolve against one subdomain table
    Object(Subdomain),
    /// `:index:` resolves against the fixed table of subdomain indices
    Index,
}

impl FromStr for XrefRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "index" {
            Ok(XrefRole::Index)
        } else {
            s.parse().map(XrefRole::Object)
        }
    }
}

impl fmt::Display for XrefRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XrefRole::Object(subdomain) => subdomain.fmt(f),
            XrefRole::Index => f.write_str("index"),
        }
    }
}
