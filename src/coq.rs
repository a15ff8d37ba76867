//! Main module for the documentation domain
//!
//! Layout, leaf first:
//!
//! - `target`: the target identifier scheme and the identifier sanitizer seam.
//! - `notation`: the notation adapter seam and its built-in implementation.
//! - `subdomain`, `descriptor`: namespaces and the static description of each construct kind.
//! - `registry`, `grammar`: the build-scoped object tables and the grammar-token aliases.
//! - `declaration`, `roles`, `inference`: what the host calls while reading a document.
//! - `resolver`, `index`: what the host calls once all documents are read.
//! - `domain`: the read-only configuration tying it together.

pub mod declaration;
pub mod descriptor;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod grammar;
pub mod index;
pub mod inference;
pub mod notation;
pub mod registry;
pub mod resolver;
pub mod roles;
pub mod settings;
pub mod subdomain;
pub mod target;
