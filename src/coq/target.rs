//! Target identifier scheme
//!
//!     Every named object gets one link target, `coq:<object-type>.<slug>`. The slug comes
//!     from the host's identifier sanitizer ([`IdSanitizer`]); the scheme itself never
//!     sanitizes. As long as object-type names contain no `.`, the prefix is recoverable
//!     from the identifier, which makes the mapping injective.
//!
//!     Grammar productions are the one exception: they use `grammar-token-<name>` with the
//!     raw, unsanitized name so that the host's generic `:token:` references find them the
//!     same way they find tokens from its own production lists.

use once_cell::sync::Lazy;
use regex::Regex;
use slug::slugify;

pub const TARGET_PREFIX: &str = "coq";
pub const GRAMMAR_TOKEN_PREFIX: &str = "grammar-token-";
pub const INFERENCE_PREFIX: &str = "inference-";

/// Create a target to an object of type `object_type` and sanitized id `slug`
pub fn make_target(object_type: &str, slug: &str) -> String {
    format!("{}:{}.{}", TARGET_PREFIX, object_type, slug)
}

/// Target of a grammar production, compatible with the host's token references
pub fn grammar_token_target(name: &str) -> String {
    format!("{}{}", GRAMMAR_TOKEN_PREFIX, name)
}

/// Identifier sanitizer provided by the host document engine
pub trait IdSanitizer: Send + Sync {
    fn make_id(&self, name: &str) -> String;
}

static LEADING_NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-0-9]+").unwrap());

/// The docutils `make_id` rules: non-ASCII letters transliterated (`é` becomes `e`),
/// lowercase ASCII words joined by hyphens, no leading digits or hyphens, no trailing
/// hyphens.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocutilsIds;

impl IdSanitizer for DocutilsIds {
    fn make_id(&self, name: &str) -> String {
        let hyphenated = slugify(name);
        LEADING_NON_LETTERS.replace(&hyphenated, "").into_owned()
    }
}
