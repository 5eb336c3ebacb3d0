//! ISO 4 word-abbreviation engine: stem normalization, the dual
//! prefix/suffix wildcard index over LTWA rules, and the per-word
//! abbreviator that turns title words into their standard abbreviations.

mod abbreviator;
mod index;
mod normalize;
mod parser;

use thiserror::Error;

pub use abbreviator::WordAbbreviator;
pub use index::{RuleKind, WILDCARD_MARKER, WildcardMatchIndex, WordMatch};
pub use normalize::normalize;
pub use parser::parse_ltwa;

#[derive(Error, Debug)]
pub enum LtwaError {
    #[error("LTWA parse error: {0}")]
    Parse(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rule from the LTWA word list.
///
/// `pattern` keeps the raw source form, hyphen markers intact: a trailing
/// hyphen marks a prefix rule, a leading hyphen a suffix rule, neither an
/// exact prefix-anchored word. `replacement` is `None` for `n.a.` rules,
/// whose words are never abbreviated. Several entries may share a normalized
/// stem (language-specific variants), so the index stores ordered buckets
/// rather than single values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LtwaEntry {
    pub pattern: String,
    pub replacement: Option<String>,
}

impl LtwaEntry {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: Some(replacement.into()),
        }
    }

    /// Rule whose words are kept verbatim (`n.a.` in the source list).
    pub fn not_abbreviated(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: None,
        }
    }
}
