//! Stable keying for word stems and query words.

use unicode_normalization::UnicodeNormalization;

/// Normalize a word or stem for indexing and lookup.
///
/// NFKD-decomposes, drops whatever does not survive as ASCII (combining
/// accents in particular), lowercases, and keeps only letters, digits,
/// spaces, apostrophes, and hyphens. Internal whitespace is collapsed to
/// single spaces. Inputs that normalize to nothing return `None`, since an
/// empty key cannot be indexed.
///
/// Index insertion and query lookup must both go through this function; the
/// two sides diverging silently breaks every prefix/suffix match.
pub fn normalize(text: &str) -> Option<String> {
    let folded: String = text
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_lowercase();

    let kept: String = folded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '\'' | '-'))
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
