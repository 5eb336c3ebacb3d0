//! Word-level abbreviation of journal titles.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::index::{RuleKind, WildcardMatchIndex};
use crate::normalize::normalize;

/// Articles and prepositions omitted when a multi-word title is abbreviated.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "of", "and", "or", "for", "on", "in", "at", "to",
        "with", "by", "from", "der", "die", "das", "und", "des", "dem", "la",
        "le", "les", "el", "los", "las", "de", "du", "et", "di", "e", "il",
        "y", "van", "von", "voor", "och", "og", "i",
    ]
    .into_iter()
    .collect()
});

/// Title words: letters/digits, with internal apostrophes and hyphens.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}\-][\p{L}\p{N}]+)*").unwrap());

/// Derives per-word abbreviations from the wildcard index.
///
/// Pure function of the index and its input: no persisted or mutable state.
/// Stop-word policy belongs to the concatenation step
/// ([`WordAbbreviator::abbreviate_title`]), not to the per-word mapping.
#[derive(Debug, Default)]
pub struct WordAbbreviator {
    index: WildcardMatchIndex,
}

impl WordAbbreviator {
    pub fn new(index: WildcardMatchIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &WildcardMatchIndex {
        &self.index
    }

    /// Abbreviate a single word, or return it unchanged when no rule applies.
    ///
    /// A prefix rule replaces the whole word with its replacement text; a
    /// suffix rule keeps the unmatched head of the word and appends the
    /// replacement ("biology" under `-ology -> ol.` becomes "biol."). An
    /// `n.a.` rule pins the word as-is. The leading capital of the source
    /// word carries over.
    pub fn abbreviate_word(&self, word: &str) -> String {
        let Some(m) = self.index.lookup(word) else {
            return word.to_string();
        };
        let Some(replacement) = m.entry.replacement.as_deref() else {
            return word.to_string();
        };
        let abbreviated = match m.kind {
            RuleKind::Prefix => replacement.to_string(),
            RuleKind::Suffix => {
                let Some(norm) = normalize(word) else {
                    return word.to_string();
                };
                let cut = norm.len().saturating_sub(m.matched_len);
                format!("{}{}", &norm[..cut], replacement)
            }
        };
        match_case(word, abbreviated)
    }

    /// Lazily map a word sequence through the index: one pass, not
    /// restartable. Unmatched words pass through unchanged.
    pub fn abbreviate_words<'a, I>(&'a self, words: I) -> impl Iterator<Item = String> + 'a
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: 'a,
    {
        words.into_iter().map(move |w| self.abbreviate_word(w))
    }

    /// Abbreviate a full title: split into words, drop stop words,
    /// abbreviate what remains, join with single spaces.
    ///
    /// Single-word titles are kept verbatim (ISO 4 leaves them
    /// unabbreviated). Replacement text is emitted exactly as stored in the
    /// word list; no periods are added or removed here.
    pub fn abbreviate_title(&self, title: &str) -> String {
        let words: Vec<&str> = WORD_RE.find_iter(title).map(|m| m.as_str()).collect();
        if words.len() <= 1 {
            return title.trim().to_string();
        }
        let kept = words
            .into_iter()
            .filter(|w| !STOP_WORDS.contains(w.to_lowercase().as_str()));
        self.abbreviate_words(kept).collect::<Vec<_>>().join(" ")
    }
}

/// Carry the leading capital of the source word over to the abbreviation.
fn match_case(source: &str, abbreviated: String) -> String {
    let Some(first) = source.chars().next() else {
        return abbreviated;
    };
    if !first.is_uppercase() {
        return abbreviated;
    }
    let mut chars = abbreviated.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => abbreviated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LtwaEntry;

    fn abbreviator(rules: &[(&str, &str)]) -> WordAbbreviator {
        let mut index = WildcardMatchIndex::new();
        for (pattern, replacement) in rules {
            index.insert(pattern, LtwaEntry::new(*pattern, *replacement));
        }
        WordAbbreviator::new(index)
    }

    #[test]
    fn test_prefix_rule_replaces_word() {
        let a = abbreviator(&[("physic-", "phys.")]);
        assert_eq!(a.abbreviate_word("physics"), "phys.");
    }

    #[test]
    fn test_leading_capital_is_restored() {
        let a = abbreviator(&[("physic-", "phys.")]);
        assert_eq!(a.abbreviate_word("Physics"), "Phys.");
    }

    #[test]
    fn test_suffix_rule_keeps_word_head() {
        let a = abbreviator(&[("-ology", "ol.")]);
        assert_eq!(a.abbreviate_word("biology"), "biol.");
        assert_eq!(a.abbreviate_word("Biology"), "Biol.");
    }

    #[test]
    fn test_unmatched_word_passes_through() {
        let a = abbreviator(&[("physic-", "phys.")]);
        assert_eq!(a.abbreviate_word("nature"), "nature");
    }

    #[test]
    fn test_na_rule_pins_word() {
        let mut index = WildcardMatchIndex::new();
        index.insert("nature", LtwaEntry::not_abbreviated("nature"));
        let a = WordAbbreviator::new(index);
        assert_eq!(a.abbreviate_word("nature"), "nature");
    }

    #[test]
    fn test_longest_match_precedence() {
        let a = abbreviator(&[("inter-", "int."), ("international-", "intl.")]);
        assert_eq!(a.abbreviate_word("international"), "intl.");
    }

    #[test]
    fn test_title_drops_stop_words() {
        let a = abbreviator(&[
            ("journal", "j."),
            ("physical-", "phys."),
            ("chemistr-", "chem."),
        ]);
        assert_eq!(
            a.abbreviate_title("Journal of Physical Chemistry"),
            "J. Phys. Chem."
        );
    }

    #[test]
    fn test_single_word_title_kept_verbatim() {
        let a = abbreviator(&[("nature", "nat.")]);
        assert_eq!(a.abbreviate_title("Nature"), "Nature");
    }

    #[test]
    fn test_abbreviate_words_is_lazy_single_pass() {
        let a = abbreviator(&[("physic-", "phys.")]);
        let words = ["physics", "today"];
        let out: Vec<String> = a.abbreviate_words(words.iter().copied()).collect();
        assert_eq!(out, vec!["phys.".to_string(), "today".to_string()]);
    }
}
