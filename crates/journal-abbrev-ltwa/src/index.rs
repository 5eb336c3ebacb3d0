//! Dual prefix/suffix index over normalized LTWA word stems.

use std::collections::HashMap;

use crate::LtwaEntry;
use crate::normalize::normalize;

/// Marker substituted for separators embedded in multi-word stems: three
/// wildcard symbols followed by the separator. At lookup time it matches any
/// within-token text at that boundary, so inflectional variants ending a
/// token still hit the rule. Insertion and lookup share this one definition;
/// the persisted index stores stems with the marker already applied.
pub const WILDCARD_MARKER: &str = "*** ";

const WILDCARD: &str = "***";

/// Which side of the word a rule anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Prefix,
    Suffix,
}

/// A successful word lookup: the winning rule, its anchoring side, and how
/// many characters of the normalized word the stem covered (the suffix
/// concatenation step needs the length).
#[derive(Debug, Clone, Copy)]
pub struct WordMatch<'a> {
    pub entry: &'a LtwaEntry,
    pub kind: RuleKind,
    pub matched_len: usize,
}

struct Candidate<'a> {
    /// Literal key length, used to rank specificity.
    spec: usize,
    /// Characters of the query actually covered.
    span: usize,
    kind: RuleKind,
    entry: &'a LtwaEntry,
}

/// Two maps from normalized stems to ordered rule buckets, one keyed by
/// word prefixes and one by word suffixes. Built once offline, immutable at
/// query time.
#[derive(Debug, Default)]
pub struct WildcardMatchIndex {
    prefixes: HashMap<String, Vec<LtwaEntry>>,
    suffixes: HashMap<String, Vec<LtwaEntry>>,
    // Marker-bearing stems cannot be found by the literal longest-match
    // scan; they are few and scanned linearly.
    wildcard_prefixes: Vec<(String, Vec<LtwaEntry>)>,
    wildcard_suffixes: Vec<(String, Vec<LtwaEntry>)>,
}

impl WildcardMatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a raw source pattern by its hyphen convention and insert the
    /// entry under the normalized stem.
    ///
    /// A leading `-` makes a suffix rule, a trailing `-` a prefix rule, and
    /// a bare word a prefix-anchored whole-word rule. Stems that normalize
    /// to nothing are dropped. Insertion appends to the stem's bucket; a key
    /// may accumulate several entries and none is ever overwritten.
    pub fn insert(&mut self, raw_word: &str, entry: LtwaEntry) {
        let raw = raw_word.trim();
        if let Some(stem) = raw.strip_prefix('-') {
            match normalize(stem) {
                Some(stem) => self.insert_suffix_stem(&mark_separators(&stem), entry),
                None => tracing::debug!(pattern = raw_word, "unkeyable stem; rule dropped"),
            }
        } else {
            let stem = raw.strip_suffix('-').unwrap_or(raw);
            match normalize(stem) {
                Some(stem) => self.insert_prefix_stem(&mark_separators(&stem), entry),
                None => tracing::debug!(pattern = raw_word, "unkeyable stem; rule dropped"),
            }
        }
    }

    /// Insert under an already-normalized stem, exactly as stored in the
    /// persisted index. [`WildcardMatchIndex::insert`] is the raw-source
    /// entry point.
    pub fn insert_prefix_stem(&mut self, stem: &str, entry: LtwaEntry) {
        if stem.contains(WILDCARD) {
            push_wildcard(&mut self.wildcard_prefixes, stem, entry);
        } else {
            self.prefixes.entry(stem.to_string()).or_default().push(entry);
        }
    }

    /// Suffix-side counterpart of [`WildcardMatchIndex::insert_prefix_stem`].
    pub fn insert_suffix_stem(&mut self, stem: &str, entry: LtwaEntry) {
        if stem.contains(WILDCARD) {
            push_wildcard(&mut self.wildcard_suffixes, stem, entry);
        } else {
            self.suffixes.entry(stem.to_string()).or_default().push(entry);
        }
    }

    /// Find the most specific rule matching the word.
    ///
    /// The longest prefix key and the longest suffix key are both
    /// considered; the longer matched key wins, and ties go to the prefix
    /// side. No match is a normal outcome, never an error.
    pub fn lookup(&self, word: &str) -> Option<WordMatch<'_>> {
        let norm = normalize(word)?;
        let boundaries: Vec<usize> = norm
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(norm.len()))
            .collect();

        let mut best: Option<Candidate<'_>> = None;

        // Longest literal prefix key.
        for &end in boundaries[1..].iter().rev() {
            if let Some(entry) = self.prefixes.get(&norm[..end]).and_then(|b| b.first()) {
                best = Some(Candidate {
                    spec: end,
                    span: end,
                    kind: RuleKind::Prefix,
                    entry,
                });
                break;
            }
        }

        // Longest literal suffix key.
        for &start in &boundaries[..boundaries.len() - 1] {
            if let Some(entry) = self.suffixes.get(&norm[start..]).and_then(|b| b.first()) {
                let len = norm.len() - start;
                if beats(len, RuleKind::Suffix, &best) {
                    best = Some(Candidate {
                        spec: len,
                        span: len,
                        kind: RuleKind::Suffix,
                        entry,
                    });
                }
                break;
            }
        }

        for (key, bucket) in &self.wildcard_prefixes {
            if let (Some(span), Some(entry)) = (wildcard_prefix_match(key, &norm), bucket.first()) {
                let spec = literal_len(key);
                if beats(spec, RuleKind::Prefix, &best) {
                    best = Some(Candidate {
                        spec,
                        span,
                        kind: RuleKind::Prefix,
                        entry,
                    });
                }
            }
        }

        for (key, bucket) in &self.wildcard_suffixes {
            if let (Some(span), Some(entry)) = (wildcard_suffix_match(key, &norm), bucket.first()) {
                let spec = literal_len(key);
                if beats(spec, RuleKind::Suffix, &best) {
                    best = Some(Candidate {
                        spec,
                        span,
                        kind: RuleKind::Suffix,
                        entry,
                    });
                }
            }
        }

        best.map(|c| WordMatch {
            entry: c.entry,
            kind: c.kind,
            matched_len: c.span,
        })
    }

    /// Iterate prefix buckets as stored: (stem, ordered entries).
    pub fn prefix_buckets(&self) -> impl Iterator<Item = (&str, &[LtwaEntry])> {
        self.prefixes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .chain(
                self.wildcard_prefixes
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_slice())),
            )
    }

    /// Iterate suffix buckets as stored: (stem, ordered entries).
    pub fn suffix_buckets(&self) -> impl Iterator<Item = (&str, &[LtwaEntry])> {
        self.suffixes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .chain(
                self.wildcard_suffixes
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_slice())),
            )
    }

    /// Total number of stored rules across both sides.
    pub fn len(&self) -> usize {
        self.prefixes.values().map(Vec::len).sum::<usize>()
            + self.suffixes.values().map(Vec::len).sum::<usize>()
            + self.wildcard_prefixes.iter().map(|(_, b)| b.len()).sum::<usize>()
            + self.wildcard_suffixes.iter().map(|(_, b)| b.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mark_separators(stem: &str) -> String {
    stem.replace(' ', WILDCARD_MARKER)
}

fn push_wildcard(side: &mut Vec<(String, Vec<LtwaEntry>)>, stem: &str, entry: LtwaEntry) {
    match side.iter_mut().find(|(k, _)| k == stem) {
        Some((_, bucket)) => bucket.push(entry),
        None => side.push((stem.to_string(), vec![entry])),
    }
}

fn beats(spec: usize, kind: RuleKind, best: &Option<Candidate<'_>>) -> bool {
    match best {
        None => true,
        Some(b) => {
            spec > b.spec || (spec == b.spec && kind == RuleKind::Prefix && b.kind == RuleKind::Suffix)
        }
    }
}

/// Literal characters of a key, with wildcard runs excluded.
fn literal_len(key: &str) -> usize {
    key.len() - WILDCARD.len() * key.matches(WILDCARD).count()
}

/// Match a marker-bearing key anchored at the start of `text`, returning the
/// covered span. The wildcard absorbs any run of within-token characters, so
/// the gap it spans must not contain the separator itself.
fn wildcard_prefix_match(key: &str, text: &str) -> Option<usize> {
    let mut segments = key.split(WILDCARD);
    let first = segments.next().unwrap_or("");
    if !text.starts_with(first) {
        return None;
    }
    let mut pos = first.len();
    for seg in segments {
        let rest = &text[pos..];
        let idx = rest.find(seg)?;
        if rest[..idx].contains(' ') {
            return None;
        }
        pos += idx + seg.len();
    }
    Some(pos)
}

/// Mirror of [`wildcard_prefix_match`] anchored at the end of `text`.
fn wildcard_suffix_match(key: &str, text: &str) -> Option<usize> {
    let segments: Vec<&str> = key.split(WILDCARD).collect();
    let mut iter = segments.iter().rev();
    let last = iter.next().copied().unwrap_or("");
    if !text.ends_with(last) {
        return None;
    }
    let mut end = text.len() - last.len();
    for seg in iter {
        let head = &text[..end];
        let idx = head.rfind(seg)?;
        if head[idx + seg.len()..].contains(' ') {
            return None;
        }
        end = idx;
    }
    Some(text.len() - end)
}
