//! The public journal-name matching engine.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;

use journal_abbrev_catalog::{Abbreviation, JournalIndex};
use journal_abbrev_ltwa::WordAbbreviator;

use crate::CoreError;

/// Canonical form used for lookups: trimmed, `\&` unescaped to `&`,
/// lowercased.
fn canonicalize(text: &str) -> String {
    text.trim().replace("\\&", "&").to_lowercase()
}

/// Inputs containing `?` are placeholder/malformed names; they are defined
/// to never match anything.
fn is_placeholder(text: &str) -> bool {
    text.contains('?')
}

fn matches_any(a: &Abbreviation, key: &str) -> bool {
    a.name().to_lowercase() == key || matches_abbreviated(a, key)
}

fn matches_abbreviated(a: &Abbreviation, key: &str) -> bool {
    a.abbreviation().to_lowercase() == key
        || a.dotless_abbreviation().to_lowercase() == key
        || a.shortest_unique_abbreviation().to_lowercase() == key
}

/// Built-in records plus the four lookup maps over them. Read-only after
/// construction; shared across threads without locking.
#[derive(Debug, Default)]
struct BuiltIns {
    entries: Vec<Abbreviation>,
    by_name: HashMap<String, usize>,
    by_abbreviation: HashMap<String, usize>,
    by_dotless: HashMap<String, usize>,
    by_shortest_unique: HashMap<String, usize>,
}

impl BuiltIns {
    fn from_entries(entries: Vec<Abbreviation>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_abbreviation = HashMap::new();
        let mut by_dotless = HashMap::new();
        let mut by_shortest_unique = HashMap::new();
        for (i, a) in entries.iter().enumerate() {
            by_name.insert(a.name().to_lowercase(), i);
            by_abbreviation.insert(a.abbreviation().to_lowercase(), i);
            by_dotless.insert(a.dotless_abbreviation().to_lowercase(), i);
            by_shortest_unique.insert(a.shortest_unique_abbreviation().to_lowercase(), i);
        }
        Self {
            entries,
            by_name,
            by_abbreviation,
            by_dotless,
            by_shortest_unique,
        }
    }
}

/// Matching engine over the curated catalog, user-supplied custom
/// abbreviations, and the LTWA fallback abbreviator.
///
/// The built-in maps are immutable after construction. The custom list is a
/// copy-on-write snapshot behind [`ArcSwap`]: matching reads load an atomic
/// snapshot and never lock, and never observe a partially updated list.
pub struct JournalRepository {
    built_ins: BuiltIns,
    custom: ArcSwap<Vec<Abbreviation>>,
    abbreviator: WordAbbreviator,
}

impl JournalRepository {
    /// Open the persisted index and materialize the lookup maps.
    ///
    /// A missing or unreadable index is a construction failure; there is no
    /// silent fallback to an empty catalog.
    pub fn load(index_path: &Path) -> Result<Self, CoreError> {
        let index = JournalIndex::open(index_path)?;
        let entries = index.load_catalog()?;
        let word_index = index.load_word_index()?;
        Ok(Self::from_parts(entries, WordAbbreviator::new(word_index)))
    }

    /// Assemble a repository from already-loaded parts.
    pub fn from_parts(entries: Vec<Abbreviation>, abbreviator: WordAbbreviator) -> Self {
        Self {
            built_ins: BuiltIns::from_entries(entries),
            custom: ArcSwap::from_pointee(Vec::new()),
            abbreviator,
        }
    }

    /// True when the text matches any representation of a custom or
    /// built-in entry. Placeholder names containing `?` are never known.
    pub fn is_known_name(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    /// True only when the text matches an abbreviated representation of
    /// some entry and is not itself that entry's full name. Exact full-name
    /// matches are never classified as abbreviated, even where the
    /// abbreviation equals the name.
    pub fn is_abbreviated_name(&self, text: &str) -> bool {
        if is_placeholder(text) {
            return false;
        }
        let key = canonicalize(text);
        if key.is_empty() {
            return false;
        }

        let custom = self.custom.load();
        let entry = custom
            .iter()
            .find(|a| matches_abbreviated(a, &key))
            .cloned()
            .or_else(|| self.built_in_abbreviated(&key));
        match entry {
            Some(a) => key != a.name().to_lowercase(),
            None => false,
        }
    }

    fn built_in_abbreviated(&self, key: &str) -> Option<Abbreviation> {
        let b = &self.built_ins;
        [&b.by_abbreviation, &b.by_dotless, &b.by_shortest_unique]
            .into_iter()
            .find_map(|m| m.get(key))
            .map(|&i| b.entries[i].clone())
    }

    /// Resolve text to its catalog entry.
    ///
    /// The precedence is a hard contract, since a name can coincidentally
    /// collide across categories: custom entries first (scan order, any
    /// representation), then built-in full name, abbreviation, dotless,
    /// shortest-unique. First match wins.
    pub fn get(&self, text: &str) -> Option<Abbreviation> {
        if is_placeholder(text) {
            return None;
        }
        let key = canonicalize(text);
        if key.is_empty() {
            return None;
        }

        let custom = self.custom.load();
        if let Some(found) = custom.iter().find(|a| matches_any(a, &key)) {
            return Some(found.clone());
        }

        let b = &self.built_ins;
        [&b.by_name, &b.by_abbreviation, &b.by_dotless, &b.by_shortest_unique]
            .into_iter()
            .find_map(|m| m.get(&key))
            .map(|&i| b.entries[i].clone())
    }

    /// Advance to the next representation in the fixed display cycle:
    /// dotless, then the shortest-unique form when it differs from the
    /// abbreviation, then the full name, then the abbreviation, and back to
    /// dotless. An unrecognized current form falls through to dotless.
    pub fn get_next_abbreviation(&self, text: &str) -> Option<String> {
        let a = self.get(text)?;
        let current = canonicalize(text);

        let next = if current == a.dotless_abbreviation().to_lowercase() {
            if a.shortest_unique_abbreviation() == a.abbreviation() {
                a.name()
            } else {
                a.shortest_unique_abbreviation()
            }
        } else if current == a.shortest_unique_abbreviation().to_lowercase()
            && a.shortest_unique_abbreviation() != a.abbreviation()
        {
            a.name()
        } else if current == a.name().to_lowercase() {
            a.abbreviation()
        } else {
            a.dotless_abbreviation()
        };
        Some(next.to_string())
    }

    /// Replace-by-name insert: an existing custom entry with the same name
    /// is removed first, so the list never holds two entries with one name
    /// and its order reflects recency.
    pub fn add_custom_abbreviation(&self, abbreviation: Abbreviation) {
        self.custom.rcu(|current| {
            let mut next: Vec<Abbreviation> = current
                .iter()
                .filter(|a| a.name() != abbreviation.name())
                .cloned()
                .collect();
            next.push(abbreviation.clone());
            next
        });
    }

    pub fn add_custom_abbreviations(&self, list: impl IntoIterator<Item = Abbreviation>) {
        for a in list {
            self.add_custom_abbreviation(a);
        }
    }

    /// Snapshot of the custom list in registration order.
    pub fn custom_abbreviations(&self) -> Vec<Abbreviation> {
        self.custom.load().as_ref().clone()
    }

    /// Full names of every loaded entry, custom entries included.
    pub fn full_names(&self) -> HashSet<String> {
        let custom = self.custom.load();
        self.built_ins
            .entries
            .iter()
            .chain(custom.iter())
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Every built-in entry as loaded from the persisted index.
    pub fn all_loaded(&self) -> Vec<Abbreviation> {
        self.built_ins.entries.clone()
    }

    /// Standard abbreviation for a name: the catalog entry's abbreviation
    /// when one matches, otherwise derived word-by-word from the LTWA
    /// rules. This fallback is the only path that consults the word
    /// abbreviator.
    pub fn abbreviate(&self, text: &str) -> Option<String> {
        if let Some(a) = self.get(text) {
            return Some(a.abbreviation().to_string());
        }
        let derived = self.abbreviator.abbreviate_title(text.trim());
        if derived.is_empty() { None } else { Some(derived) }
    }
}

/// Race-safe lazy construction: the repository is built at most once per
/// process and only a fully constructed value is ever published, so
/// concurrent first-use cannot observe a partial catalog.
pub struct LazyRepository {
    index_path: PathBuf,
    inner: OnceCell<JournalRepository>,
}

impl LazyRepository {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            inner: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Result<&JournalRepository, CoreError> {
        self.inner
            .get_or_try_init(|| JournalRepository::load(&self.index_path))
    }
}
