//! Offline build of the persisted journal index.
//!
//! The runtime only ever opens the index read-only; everything here runs in
//! the build tool, on validated source records handed over by the list
//! parsers.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;

use journal_abbrev_ltwa::{LtwaEntry, WildcardMatchIndex};

use crate::db;
use crate::{Abbreviation, CatalogError};

/// Bumped whenever the table shapes change.
pub const SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub journals: u64,
    pub duplicate_journals: u64,
    pub ltwa_rules: u64,
}

/// Build (or rebuild) the persisted index from validated source records.
///
/// Journals are deduplicated by lowercased name with last-write-wins; each
/// discarded record leaves a diagnostic trail. LTWA rules flow through
/// [`WildcardMatchIndex::insert`] so that the stems written here are exactly
/// the stems query-time normalization produces.
pub fn build_index(
    db_path: &Path,
    journals: &[Abbreviation],
    ltwa_rules: &[LtwaEntry],
) -> Result<BuildStats, CatalogError> {
    let conn = Connection::open(db_path)?;
    db::init_database(&conn)?;
    db::clear_tables(&conn)?;

    let mut stats = BuildStats::default();

    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<Abbreviation> = Vec::new();
    for a in journals {
        let key = a.name().to_lowercase();
        match by_name.get(&key) {
            Some(&i) => {
                tracing::debug!(
                    name = a.name(),
                    discarded = kept[i].abbreviation(),
                    "duplicate journal name; keeping the later record"
                );
                stats.duplicate_journals += 1;
                kept[i] = a.clone();
            }
            None => {
                by_name.insert(key, kept.len());
                kept.push(a.clone());
            }
        }
    }
    db::insert_journals(&conn, &kept)?;
    stats.journals = kept.len() as u64;

    let mut index = WildcardMatchIndex::new();
    for entry in ltwa_rules {
        index.insert(&entry.pattern, entry.clone());
    }
    db::insert_word_index(&conn, &index)?;
    stats.ltwa_rules = index.len() as u64;

    db::set_metadata(&conn, "schema_version", SCHEMA_VERSION)?;
    db::set_metadata(&conn, "last_updated", &now_unix_timestamp())?;
    db::set_metadata(&conn, "journal_count", &stats.journals.to_string())?;
    db::set_metadata(&conn, "ltwa_count", &stats.ltwa_rules.to_string())?;

    Ok(stats)
}

/// Unix timestamp as a string (seconds since epoch).
fn now_unix_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
