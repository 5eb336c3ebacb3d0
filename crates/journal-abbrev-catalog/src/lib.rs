//! Curated journal abbreviation catalog and its persisted index.
//!
//! The index is a single SQLite file produced offline by the build tool and
//! opened strictly read-only at runtime. The tables the reader depends on
//! (`full_to_abbreviation`, `prefixes`, `suffixes`) are a compatibility
//! contract between builder and reader.

mod builder;
mod db;
mod parser;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use journal_abbrev_ltwa::{LtwaEntry, WildcardMatchIndex};

pub use builder::{BuildStats, SCHEMA_VERSION, build_index};
pub use parser::parse_journal_list;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("journal index not found at {0}")]
    Missing(PathBuf),
    #[error("journal index at {path} is missing required table '{table}'")]
    SchemaMismatch { path: PathBuf, table: &'static str },
    #[error("journal list parse error: {0}")]
    Parse(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One curated catalog entry for a journal.
///
/// The dotless form is derived from the abbreviation (periods become spaces,
/// whitespace collapsed) and never stored independently. The shortest-unique
/// form falls back to the abbreviation when the source list omits it.
/// Records are immutable value objects; identity is the full name alone, so
/// two records with equal names are the same abbreviation no matter what the
/// other fields say.
#[derive(Debug, Clone, Eq)]
pub struct Abbreviation {
    name: String,
    abbreviation: String,
    dotless: String,
    shortest_unique: String,
}

impl Abbreviation {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self::with_shortest_unique(name, abbreviation, "")
    }

    pub fn with_shortest_unique(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        shortest_unique: impl Into<String>,
    ) -> Self {
        let name = name.into().trim().to_string();
        let abbreviation = abbreviation.into().trim().to_string();
        let shortest = shortest_unique.into().trim().to_string();
        let dotless = derive_dotless(&abbreviation);
        let shortest_unique = if shortest.is_empty() {
            abbreviation.clone()
        } else {
            shortest
        };
        Self {
            name,
            abbreviation,
            dotless,
            shortest_unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn dotless_abbreviation(&self) -> &str {
        &self.dotless
    }

    pub fn shortest_unique_abbreviation(&self) -> &str {
        &self.shortest_unique
    }
}

impl PartialEq for Abbreviation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::hash::Hash for Abbreviation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

fn derive_dotless(abbreviation: &str) -> String {
    abbreviation
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Handle to an opened persisted journal index (read-only).
pub struct JournalIndex {
    conn: Connection,
    path: PathBuf,
}

impl JournalIndex {
    /// Open the persisted index read-only.
    ///
    /// Fails fast when the file is missing or lacks a required table: the
    /// curated catalog is the primary data source, and a missing index is a
    /// packaging defect rather than a runtime condition to degrade around.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::Missing(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        for table in db::REQUIRED_TABLES {
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(CatalogError::SchemaMismatch {
                    path: path.to_path_buf(),
                    table,
                });
            }
        }

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Materialize every catalog record in a single pass over
    /// `full_to_abbreviation`.
    pub fn load_catalog(&self) -> Result<Vec<Abbreviation>, CatalogError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT name, abbreviation, shortest_unique FROM full_to_abbreviation",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (name, abbreviation, shortest) = row?;
            out.push(Abbreviation::with_shortest_unique(
                name,
                abbreviation,
                shortest.unwrap_or_default(),
            ));
        }
        Ok(out)
    }

    /// Rebuild the wildcard index from the stem tables.
    ///
    /// Stems were normalized by the build tool and are inserted back
    /// verbatim, so build-time and query-time keying cannot diverge.
    pub fn load_word_index(&self) -> Result<WildcardMatchIndex, CatalogError> {
        let mut index = WildcardMatchIndex::new();

        let mut stmt = self
            .conn
            .prepare_cached("SELECT stem, pattern, replacement FROM prefixes ORDER BY stem, seq")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        for row in rows {
            let (stem, pattern, replacement) = row?;
            index.insert_prefix_stem(&stem, LtwaEntry { pattern, replacement });
        }
        drop(stmt);

        let mut stmt = self
            .conn
            .prepare_cached("SELECT stem, pattern, replacement FROM suffixes ORDER BY stem, seq")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        for row in rows {
            let (stem, pattern, replacement) = row?;
            index.insert_suffix_stem(&stem, LtwaEntry { pattern, replacement });
        }

        Ok(index)
    }

    /// Metadata stamped by the build tool (`schema_version`, `last_updated`,
    /// record counts).
    pub fn metadata(&self, key: &str) -> Result<Option<String>, CatalogError> {
        db::get_metadata(&self.conn, key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
