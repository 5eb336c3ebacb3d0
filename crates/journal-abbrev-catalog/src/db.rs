//! SQLite schema and write operations for the persisted journal index.
//!
//! Only the offline build tool writes through this module; the runtime
//! reader in [`crate::JournalIndex`] opens the file read-only.

use rusqlite::{Connection, params};

use journal_abbrev_ltwa::WildcardMatchIndex;

use crate::{Abbreviation, CatalogError};

/// Tables the runtime reader depends on. Their names are the compatibility
/// contract between builder and reader.
pub const REQUIRED_TABLES: &[&str] = &["full_to_abbreviation", "prefixes", "suffixes"];

/// Initialize the index schema. Sets WAL mode and NORMAL synchronous for
/// build performance.
pub fn init_database(conn: &Connection) -> Result<(), CatalogError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS full_to_abbreviation (
            name TEXT PRIMARY KEY,
            abbreviation TEXT NOT NULL,
            shortest_unique TEXT
        );

        CREATE TABLE IF NOT EXISTS prefixes (
            stem TEXT NOT NULL,
            pattern TEXT NOT NULL,
            replacement TEXT,
            seq INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS suffixes (
            stem TEXT NOT NULL,
            pattern TEXT NOT NULL,
            replacement TEXT,
            seq INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_prefixes_stem ON prefixes(stem);
        CREATE INDEX IF NOT EXISTS idx_suffixes_stem ON suffixes(stem);
        "#,
    )?;

    Ok(())
}

/// Remove all catalog and stem rows before a rebuild.
pub fn clear_tables(conn: &Connection) -> Result<(), CatalogError> {
    conn.execute_batch(
        r#"
        DELETE FROM full_to_abbreviation;
        DELETE FROM prefixes;
        DELETE FROM suffixes;
        "#,
    )?;
    Ok(())
}

/// Insert journal records in one transaction, upserting by name.
pub fn insert_journals(conn: &Connection, journals: &[Abbreviation]) -> Result<(), CatalogError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO full_to_abbreviation (name, abbreviation, shortest_unique) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT(name) DO UPDATE SET abbreviation = excluded.abbreviation, \
             shortest_unique = excluded.shortest_unique",
        )?;
        for a in journals {
            stmt.execute(params![a.name(), a.abbreviation(), a.shortest_unique_abbreviation()])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Dump the wildcard index buckets into the stem tables, preserving bucket
/// order through `seq`.
pub fn insert_word_index(conn: &Connection, index: &WildcardMatchIndex) -> Result<(), CatalogError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO prefixes (stem, pattern, replacement, seq) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (stem, bucket) in index.prefix_buckets() {
            for (seq, entry) in bucket.iter().enumerate() {
                stmt.execute(params![stem, entry.pattern, entry.replacement, seq as i64])?;
            }
        }
    }
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO suffixes (stem, pattern, replacement, seq) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (stem, bucket) in index.suffix_buckets() {
            for (seq, entry) in bucket.iter().enumerate() {
                stmt.execute(params![stem, entry.pattern, entry.replacement, seq as i64])?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}

/// Get a metadata value by key.
pub fn get_metadata(conn: &Connection, key: &str) -> Result<Option<String>, CatalogError> {
    let mut stmt = conn.prepare_cached("SELECT value FROM metadata WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).ok();
    Ok(result)
}

/// Set a metadata value (upsert).
pub fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<(), CatalogError> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Row counts for journals and stem rules.
pub fn get_counts(conn: &Connection) -> Result<(i64, i64), CatalogError> {
    let journals: i64 =
        conn.query_row("SELECT COUNT(*) FROM full_to_abbreviation", [], |row| row.get(0))?;
    let rules: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM prefixes) + (SELECT COUNT(*) FROM suffixes)",
        [],
        |row| row.get(0),
    )?;
    Ok((journals, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_abbrev_ltwa::LtwaEntry;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_init_creates_tables() {
        let conn = setup_db();
        let (journals, rules) = get_counts(&conn).unwrap();
        assert_eq!(journals, 0);
        assert_eq!(rules, 0);
    }

    #[test]
    fn test_insert_journals_upserts_by_name() {
        let conn = setup_db();
        insert_journals(&conn, &[Abbreviation::new("Nature", "Nat.")]).unwrap();
        insert_journals(&conn, &[Abbreviation::new("Nature", "Nature")]).unwrap();

        let (journals, _) = get_counts(&conn).unwrap();
        assert_eq!(journals, 1);

        let abbrev: String = conn
            .query_row(
                "SELECT abbreviation FROM full_to_abbreviation WHERE name = 'Nature'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(abbrev, "Nature");
    }

    #[test]
    fn test_insert_word_index_preserves_bucket_order() {
        let conn = setup_db();
        let mut index = WildcardMatchIndex::new();
        index.insert("annal-", LtwaEntry::new("annal-", "ann."));
        index.insert("annal-", LtwaEntry::new("annal-", "an."));
        insert_word_index(&conn, &index).unwrap();

        let mut stmt = conn
            .prepare("SELECT replacement FROM prefixes WHERE stem = 'annal' ORDER BY seq")
            .unwrap();
        let replacements: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(replacements, vec!["ann.", "an."]);
    }

    #[test]
    fn test_metadata_round_trip() {
        let conn = setup_db();
        assert_eq!(get_metadata(&conn, "schema_version").unwrap(), None);

        set_metadata(&conn, "schema_version", "1").unwrap();
        assert_eq!(
            get_metadata(&conn, "schema_version").unwrap(),
            Some("1".into())
        );

        set_metadata(&conn, "schema_version", "2").unwrap();
        assert_eq!(
            get_metadata(&conn, "schema_version").unwrap(),
            Some("2".into())
        );
    }

    #[test]
    fn test_clear_tables() {
        let conn = setup_db();
        insert_journals(&conn, &[Abbreviation::new("Nature", "Nat.")]).unwrap();
        clear_tables(&conn).unwrap();
        let (journals, _) = get_counts(&conn).unwrap();
        assert_eq!(journals, 0);
    }
}
