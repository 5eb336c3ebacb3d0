//! Loading of user-supplied custom abbreviation lists.

use std::fs::File;
use std::path::PathBuf;

use journal_abbrev_catalog::{CatalogError, parse_journal_list};

use crate::repository::JournalRepository;

/// Bundled source lists that must never be re-registered as custom lists;
/// their contents are already part of the built-in catalog.
pub const IGNORED_LIST_NAMES: &[&str] = &[
    "journal_abbreviations_entrez.csv",
    "journal_abbreviations_medicus.csv",
];

/// Register the user's custom lists on the repository.
///
/// Files are processed in reverse order so that, with replace-by-name
/// semantics, entries from earlier files in the configuration end up winning.
/// A file that fails to open or parse is logged and skipped; one broken list
/// must not take down the rest.
pub fn load_custom_lists(repository: &JournalRepository, files: &[PathBuf]) {
    for path in files.iter().rev() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if IGNORED_LIST_NAMES.contains(&file_name.as_str()) {
            tracing::debug!(file = %path.display(), "skipping bundled list");
            continue;
        }

        let parsed = File::open(path)
            .map_err(CatalogError::from)
            .and_then(parse_journal_list);
        match parsed {
            Ok(entries) => {
                tracing::debug!(
                    file = %path.display(),
                    count = entries.len(),
                    "loaded custom abbreviation list"
                );
                repository.add_custom_abbreviations(entries);
            }
            Err(err) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %err,
                    "failed to load custom abbreviation list; skipping"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use journal_abbrev_ltwa::WordAbbreviator;

    fn write_list(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn empty_repository() -> JournalRepository {
        JournalRepository::from_parts(Vec::new(), WordAbbreviator::default())
    }

    #[test]
    fn test_earlier_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_list(dir.path(), "first.csv", "My Journal;First Abbrev.\n");
        let second = write_list(dir.path(), "second.csv", "My Journal;Second Abbrev.\n");

        let repo = empty_repository();
        load_custom_lists(&repo, &[first, second]);

        let got = repo.get("My Journal").unwrap();
        assert_eq!(got.abbreviation(), "First Abbrev.");
    }

    #[test]
    fn test_bundled_lists_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = write_list(
            dir.path(),
            "journal_abbreviations_entrez.csv",
            "Entrez Journal;E.J.\n",
        );

        let repo = empty_repository();
        load_custom_lists(&repo, &[bundled]);
        assert!(repo.custom_abbreviations().is_empty());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        let good = write_list(dir.path(), "good.csv", "Nature;Nature\n");

        let repo = empty_repository();
        load_custom_lists(&repo, &[missing, good]);

        assert_eq!(repo.custom_abbreviations().len(), 1);
        assert!(repo.is_known_name("Nature"));
    }
}
