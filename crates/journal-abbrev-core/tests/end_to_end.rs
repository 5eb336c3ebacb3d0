//! Build a persisted index on disk, then resolve names through the full
//! repository stack.

use std::io::Write as _;
use std::path::PathBuf;

use journal_abbrev_catalog::{Abbreviation, build_index};
use journal_abbrev_core::{JournalRepository, LazyRepository, load_custom_lists};
use journal_abbrev_ltwa::LtwaEntry;

fn build_sample_index(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("journals.db");
    let journals = vec![
        Abbreviation::with_shortest_unique("Physical Review Letters", "Phys. Rev. Lett.", "PRL"),
        Abbreviation::new("Nature", "Nature"),
    ];
    let rules = vec![
        LtwaEntry::new("journal", "j."),
        LtwaEntry::new("physical-", "phys."),
        LtwaEntry::new("chemistr-", "chem."),
        LtwaEntry::new("-ology", "ol."),
    ];
    build_index(&path, &journals, &rules).unwrap();
    path
}

#[test]
fn resolves_catalog_names_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_sample_index(dir.path());

    let repo = JournalRepository::load(&path).unwrap();

    assert!(repo.is_known_name("physical review letters"));
    assert!(repo.is_abbreviated_name("Phys Rev Lett"));
    assert!(!repo.is_abbreviated_name("Physical Review Letters"));

    let a = repo.get("PRL").unwrap();
    assert_eq!(a.name(), "Physical Review Letters");

    // Full display cycle, starting from the dotless form.
    assert_eq!(repo.get_next_abbreviation("Phys Rev Lett").unwrap(), "PRL");
    assert_eq!(
        repo.get_next_abbreviation("PRL").unwrap(),
        "Physical Review Letters"
    );
    assert_eq!(
        repo.get_next_abbreviation("Physical Review Letters").unwrap(),
        "Phys. Rev. Lett."
    );
    assert_eq!(
        repo.get_next_abbreviation("Phys. Rev. Lett.").unwrap(),
        "Phys Rev Lett"
    );
}

#[test]
fn falls_back_to_word_rules_for_unknown_titles() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_sample_index(dir.path());

    let repo = JournalRepository::load(&path).unwrap();
    assert_eq!(
        repo.abbreviate("Journal of Physical Biology").unwrap(),
        "J. Phys. Biol."
    );
}

#[test]
fn custom_lists_override_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_sample_index(dir.path());

    let list = dir.path().join("custom.csv");
    std::fs::File::create(&list)
        .unwrap()
        .write_all(b"Physical Review Letters;PhRvL\n")
        .unwrap();

    let repo = JournalRepository::load(&path).unwrap();
    load_custom_lists(&repo, &[list]);

    assert_eq!(
        repo.get("Physical Review Letters").unwrap().abbreviation(),
        "PhRvL"
    );
}

#[test]
fn lazy_repository_builds_once_and_shares() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_sample_index(dir.path());

    let lazy = LazyRepository::new(&path);
    let first = lazy.get().unwrap();
    assert!(first.is_known_name("Nature"));
    let second = lazy.get().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn lazy_repository_surfaces_missing_index() {
    let dir = tempfile::tempdir().unwrap();
    let lazy = LazyRepository::new(dir.path().join("absent.db"));
    assert!(lazy.get().is_err());
}
