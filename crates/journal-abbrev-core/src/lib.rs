//! Journal name matching engine.
//!
//! Layers user-supplied custom abbreviations over the curated catalog
//! loaded from the persisted index, and falls back to the LTWA word
//! abbreviator for names the catalog does not know.

mod loader;
mod repository;

use thiserror::Error;

pub use journal_abbrev_catalog::{Abbreviation, CatalogError, JournalIndex};
pub use journal_abbrev_ltwa::{LtwaError, WordAbbreviator};
pub use loader::{IGNORED_LIST_NAMES, load_custom_lists};
pub use repository::{JournalRepository, LazyRepository};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("LTWA error: {0}")]
    Ltwa(#[from] LtwaError),
}
