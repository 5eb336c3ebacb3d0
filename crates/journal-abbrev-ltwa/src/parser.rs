//! Parsing of the tab-delimited LTWA word list.

use std::io::Read;

use crate::{LtwaEntry, LtwaError};

/// Parse the LTWA word list (`WORD<TAB>ABBREVIATION<TAB>LANGUAGES`).
///
/// The abbreviation value `n.a.` marks words that are never abbreviated and
/// becomes `replacement: None`. Rows missing either of the first two columns
/// are skipped. The languages column only explains why several rows can
/// share a stem; the rows are kept in file order so the index buckets stay
/// ordered.
pub fn parse_ltwa<R: Read>(reader: R) -> Result<Vec<LtwaEntry>, LtwaError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let (Some(pattern), Some(abbrev)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let (pattern, abbrev) = (pattern.trim(), abbrev.trim());
        if pattern.is_empty() || abbrev.is_empty() {
            continue;
        }
        let entry = if abbrev.eq_ignore_ascii_case("n.a.") {
            LtwaEntry::not_abbreviated(pattern)
        } else {
            LtwaEntry::new(pattern, abbrev)
        };
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WORD\tABBREVIATIONS\tLANGUAGES\n\
        physics\tphys.\teng\n\
        -ology\tol.\teng\n\
        nature\tn.a.\teng\n\
        international-\tintl.\tmul\n";

    #[test]
    fn test_parses_rows_in_order() {
        let entries = parse_ltwa(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].pattern, "physics");
        assert_eq!(entries[0].replacement.as_deref(), Some("phys."));
        assert_eq!(entries[1].pattern, "-ology");
        assert_eq!(entries[3].pattern, "international-");
    }

    #[test]
    fn test_na_becomes_none() {
        let entries = parse_ltwa(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries[2].pattern, "nature");
        assert_eq!(entries[2].replacement, None);
    }

    #[test]
    fn test_short_rows_skipped() {
        let input = "WORD\tABBREVIATIONS\nlonely\n\t\nphysics\tphys.\n";
        let entries = parse_ltwa(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pattern, "physics");
    }
}
