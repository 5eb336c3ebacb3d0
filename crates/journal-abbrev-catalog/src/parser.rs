//! Parsing of semicolon-delimited journal abbreviation lists.

use std::io::Read;

use crate::{Abbreviation, CatalogError};

/// Parse a delimited journal list: `name;abbreviation[;shortestUnique]`.
///
/// Lines starting with `#` and rows without both of the first two fields
/// are skipped. Fields are trimmed; the shortest-unique column is optional
/// and defaults to the abbreviation inside [`Abbreviation`].
pub fn parse_journal_list<R: Read>(reader: R) -> Result<Vec<Abbreviation>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let (Some(name), Some(abbrev)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if name.is_empty() || abbrev.is_empty() {
            continue;
        }
        let shortest = record.get(2).unwrap_or("");
        out.push(Abbreviation::with_shortest_unique(name, abbrev, shortest));
    }
    Ok(out)
}
