// Persisted count artifact: the intermediate (document, category) -> count
// records written between extraction and profiling.
//
// One record per line:
//
//   <document id>*<category name>\t<count>
//
// Every document carries an `nwords` record, `0` included, so documents with
// no words survive a write/read cycle and can still be reported as excluded.
//
// Category names never contain `*`, so parsing splits on the last one and a
// document id may itself contain `*`. Records are written in document then
// category order, so the same table always produces the same bytes.

use std::io::{BufRead, Write};

use crate::corpus::DocumentId;
use crate::features::category::{Category, UnknownCategory};

use super::table::CountTable;

/// Separator between document id and category name in a record key.
pub const KEY_SEPARATOR: char = '*';

/// Errors reading or writing count records.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("line {line}: expected `<document>*<category>\\t<count>`")]
    MalformedRecord { line: usize },
    #[error("line {line}: {source}")]
    UnknownCategory {
        line: usize,
        #[source]
        source: UnknownCategory,
    },
    #[error("line {line}: invalid count {value:?}")]
    InvalidCount { line: usize, value: String },
    #[error("line {line}: count overflows when summed with earlier records")]
    CountOverflow { line: usize },
    #[error("document id {0:?} contains a tab or newline and cannot be written")]
    UnwritableDocument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Composite record key for a (document, category) pair.
pub fn record_key(document: &DocumentId, category: &Category) -> String {
    format!("{}{KEY_SEPARATOR}{}", document.as_str(), category.name())
}

/// Split a record key back into its document and category.
pub fn parse_key(key: &str) -> Option<(DocumentId, Result<Category, UnknownCategory>)> {
    let (document, category) = key.rsplit_once(KEY_SEPARATOR)?;
    if document.is_empty() {
        return None;
    }
    Some((DocumentId::new(document), category.parse()))
}

/// Write every record of `table`.
pub fn write_table<W: Write>(table: &CountTable, mut out: W) -> Result<(), ArtifactError> {
    for (document, counts) in table.iter() {
        if document.as_str().contains(['\t', '\n', '\r']) {
            return Err(ArtifactError::UnwritableDocument(document.to_string()));
        }
        let word_count = Category::WordCount;
        let mut records: Vec<(&Category, u64)> = counts.iter().collect();
        if counts.get(&word_count) == 0 {
            records.push((&word_count, 0));
            records.sort_by(|a, b| a.0.cmp(b.0));
        }
        for (category, n) in records {
            writeln!(out, "{}\t{}", record_key(document, category), n)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Render a table to a string in the artifact format.
pub fn to_string(table: &CountTable) -> Result<String, ArtifactError> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read records back into a table. Blank lines are skipped; repeated keys
/// are summed, as partial outputs would be.
pub fn read_table<R: BufRead>(input: R) -> Result<CountTable, ArtifactError> {
    let mut table = CountTable::new();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = line
            .rsplit_once('\t')
            .ok_or(ArtifactError::MalformedRecord { line: line_no })?;
        let (document, category) =
            parse_key(key).ok_or(ArtifactError::MalformedRecord { line: line_no })?;
        let category = category.map_err(|source| ArtifactError::UnknownCategory {
            line: line_no,
            source,
        })?;
        let n: u64 = value
            .trim()
            .parse()
            .map_err(|_| ArtifactError::InvalidCount {
                line: line_no,
                value: value.to_string(),
            })?;

        table
            .try_record(&document, category, n)
            .ok_or(ArtifactError::CountOverflow { line: line_no })?;
    }
    Ok(table)
}

/// Parse a table from a string in the artifact format.
pub fn from_str(input: &str) -> Result<CountTable, ArtifactError> {
    read_table(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::table::FeatureCounts;

    fn sample() -> CountTable {
        let mut table = CountTable::new();
        let doc = DocumentId::new("melville/moby*draft.txt");
        table.record(&doc, Category::WordCount, 12);
        table.record(&doc, Category::Article, 3);
        table.record(&doc, Category::CommonWord("whale".to_string()), 2);
        table.record(&DocumentId::new("austen/emma.txt"), Category::Comma, 1);
        table
    }

    #[test]
    fn test_record_format() {
        let text = to_string(&sample()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "austen/emma.txt*commas\t1");
        assert_eq!(lines[1], "austen/emma.txt*nwords\t0");
        assert_eq!(lines[2], "melville/moby*draft.txt*articles\t3");
        assert!(lines.contains(&"melville/moby*draft.txt*commons:whale\t2"));
    }

    #[test]
    fn test_read_back_is_lossless() {
        let table = sample();
        let text = to_string(&table).unwrap();
        assert_eq!(from_str(&text).unwrap(), table);
    }

    #[test]
    fn test_repeated_keys_are_summed() {
        let table = from_str("a.txt*nwords\t2\n\na.txt*nwords\t3\n").unwrap();
        let counts = table.get(&DocumentId::new("a.txt")).unwrap();
        assert_eq!(counts.word_count(), 5);
    }

    #[test]
    fn test_wordless_document_survives_read_back() {
        let mut table = CountTable::new();
        table.insert(DocumentId::new("blank.txt"), FeatureCounts::new());
        let text = to_string(&table).unwrap();
        assert_eq!(text, "blank.txt*nwords\t0\n");

        let back = from_str(&text).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.get(&DocumentId::new("blank.txt")), Some(&FeatureCounts::new()));
    }

    #[test]
    fn test_summed_count_overflow_is_an_error() {
        let input = format!("a*nwords\t{}\na*nwords\t1\n", u64::MAX);
        assert!(matches!(
            from_str(&input),
            Err(ArtifactError::CountOverflow { line: 2 })
        ));
    }

    #[test]
    fn test_malformed_records() {
        assert!(matches!(
            from_str("a.txt*nwords 2"),
            Err(ArtifactError::MalformedRecord { line: 1 })
        ));
        assert!(matches!(
            from_str("a.txt*nwords\t2\nnwords\t1"),
            Err(ArtifactError::MalformedRecord { line: 2 })
        ));
        assert!(matches!(
            from_str("a.txt*adverbs\t1"),
            Err(ArtifactError::UnknownCategory { line: 1, .. })
        ));
        assert!(matches!(
            from_str("a.txt*nwords\t-1"),
            Err(ArtifactError::InvalidCount { line: 1, .. })
        ));
    }

    #[test]
    fn test_tab_in_document_id_is_unwritable() {
        let mut table = CountTable::new();
        table.record(&DocumentId::new("bad\tname"), Category::WordCount, 1);
        assert!(matches!(
            to_string(&table),
            Err(ArtifactError::UnwritableDocument(_))
        ));
    }
}
