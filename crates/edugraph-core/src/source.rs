//! Row records and the tabular sources that produce them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One table row: field name to raw cell text.
///
/// A field that is not in the map is absent, which is distinct from a field
/// holding an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw value, including empty strings.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed value if the field exists and is not blank.
    #[must_use]
    pub fn present(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub type RecordIter<'a> = Box<dyn Iterator<Item = crate::Result<Record>> + 'a>;

/// A finite sequence of records that can be read more than once.
pub trait RowSource {
    fn records(&self) -> crate::Result<RecordIter<'_>>;
}

impl RowSource for [Record] {
    fn records(&self) -> crate::Result<RecordIter<'_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

impl RowSource for Vec<Record> {
    fn records(&self) -> crate::Result<RecordIter<'_>> {
        self.as_slice().records()
    }
}

#[derive(Debug, Clone)]
enum CsvInput {
    Path(PathBuf),
    Text(String),
}

/// Headered CSV table, optionally preceded by preamble lines.
///
/// Cells missing from short rows are absent fields; empty cells are empty
/// strings. Columns with a blank header are ignored.
#[derive(Debug, Clone)]
pub struct CsvSource {
    input: CsvInput,
    skip_lines: usize,
    delimiter: u8,
}

impl CsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            input: CsvInput::Path(path.as_ref().to_path_buf()),
            skip_lines: 0,
            delimiter: b',',
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: CsvInput::Text(text.into()),
            skip_lines: 0,
            delimiter: b',',
        }
    }

    #[must_use]
    pub const fn skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read_text(&self) -> crate::Result<String> {
        let text = match &self.input {
            CsvInput::Path(path) => std::fs::read_to_string(path)?,
            CsvInput::Text(text) => text.clone(),
        };

        if self.skip_lines == 0 {
            return Ok(text);
        }
        Ok(text
            .split_inclusive('\n')
            .skip(self.skip_lines)
            .collect::<String>())
    }
}

impl RowSource for CsvSource {
    fn records(&self) -> crate::Result<RecordIter<'_>> {
        let text = self.read_text()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(std::io::Cursor::new(text.into_bytes()));

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = reader.into_records().map(move |row| -> crate::Result<Record> {
            let row = row?;
            Ok(headers
                .iter()
                .zip(row.iter())
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect::<Record>())
        });

        Ok(Box::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_presence() {
        let record = Record::new()
            .with("Vagas 2024", "50")
            .with("Grau", "")
            .with("Nota", "   ");

        assert_eq!(record.present("Vagas 2024"), Some("50"));
        assert_eq!(record.get("Grau"), Some(""));
        assert_eq!(record.present("Grau"), None);
        assert_eq!(record.present("Nota"), None);
        assert!(!record.contains("Distrito"));
        assert_eq!(record.present("Distrito"), None);
    }

    #[test]
    fn test_csv_source_reads_headered_rows() {
        let source = CsvSource::from_text("Nome,Vagas\nUniversidade A,50\nUniversidade B,\n");
        let records: Vec<Record> = source.records().unwrap().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Nome"), Some("Universidade A"));
        assert_eq!(records[0].get("Vagas"), Some("50"));
        assert_eq!(records[1].get("Vagas"), Some(""));
    }

    #[test]
    fn test_csv_source_short_rows_are_absent_fields() {
        let source = CsvSource::from_text("Nome,Vagas,Nota\nUniversidade A,50\n");
        let records: Vec<Record> = source.records().unwrap().map(|r| r.unwrap()).collect();

        assert!(records[0].contains("Vagas"));
        assert!(!records[0].contains("Nota"));
    }

    #[test]
    fn test_csv_source_skips_preamble_and_is_restartable() {
        let source = CsvSource::from_text(
            "Lista de vagas\n\n\nNome,Vagas\nUniversidade A,50\n",
        )
        .skip_lines(3);

        for _ in 0..2 {
            let records: Vec<Record> = source.records().unwrap().map(|r| r.unwrap()).collect();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].get("Nome"), Some("Universidade A"));
        }
    }

    #[test]
    fn test_csv_source_ignores_unnamed_columns() {
        let source = CsvSource::from_text("Nome,,Vagas\nA,x,1\n");
        let record = source.records().unwrap().next().unwrap().unwrap();

        assert_eq!(record.len(), 2);
        assert!(!record.contains(""));
    }

    #[test]
    fn test_csv_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vagas.csv");
        std::fs::write(&path, "Nome;Vagas\nUniversidade A;---\n").unwrap();

        let source = CsvSource::from_path(&path).delimiter(b';');
        let record = source.records().unwrap().next().unwrap().unwrap();
        assert_eq!(record.get("Vagas"), Some("---"));
    }

    #[test]
    fn test_vec_source() {
        let rows = vec![Record::new().with("a", "1"), Record::new().with("a", "2")];
        assert_eq!(rows.records().unwrap().count(), 2);
    }
}
