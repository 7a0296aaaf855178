//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sheetspell_core::Row;

use crate::error::{IntakeError, IntakeResult};
use crate::options::CsvReadOptions;

/// CSV input reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into rows
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> IntakeResult<Vec<Row>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into rows.
    ///
    /// A record without a text column yields an empty text.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> IntakeResult<Vec<Row>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let id = record.get(options.id_column).ok_or_else(|| {
                IntakeError::InvalidFormat(format!(
                    "record {} has no id column {}",
                    idx + 1,
                    options.id_column
                ))
            })?;
            let text = record.get(options.text_column).unwrap_or_default();
            rows.push(Row::new(id.trim(), text));
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_id_and_text() {
        let data = "ID,ACTUAL WORDS\n1,helo\n2,\"hello, world\"\n";
        let rows = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id(), "1");
        assert_eq!(rows[0].text(), "helo");
        assert_eq!(rows[1].text(), "hello, world");
    }

    #[test]
    fn test_missing_text_is_empty() {
        let data = "ID,TEXT\n7\n";
        let rows = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows[0].id(), "7");
        assert_eq!(rows[0].text(), "");
    }

    #[test]
    fn test_multiline_cell_normalized() {
        let data = "ID,TEXT\n1,\"two\r\nlines\"\n";
        let rows = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(rows[0].text(), "two lines");
    }

    #[test]
    fn test_custom_delimiter_without_header() {
        let options = CsvReadOptions {
            delimiter: b';',
            has_header: false,
            ..Default::default()
        };
        let rows = CsvReader::read("a;first\nb;second\n".as_bytes(), &options).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id(), "b");
    }
}
