//! Readers that turn stored input files into rows

mod csv_reader;
mod text_reader;
mod xlsx_reader;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sheetspell_core::Row;

use crate::error::{IntakeError, IntakeResult};
use crate::options::CsvReadOptions;

pub use csv_reader::CsvReader;
pub use text_reader::TextReader;
pub use xlsx_reader::XlsxReader;

/// Input file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
    /// Legacy binary Excel; accepted for upload but not readable
    Xls,
    Text,
}

impl InputFormat {
    /// Pick a format from a file name. Anything unrecognised is read as text.
    pub fn from_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => InputFormat::Csv,
            Some("xlsx") => InputFormat::Xlsx,
            Some("xls") => InputFormat::Xls,
            _ => InputFormat::Text,
        }
    }
}

/// Read rows from a file, picking the reader from its extension
pub fn read_rows<P: AsRef<Path>>(path: P) -> IntakeResult<Vec<Row>> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    read_rows_from(InputFormat::from_name(name), path)
}

/// Read rows from a file using an explicit format
pub fn read_rows_from(format: InputFormat, path: &Path) -> IntakeResult<Vec<Row>> {
    let rows = match format {
        InputFormat::Csv => CsvReader::read_file(path, &CsvReadOptions::default())?,
        InputFormat::Xlsx => XlsxReader::read(BufReader::new(File::open(path)?), true)?,
        InputFormat::Text => TextReader::read(File::open(path)?)?,
        InputFormat::Xls => {
            return Err(IntakeError::UnsupportedFormat(
                "legacy .xls workbooks cannot be read; save the file as .xlsx or .csv".into(),
            ))
        }
    };
    tracing::info!(rows = rows.len(), "Read input file {}", path.display());
    Ok(rows)
}

/// Render a numeric cell the way a person typed it (`1` rather than `1.0`)
fn number_to_text(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Ok(n) => format!("{n}"),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(InputFormat::from_name("words.CSV"), InputFormat::Csv);
        assert_eq!(InputFormat::from_name("book.xlsx"), InputFormat::Xlsx);
        assert_eq!(InputFormat::from_name("old.xls"), InputFormat::Xls);
        assert_eq!(InputFormat::from_name("list.txt"), InputFormat::Text);
        assert_eq!(InputFormat::from_name("noext"), InputFormat::Text);
    }

    #[test]
    fn test_number_to_text() {
        assert_eq!(number_to_text("1"), "1");
        assert_eq!(number_to_text("1.0"), "1");
        assert_eq!(number_to_text("2.5"), "2.5");
        assert_eq!(number_to_text("abc"), "abc");
    }

    #[test]
    fn test_xls_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.xls");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0").unwrap();
        assert!(matches!(
            read_rows(&path),
            Err(IntakeError::UnsupportedFormat(_))
        ));
    }
}
