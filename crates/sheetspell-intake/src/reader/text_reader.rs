//! Plain line-list reader

use std::io::{BufRead, BufReader, Read};

use sheetspell_core::Row;

use crate::error::IntakeResult;

/// Reads one row per line; the identifier is the zero-based line index
pub struct TextReader;

impl TextReader {
    pub fn read<R: Read>(reader: R) -> IntakeResult<Vec<Row>> {
        let mut rows = Vec::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            rows.push(Row::new(idx.to_string(), line.trim_end_matches(['\r', '\n'])));
        }
        Ok(rows)
    }
}
