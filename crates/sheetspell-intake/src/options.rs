//! CSV options

/// Options for reading CSV input files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether first row is header (default: true)
    pub has_header: bool,
    /// Column holding the row identifier (default: 0)
    pub id_column: usize,
    /// Column holding the text to check (default: 1)
    pub text_column: usize,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            id_column: 0,
            text_column: 1,
        }
    }
}
