//! Splitting rows into column pages for the remote sheet

/// A slice of texts written to one column of the remote sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    /// Column index (0-based, A=0)
    pub column: usize,
    /// Texts written top-down starting at row 1
    pub texts: &'a [&'a str],
}

impl Page<'_> {
    /// Number of rows in this page
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Check if the page holds no rows
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Split `texts` into ordered pages of at most `page_size` rows.
///
/// Page `n` is written to column `n`. An empty input yields no pages and a
/// `page_size` of zero is treated as one.
pub fn paginate<'a>(texts: &'a [&'a str], page_size: usize) -> Vec<Page<'a>> {
    texts
        .chunks(page_size.max(1))
        .enumerate()
        .map(|(column, texts)| Page { column, texts })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paginate_overflow() {
        let texts = vec!["w"; 400_000];
        let pages = paginate(&texts, 191_000);

        let sizes: Vec<usize> = pages.iter().map(Page::len).collect();
        assert_eq!(sizes, vec![191_000, 191_000, 18_000]);

        let columns: Vec<usize> = pages.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![0, 1, 2]);
    }

    #[test]
    fn test_paginate_exact_multiple() {
        let texts = vec!["w"; 6];
        let sizes: Vec<usize> = paginate(&texts, 3).iter().map(Page::len).collect();
        assert_eq!(sizes, vec![3, 3]);
    }

    #[test]
    fn test_paginate_keeps_order() {
        let texts = ["a", "b", "c"];
        let pages = paginate(&texts, 2);
        assert_eq!(pages[0].texts, &["a", "b"]);
        assert_eq!(pages[1].texts, &["c"]);
    }

    #[test]
    fn test_paginate_empty() {
        let texts: Vec<&str> = Vec::new();
        assert!(paginate(&texts, 10).is_empty());
    }
}
