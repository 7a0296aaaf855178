//! Blacklist / whitelist override words

use std::collections::BTreeSet;
use std::path::Path;

/// Static override word sets, read-only for the lifetime of a batch.
///
/// Blacklisted words are always flagged; whitelisted words are never flagged
/// from a remote observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLists {
    blacklist: BTreeSet<String>,
    whitelist: BTreeSet<String>,
}

impl WordLists {
    /// Create word lists from in-memory words
    pub fn new<B, W>(blacklist: B, whitelist: W) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let lists = Self {
            blacklist: blacklist.into_iter().map(Into::into).collect(),
            whitelist: whitelist.into_iter().map(Into::into).collect(),
        };
        lists.warn_on_conflicts();
        lists
    }

    /// Load both lists from newline-separated files.
    ///
    /// A file that cannot be read yields an empty list.
    pub fn from_files(blacklist: &Path, whitelist: &Path) -> Self {
        let lists = Self {
            blacklist: read_word_file(blacklist),
            whitelist: read_word_file(whitelist),
        };
        tracing::info!(
            blacklist = lists.blacklist.len(),
            whitelist = lists.whitelist.len(),
            "Loaded override word lists"
        );
        lists.warn_on_conflicts();
        lists
    }

    /// Parse one word per line, ignoring blank lines
    pub fn parse_words(contents: &str) -> BTreeSet<String> {
        contents
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn blacklist(&self) -> &BTreeSet<String> {
        &self.blacklist
    }

    pub fn whitelist(&self) -> &BTreeSet<String> {
        &self.whitelist
    }

    pub fn is_whitelisted(&self, word: &str) -> bool {
        self.whitelist.contains(word)
    }

    pub fn is_blacklisted(&self, word: &str) -> bool {
        self.blacklist.contains(word)
    }

    /// Blacklisted tokens of `text`, in order of first appearance
    pub fn blacklisted_tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut found: Vec<&str> = Vec::new();
        for token in text.split_whitespace() {
            if self.blacklist.contains(token) && !found.contains(&token) {
                found.push(token);
            }
        }
        found
    }

    /// Words present in both lists
    pub fn conflicts(&self) -> Vec<&str> {
        self.blacklist
            .intersection(&self.whitelist)
            .map(String::as_str)
            .collect()
    }

    fn warn_on_conflicts(&self) {
        let conflicts = self.conflicts();
        if !conflicts.is_empty() {
            tracing::warn!(
                words = ?conflicts,
                "Words are both blacklisted and whitelisted; the blacklist pass will still mark them"
            );
        }
    }
}

fn read_word_file(path: &Path) -> BTreeSet<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => WordLists::parse_words(&contents),
        Err(e) => {
            tracing::warn!("Could not read word list {}: {e}", path.display());
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_words_strips_line_endings() {
        let words = WordLists::parse_words("alpha\r\nbeta\n\n  \ngamma");
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_blacklisted_tokens_in_order_without_duplicates() {
        let lists = WordLists::new(["zed", "alpha"], Vec::<String>::new());
        assert_eq!(
            lists.blacklisted_tokens("zed and alpha and zed"),
            vec!["zed", "alpha"]
        );
        assert!(lists.blacklisted_tokens("nothing here").is_empty());
    }

    #[test]
    fn test_conflicts() {
        let lists = WordLists::new(["both", "black"], ["both", "white"]);
        assert_eq!(lists.conflicts(), vec!["both"]);
    }

    #[test]
    fn test_missing_files_yield_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let lists = WordLists::from_files(&dir.path().join("nope.txt"), &dir.path().join("nada.txt"));
        assert!(lists.blacklist().is_empty());
        assert!(lists.whitelist().is_empty());
    }

    #[test]
    fn test_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let black = dir.path().join("black.txt");
        let white = dir.path().join("white.txt");
        std::fs::File::create(&black)
            .unwrap()
            .write_all(b"darn\nheck\n")
            .unwrap();
        std::fs::write(&white, "Zenith\n").unwrap();

        let lists = WordLists::from_files(&black, &white);
        assert!(lists.is_blacklisted("darn"));
        assert!(lists.is_blacklisted("heck"));
        assert!(lists.is_whitelisted("Zenith"));
        assert!(!lists.is_whitelisted("zenith"));
    }
}
