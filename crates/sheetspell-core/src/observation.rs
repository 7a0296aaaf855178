//! A single reading of the remote surface's misspelling UI

/// One flagged misspelling as reported by the remote surface.
///
/// `phrase` is the full cell content the surface is currently showing,
/// `word` the token it flagged inside that cell and `suggestion` its first
/// proposed replacement (empty when none could be read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedObservation {
    pub phrase: String,
    pub word: String,
    pub suggestion: String,
}

impl FlaggedObservation {
    pub fn new(
        phrase: impl Into<String>,
        word: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            word: word.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Whether this reading points at the same flag as `other`.
    ///
    /// The surface sometimes keeps showing a flag after it was dismissed;
    /// suggestions are not compared because they can load late.
    pub fn same_flag(&self, other: &FlaggedObservation) -> bool {
        self.phrase == other.phrase && self.word == other.word
    }
}
